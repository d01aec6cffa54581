use reduced_states::State;

/// Published state of one statistic card.
///
/// Value and description only ever appear together, inside `Ready`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MetricView {
    #[default]
    Loading,
    Ready {
        value: String,
        description: String,
    },
    Failed {
        message: String,
    },
}

impl MetricView {
    pub fn ready(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Ready {
            value: value.into(),
            description: description.into(),
        }
    }

    pub fn failed(message: impl ToString) -> Self {
        Self::Failed {
            message: message.to_string(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Ready { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Ready { description, .. } => Some(description.as_str()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// The three cards of the users page, published as one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pub registered: MetricView,
    pub new_users: MetricView,
    pub verified: MetricView,
}

impl StatsSnapshot {
    pub fn views(&self) -> [&MetricView; 3] {
        [&self.registered, &self.new_users, &self.verified]
    }

    /// True once every card reached a terminal state, failed ones included.
    pub fn is_ready(&self) -> bool {
        self.views().iter().all(|view| !view.is_loading())
    }

    pub fn loading_count(&self) -> usize {
        self.views().iter().filter(|view| view.is_loading()).count()
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut MetricView {
        match slot {
            Slot::Registered => &mut self.registered,
            Slot::NewUsers => &mut self.new_users,
            Slot::Verified => &mut self.verified,
        }
    }
}

impl State for StatsSnapshot {
    const TYPE: &'static str = "users_stats";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Registered,
    NewUsers,
    Verified,
}

impl Slot {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Slot::Registered => "registered users",
            Slot::NewUsers => "new users",
            Slot::Verified => "verified users",
        }
    }
}

/// When card states reach observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishPolicy {
    /// One publish once all three cards are terminal.
    #[default]
    Batched,
    /// Each card is published as soon as its own computation ends.
    Independent,
}
