//! Derived numbers and card texts for each statistic.

use crate::dates::MonthWindow;
use crate::stats::MetricView;

/// Percentage rendered with one decimal the way `Number::toFixed(1)` does:
/// exact halves round up and non-finite values read `Infinity` or `NaN`.
pub fn format_percent(value: f64) -> String {
    let value = value.abs();
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        "Infinity".to_string()
    } else if is_exact_half_tenth(value) {
        // `{:.1}` breaks exact ties to even.
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        format!("{value:.1}")
    }
}

/// True when `value` sits exactly between two tenths. In binary that only
/// happens for fractions of .25 and .75, where scaling is exact.
fn is_exact_half_tenth(value: f64) -> bool {
    let quarters = value * 4.0;
    quarters.fract() == 0.0 && quarters % 2.0 == 1.0
}

/// Turns a computed statistic into the view its card shows.
pub trait MetricOutcome {
    fn view(&self) -> MetricView;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredUsers {
    pub total: u64,
    pub last_month: u64,
}

impl RegisteredUsers {
    /// Change against last month in percent.
    ///
    /// `last_month == 0` divides by zero on purpose: the result is infinite
    /// (or NaN when `total` is also zero) and is shown as such.
    pub fn change(&self) -> f64 {
        let total = self.total as f64;
        let last_month = self.last_month as f64;
        (total - last_month) / last_month * 100.0
    }

    pub fn description(&self) -> String {
        let change = self.change();
        let direction = if change > 0.0 { "more" } else { "less" };
        format!("{}% {direction} than last month", format_percent(change))
    }
}

impl MetricOutcome for RegisteredUsers {
    fn view(&self) -> MetricView {
        MetricView::ready(self.total.to_string(), self.description())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewUsers {
    pub count: u64,
    pub window: MonthWindow,
}

impl MetricOutcome for NewUsers {
    fn view(&self) -> MetricView {
        MetricView::ready(self.count.to_string(), self.window.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedUsers {
    pub total: u64,
    pub verified: u64,
}

impl VerifiedUsers {
    /// Share of verified users in percent, `0` when there are no users.
    pub fn share(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        let not_verified = total - self.verified as f64;
        (total - not_verified) / total * 100.0
    }

    pub fn description(&self) -> String {
        format!(
            "{}% of the users are verified",
            format_percent(self.share())
        )
    }
}

impl MetricOutcome for VerifiedUsers {
    fn view(&self) -> MetricView {
        MetricView::ready(self.verified.to_string(), self.description())
    }
}
