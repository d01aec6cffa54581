use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ustr::Ustr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// The single active sort of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: Ustr,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: &str, order: SortOrder) -> Self {
        Self {
            key: Ustr::from(key),
            order,
        }
    }

    pub fn asc(key: &str) -> Self {
        Self::new(key, SortOrder::Asc)
    }

    pub fn desc(key: &str) -> Self {
        Self::new(key, SortOrder::Desc)
    }

    /// Sort after the user clicked the header of `key`: the active column
    /// flips direction, any other column starts ascending.
    pub fn toggled(&self, key: Ustr) -> Self {
        if self.key == key {
            Self {
                key,
                order: self.order.flipped(),
            }
        } else {
            Self {
                key,
                order: SortOrder::Asc,
            }
        }
    }

    /// `{"createdAt":"desc"}`, the form the endpoint expects in `sort=`.
    pub fn to_query_value(&self) -> String {
        let mut object = Map::with_capacity(1);
        object.insert(
            self.key.to_string(),
            Value::String(self.order.as_str().to_string()),
        );
        Value::Object(object).to_string()
    }
}
