use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use ustr::Ustr;

use crate::table::TableError;

/// One row as returned by the endpoint.
pub type Row = Map<String, Value>;

/// Pure per-cell formatter. Runs on every render pass, so it must not have
/// side effects.
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

#[derive(Clone)]
pub struct ColumnSpec {
    pub key: Ustr,
    pub display_name: String,
    pub sortable: bool,
    /// Presentation hint passed through to the renderer untouched.
    pub class_names: Option<String>,
    formatter: Option<Formatter>,
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("display_name", &self.display_name)
            .field("sortable", &self.sortable)
            .field("class_names", &self.class_names)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl ColumnSpec {
    pub fn new(key: &str, display_name: impl Into<String>) -> Self {
        Self {
            key: Ustr::from(key),
            display_name: display_name.into(),
            sortable: false,
            class_names: None,
            formatter: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn class_names(mut self, class_names: impl Into<String>) -> Self {
        self.class_names = Some(class_names.into());
        self
    }

    pub fn format<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    /// Display text of this column's cell in `row`.
    ///
    /// A missing key is handed to the formatter as `null`.
    pub fn display(&self, row: &Row) -> String {
        let raw = row.get(self.key.as_str()).unwrap_or(&Value::Null);
        match &self.formatter {
            Some(formatter) => formatter(raw),
            None => default_display(raw),
        }
    }
}

/// Strings as-is, `null` as empty, anything else as compact JSON.
pub fn default_display(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Columns in left-to-right display order, keys unique.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    specs: Vec<ColumnSpec>,
}

impl Columns {
    pub fn new(specs: impl IntoIterator<Item = ColumnSpec>) -> Result<Self, TableError> {
        let mut columns = Self::default();
        for spec in specs {
            columns.push(spec)?;
        }
        Ok(columns)
    }

    pub fn push(&mut self, spec: ColumnSpec) -> Result<(), TableError> {
        if self.get(spec.key.as_str()).is_some() {
            return Err(TableError::DuplicateColumn(spec.key));
        }
        self.specs.push(spec);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ColumnSpec> {
        self.specs.iter().find(|spec| spec.key.as_str() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn headers(&self) -> Vec<&str> {
        self.specs
            .iter()
            .map(|spec| spec.display_name.as_str())
            .collect()
    }

    pub fn render_row(&self, row: &Row) -> Vec<String> {
        self.specs.iter().map(|spec| spec.display(row)).collect()
    }

    /// Fails unless `key` names a sortable column.
    pub fn ensure_sortable(&self, key: &str) -> Result<&ColumnSpec, TableError> {
        match self.get(key) {
            Some(spec) if spec.sortable => Ok(spec),
            Some(spec) => Err(TableError::NotSortable(spec.key)),
            None => Err(TableError::UnknownColumn(Ustr::from(key))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    #[test]
    fn default_display_of_values() {
        assert_eq!(default_display(&json!("ada")), "ada");
        assert_eq!(default_display(&json!(null)), "");
        assert_eq!(default_display(&json!(false)), "false");
        assert_eq!(default_display(&json!(3)), "3");
    }

    #[test]
    fn formatter_replaces_raw_value() {
        let spec = ColumnSpec::new("verified", "Verified").format(|value| {
            let label = if value.as_bool().unwrap_or(false) { "yes" } else { "no" };
            label.to_string()
        });

        assert!(spec.has_formatter());
        assert_eq!(spec.display(&row(json!({ "verified": true }))), "yes");
    }

    #[test]
    fn missing_key_is_formatted_as_null() {
        let spec = ColumnSpec::new("email", "Email").format(|value| format!("<{value}>"));
        assert_eq!(spec.display(&row(json!({ "name": "x" }))), "<null>");

        let plain = ColumnSpec::new("email", "Email");
        assert_eq!(plain.display(&row(json!({}))), "");
    }

    #[test]
    fn columns_keep_insertion_order() {
        let columns = Columns::new([
            ColumnSpec::new("b", "B"),
            ColumnSpec::new("a", "A"),
            ColumnSpec::new("c", "C"),
        ])
        .unwrap();

        assert_eq!(columns.headers(), vec!["B", "A", "C"]);
        assert_eq!(
            columns.render_row(&row(json!({ "a": 1, "b": "two", "c": null }))),
            vec!["two", "1", ""]
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = Columns::new([ColumnSpec::new("a", "A"), ColumnSpec::new("a", "Again")])
            .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn(Ustr::from("a")));
    }

    #[test]
    fn ensure_sortable_checks_flag_and_presence() {
        let columns = Columns::new([
            ColumnSpec::new("name", "Name").sortable(),
            ColumnSpec::new("verified", "Verified"),
        ])
        .unwrap();

        assert!(columns.ensure_sortable("name").is_ok());
        assert_eq!(
            columns.ensure_sortable("verified").unwrap_err(),
            TableError::NotSortable(Ustr::from("verified"))
        );
        assert_eq!(
            columns.ensure_sortable("missing").unwrap_err(),
            TableError::UnknownColumn(Ustr::from("missing"))
        );
    }
}
