//! Caller-supplied option values.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A single option value as supplied by the caller.
///
/// The first three variants are the values an engine option can accept.
/// [`OptionValue::Other`] exists for dynamic boundaries (script bindings,
/// loosely typed config) that receive something else: the value is carried
/// through so the marshaler can reject it against the option's declared
/// kind rather than the boundary guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean value.
    Boolean(bool),
    /// Signed integer value.
    Integer(i64),
    /// Text value.
    Text(String),
    /// A value of some other caller-side type, named by `type_name`.
    #[serde(skip)]
    Other {
        /// The caller-side type name (e.g. `float`).
        type_name: String,
    },
}

impl OptionValue {
    /// Creates an [`OptionValue::Other`] for a value of the named type.
    pub fn other(type_name: impl Into<String>) -> Self {
        Self::Other {
            type_name: type_name.into(),
        }
    }

    /// Returns a short name for the variant, used in logs.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::Other { type_name } => type_name,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Other { type_name } => write!(f, "<{type_name}>"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A mapping of option names to values for one call.
///
/// Names are unique. Iteration is in name order, so when several entries
/// are invalid the one reported is always the same.
///
/// # Example
///
/// ```rust
/// use tinytidy_core::{OptionTable, OptionValue};
///
/// let table = OptionTable::new()
///     .with("indent", 1)
///     .with("output-xhtml", true)
///     .with("doctype", "omit");
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.get("indent"), Some(&OptionValue::Integer(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionTable {
    entries: BTreeMap<String, OptionValue>,
}

impl OptionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, returning the table.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts an entry, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.entries.insert(name.into(), value.into())
    }

    /// Returns the value for `name`.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, OptionValue> {
        self.entries.iter()
    }

    /// Parses a JSON object of option names to string, integer or boolean
    /// values.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object or holds a value
    /// of any other JSON type.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Extend<(String, OptionValue)> for OptionTable {
    fn extend<T: IntoIterator<Item = (String, OptionValue)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for OptionTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for OptionTable {
    type Item = (String, OptionValue);
    type IntoIter = btree_map::IntoIter<String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a OptionTable {
    type Item = (&'a String, &'a OptionValue);
    type IntoIter = btree_map::Iter<'a, String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The options argument as received from a dynamically typed caller.
///
/// Bindings classify the raw argument into one of these before calling
/// [`crate::Tidy::parse_string`], which rejects [`OptionsArg::Invalid`]
/// without touching the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionsArg {
    /// No options were supplied.
    #[default]
    Absent,
    /// A well-formed mapping.
    Table(OptionTable),
    /// Something that is not a usable mapping.
    Invalid {
        /// Why the argument was refused.
        reason: String,
    },
}

impl OptionsArg {
    /// Creates an [`OptionsArg::Invalid`] with the given reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

impl From<OptionTable> for OptionsArg {
    fn from(table: OptionTable) -> Self {
        Self::Table(table)
    }
}

impl From<Option<OptionTable>> for OptionsArg {
    fn from(table: Option<OptionTable>) -> Self {
        table.map_or(Self::Absent, Self::Table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_replaces_duplicate_names() {
        let mut table = OptionTable::new().with("wrap", 80);
        let previous = table.insert("wrap", 0);
        assert_eq!(previous, Some(OptionValue::Integer(80)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("wrap"), Some(&OptionValue::Integer(0)));
    }

    #[test]
    fn iteration_is_name_ordered() {
        let table: OptionTable = [("wrap", 0), ("indent", 1), ("markup", 1)]
            .into_iter()
            .collect();
        let names: Vec<&str> = table.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["indent", "markup", "wrap"]);
    }

    #[test]
    fn json_preset_maps_value_types() {
        let table = OptionTable::from_json_str(
            r#"{"indent": true, "wrap": 72, "doctype": "omit"}"#,
        )
        .unwrap();
        assert_eq!(table.get("indent"), Some(&OptionValue::Boolean(true)));
        assert_eq!(table.get("wrap"), Some(&OptionValue::Integer(72)));
        assert_eq!(table.get("doctype"), Some(&OptionValue::Text("omit".into())));
    }

    #[test]
    fn json_preset_rejects_other_types() {
        assert!(OptionTable::from_json_str(r#"{"wrap": 1.5}"#).is_err());
        assert!(OptionTable::from_json_str(r#"{"wrap": null}"#).is_err());
        assert!(OptionTable::from_json_str(r#"["indent"]"#).is_err());
    }

    #[test]
    fn table_serializes_back_to_json() {
        let table = OptionTable::new().with("indent", true).with("wrap", 0);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"indent":true,"wrap":0}"#);
    }

    #[test]
    fn value_display() {
        assert_eq!(OptionValue::from("omit").to_string(), "\"omit\"");
        assert_eq!(OptionValue::from(3).to_string(), "3");
        assert_eq!(OptionValue::other("float").to_string(), "<float>");
        assert_eq!(OptionValue::other("float").type_name(), "float");
    }

    #[test]
    fn options_arg_from_optional_table() {
        assert_eq!(OptionsArg::from(None), OptionsArg::Absent);
        let table = OptionTable::new().with("indent", 1);
        assert_eq!(
            OptionsArg::from(Some(table.clone())),
            OptionsArg::Table(table)
        );
    }
}
