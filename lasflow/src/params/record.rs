//! Decoded parameter records.

use super::schema::Choice;
use std::collections::HashMap;

/// A decoded parameter value. Unset parameters have no value at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A string value.
    Text(String),
    /// A boolean.
    Flag(bool),
    /// A decimal number.
    Decimal(f64),
    /// A non-negative integer.
    Integer(u32),
    /// A recognized categorical value.
    Choice(&'static Choice),
    /// Whitespace-separated pass-through tokens.
    Extra(Vec<String>),
}

/// The structured parameters of one tool invocation.
///
/// Lookups by a name the value is not stored under return the unset value
/// for that accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRecord {
    tool: &'static str,
    values: HashMap<&'static str, ParamValue>,
}

impl ParamRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new(tool: &'static str) -> Self {
        Self {
            tool,
            values: HashMap::new(),
        }
    }

    /// Returns the tool the record was decoded for.
    #[must_use]
    pub fn tool(&self) -> &'static str {
        self.tool
    }

    /// Stores a value.
    pub fn insert(&mut self, name: &'static str, value: ParamValue) {
        self.values.insert(name, value);
    }

    /// Returns true if the field has a value.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns a text value.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParamValue::Text(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns a boolean value; unset is false.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ParamValue::Flag(true)))
    }

    /// Returns a decimal value.
    #[must_use]
    pub fn decimal(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ParamValue::Decimal(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns an integer value.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<u32> {
        match self.values.get(name) {
            Some(ParamValue::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the chosen categorical value.
    #[must_use]
    pub fn choice(&self, name: &str) -> Option<&'static Choice> {
        match self.values.get(name) {
            Some(ParamValue::Choice(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns the label of the chosen categorical value.
    #[must_use]
    pub fn choice_label(&self, name: &str) -> Option<&'static str> {
        self.choice(name).map(|choice| choice.label)
    }

    /// Returns pass-through tokens; unset is empty.
    #[must_use]
    pub fn extra(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(ParamValue::Extra(v)) => v,
            _ => &[],
        }
    }
}

/// Replaces a locale decimal comma with a dot.
#[must_use]
pub fn normalize_decimal(raw: &str) -> String {
    raw.replace(',', ".")
}

/// Renders a decimal for the command line, always with a decimal point.
#[must_use]
pub fn render_decimal(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_decimal() {
        assert_eq!(normalize_decimal("12,5"), "12.5");
        assert_eq!(normalize_decimal("12.5"), "12.5");
        assert_eq!(normalize_decimal("7"), "7");
    }

    #[test]
    fn test_render_decimal() {
        assert_eq!(render_decimal(2.0), "2.0");
        assert_eq!(render_decimal(12.5), "12.5");
        assert_eq!(render_decimal(-0.25), "-0.25");
    }

    #[test]
    fn test_missing_values_read_as_unset() {
        let record = ParamRecord::new("demo");
        assert_eq!(record.tool(), "demo");
        assert!(!record.is_set("input"));
        assert!(!record.flag("verbose"));
        assert!(record.extra("additional").is_empty());
        assert_eq!(record.choice_label("format"), None);
    }
}
