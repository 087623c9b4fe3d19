//! Declarative positional schemas.

use super::record::{normalize_decimal, ParamRecord, ParamValue};
use crate::errors::{ConfigError, LasflowError, SchemaError};
use serde::Serialize;

/// The host's "not set" sentinel.
pub const UNSET: &str = "#";

/// One label of a closed categorical set and the flags it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// The exact label the host sends.
    pub label: &'static str,
    /// The flags appended to the command line when chosen.
    pub flags: &'static [&'static str],
}

impl Choice {
    /// Creates a choice.
    #[must_use]
    pub const fn new(label: &'static str, flags: &'static [&'static str]) -> Self {
        Self { label, flags }
    }
}

/// A closed set of categorical values.
///
/// When `required` is set, a value outside the set aborts the run. Otherwise
/// an unknown value means the feature was not requested and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceSet {
    /// The accepted values.
    pub options: &'static [Choice],
    /// Whether an unknown value is an error.
    pub required: bool,
}

impl ChoiceSet {
    /// A set where unknown values abort the run.
    #[must_use]
    pub const fn required(options: &'static [Choice]) -> Self {
        Self {
            options,
            required: true,
        }
    }

    /// A set where unknown values are silently skipped.
    #[must_use]
    pub const fn optional(options: &'static [Choice]) -> Self {
        Self {
            options,
            required: false,
        }
    }

    /// Finds the choice with exactly this label.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&'static Choice> {
        self.options.iter().find(|choice| choice.label == label)
    }

    /// Returns the accepted labels.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.options.iter().map(|choice| choice.label).collect()
    }
}

/// The type of a positional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// A string value, typically a path.
    Text,
    /// A boolean; only the literal `true` is true.
    Flag,
    /// A decimal number in either locale notation.
    Decimal,
    /// A non-negative integer.
    Integer,
    /// A categorical value from a closed set.
    Choice(ChoiceSet),
    /// Free text split on whitespace and appended verbatim.
    Extra,
}

/// A named, typed positional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Field name used to look the value up in a [`ParamRecord`].
    pub name: &'static str,
    /// Field type.
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    /// A text field.
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    /// A boolean field.
    #[must_use]
    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Flag,
        }
    }

    /// A decimal field.
    #[must_use]
    pub const fn decimal(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Decimal,
        }
    }

    /// An integer field.
    #[must_use]
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
        }
    }

    /// A categorical field.
    #[must_use]
    pub const fn choice(name: &'static str, set: ChoiceSet) -> Self {
        Self {
            name,
            kind: FieldKind::Choice(set),
        }
    }

    /// A free-text pass-through field.
    #[must_use]
    pub const fn extra(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Extra,
        }
    }

    fn decode(&self, raw: &str) -> Result<Option<ParamValue>, SchemaError> {
        if let FieldKind::Flag = self.kind {
            return Ok(Some(ParamValue::Flag(raw == "true")));
        }
        if raw == UNSET {
            return Ok(None);
        }

        let value = match self.kind {
            FieldKind::Text => ParamValue::Text(raw.to_string()),
            FieldKind::Flag => ParamValue::Flag(raw == "true"),
            FieldKind::Decimal => {
                let normalized = normalize_decimal(raw);
                let parsed = normalized.trim().parse::<f64>().ok().filter(|v| v.is_finite());
                match parsed {
                    Some(v) => ParamValue::Decimal(v),
                    None => {
                        return Err(SchemaError::InvalidNumber {
                            field: self.name,
                            value: normalized,
                            expected: "decimal number",
                        })
                    }
                }
            }
            FieldKind::Integer => match raw.trim().parse::<u32>() {
                Ok(v) => ParamValue::Integer(v),
                Err(_) => {
                    return Err(SchemaError::InvalidNumber {
                        field: self.name,
                        value: raw.to_string(),
                        expected: "whole number",
                    })
                }
            },
            FieldKind::Choice(set) => match set.find(raw) {
                Some(choice) => ParamValue::Choice(choice),
                None if set.required => {
                    return Err(SchemaError::UnknownChoice {
                        field: self.name,
                        value: raw.to_string(),
                        allowed: set.labels(),
                    })
                }
                None => {
                    tracing::debug!(field = self.name, value = raw, "Skipping unrecognized optional value");
                    return Ok(None);
                }
            },
            FieldKind::Extra => {
                ParamValue::Extra(raw.split_whitespace().map(str::to_string).collect())
            }
        };

        Ok(Some(value))
    }
}

/// The ordered positional schema of one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSchema {
    /// Tool the schema belongs to.
    pub tool: &'static str,
    /// Fields in host argument order.
    pub fields: &'static [FieldSpec],
}

impl ParamSchema {
    /// Creates a schema.
    #[must_use]
    pub const fn new(tool: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { tool, fields }
    }

    /// Number of arguments the host must send.
    #[must_use]
    pub const fn arg_count(&self) -> usize {
        self.fields.len()
    }

    /// Decodes a host argument vector into a structured record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ArgumentCount`] when the vector length does not
    /// match the schema, or a [`SchemaError`] for the first field whose value
    /// does not fit.
    pub fn decode<S: AsRef<str>>(&self, args: &[S]) -> Result<ParamRecord, LasflowError> {
        if args.len() != self.arg_count() {
            return Err(ConfigError::ArgumentCount {
                got: args.len(),
                expected: self.arg_count(),
            }
            .into());
        }

        let mut record = ParamRecord::new(self.tool);
        for (field, raw) in self.fields.iter().zip(args) {
            if let Some(value) = field.decode(raw.as_ref())? {
                record.insert(field.name, value);
            }
        }
        Ok(record)
    }
}
