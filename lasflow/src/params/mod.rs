//! Positional parameter schemas.
//!
//! The host sends an ordered list of strings. A [`ParamSchema`] names and
//! types every position, decodes the `#` sentinel into an absent value once
//! at the boundary, and produces a [`ParamRecord`] that the command builders
//! read by field name.

mod record;
mod schema;

pub use record::{normalize_decimal, render_decimal, ParamRecord, ParamValue};
pub use schema::{Choice, ChoiceSet, FieldKind, FieldSpec, ParamSchema, UNSET};
