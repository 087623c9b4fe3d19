//! Test doubles for the process-launch boundary.

#[cfg(test)]
pub(crate) mod fixtures;
mod mocks;

pub use mocks::{RecordingRunner, ScriptedCall};
