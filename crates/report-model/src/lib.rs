#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # report-model
//!
//! Typed document structures for the two report formats handled by the
//! converter.
//!
//! The [`karate`] module describes the per-feature JSON report written by the
//! Karate test runner; the [`cucumber`] module describes the Cucumber JSON
//! report read by BDD reporting tools. Both are plain serde structs so that
//! shape mismatches surface at the decode boundary instead of deep inside the
//! mapping code.

/// Cucumber JSON report documents (conversion target).
pub mod cucumber;
/// Karate per-feature report documents (conversion source).
pub mod karate;
mod nullable;

/// Target document types.
pub use cucumber::{CucumberFeature, Element, Status, Step, StepMatch, StepResult, Tag};
/// Source document types.
pub use karate::{DurationMillis, KarateFeature, KarateMatch, KarateScenario, KarateStep};
