//! Cross-container tests: shared helpers and property checks that exercise
//! more than one list type at once.

mod common;
mod properties;
