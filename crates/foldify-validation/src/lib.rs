//! Client-side form validation shared by every tool page.
//!
//! [`rules`] holds the single-field checks, [`profile`] says which checks a
//! tool runs, and [`validate`] rebuilds the whole result on every change.

pub mod profile;
pub mod rules;
pub mod validate;

pub use profile::{Check, FileCheck, ToolProfile};
pub use validate::{validate, validate_attachments, ValidationResult};
