//! Wire payloads for the prediction backend.
//!
//! Builders assume the form already passed validation; the only failures
//! they report are values validation cannot rule out, such as an integer
//! seed that does not fit.

pub mod alphafold3;
pub mod body;
pub mod error;
pub mod multifold;
pub mod single;

pub use body::{FilePart, JobPayload, SubmissionBody};
pub use error::PayloadError;

use foldify_core::form::{keys, FormState};
use foldify_core::tool::Tool;

/// Build the backend request for a single-tool form
pub fn build(form: &FormState) -> Result<JobPayload, PayloadError> {
    match form.tool {
        Tool::AlphaFold2 => single::alphafold2(form),
        Tool::ColabFold => single::colabfold(form),
        Tool::EsmFold => single::esmfold(form),
        Tool::OmegaFold => single::omegafold(form),
        Tool::AlphaFold3 if form.flag(keys::JSON_MODE) => alphafold3::json_upload(form),
        Tool::AlphaFold3 => alphafold3::build(form),
        Tool::MultiFold => Err(PayloadError::NoEndpoint(Tool::MultiFold)),
    }
}
