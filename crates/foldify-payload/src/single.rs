//! Payloads of the single-sequence tools.
//!
//! All four post plain JSON; numeric options travel as the strings the
//! dropdowns hold.

use foldify_core::form::{keys, FormState};
use foldify_core::tool::Tool;
use foldify_formats::to_fasta;
use serde::{Deserialize, Serialize};

use crate::body::JobPayload;
use crate::error::PayloadError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaFold2Job {
    pub job_name: String,
    pub protein_sequence: String,
    /// `null` means no template cut-off
    pub max_template_date: Option<String>,
    pub predictions_per_model: String,
    pub db_preset: String,
    pub model_preset: String,
    pub email: String,
    pub version: String,
    pub force_computation: bool,
    pub run_relax: bool,
    #[serde(rename = "reuseMSAs")]
    pub reuse_msas: bool,
    pub make_results_public: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColabFoldJob {
    pub job_name: String,
    pub protein_sequence: String,
    pub template_mode: String,
    pub num_relax: String,
    pub msa_mode: String,
    pub pair_mode: String,
    pub model_preset: String,
    pub num_models: String,
    pub num_recycles: String,
    pub recycle_tolerance: String,
    #[serde(rename = "maxMSA")]
    pub max_msa: String,
    pub num_seeds: String,
    pub email: String,
    pub version: String,
    pub force_computation: bool,
    pub make_results_public: bool,
    pub use_dropout: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsmFoldJob {
    pub job_name: String,
    pub protein_sequence: String,
    pub num_copies: String,
    pub num_recycles: String,
    pub email: String,
    pub make_results_public: bool,
    pub force_computation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmegaFoldJob {
    pub job_name: String,
    pub protein_sequence: String,
    pub num_cycle: String,
    #[serde(rename = "numPseudoMSAs")]
    pub num_pseudo_msas: String,
    #[serde(rename = "pseudoMSAMask")]
    pub pseudo_msa_mask: String,
    pub email: String,
    pub make_results_public: bool,
    pub force_computation: bool,
}

fn text(form: &FormState, key: &str) -> String {
    form.text(key).to_string()
}

fn fasta_sequence(form: &FormState) -> String {
    to_fasta(form.text(keys::PROTEIN_SEQUENCE), form.text(keys::JOB_NAME))
}

fn endpoint(tool: Tool) -> Result<&'static str, PayloadError> {
    tool.submit_endpoint().ok_or(PayloadError::NoEndpoint(tool))
}

pub fn alphafold2(form: &FormState) -> Result<JobPayload, PayloadError> {
    let date = form.text(keys::MAX_TEMPLATE_DATE);
    let job = AlphaFold2Job {
        job_name: text(form, keys::JOB_NAME),
        protein_sequence: fasta_sequence(form),
        max_template_date: (!date.is_empty()).then(|| date.to_string()),
        predictions_per_model: text(form, keys::PREDICTIONS_PER_MODEL),
        db_preset: text(form, keys::DB_PRESET),
        model_preset: text(form, keys::MODEL_PRESET),
        email: text(form, keys::EMAIL),
        version: text(form, keys::VERSION),
        force_computation: form.flag(keys::FORCE_COMPUTATION),
        run_relax: form.flag(keys::RUN_RELAX),
        reuse_msas: form.flag(keys::REUSE_MSAS),
        make_results_public: form.flag(keys::MAKE_RESULTS_PUBLIC),
    };
    JobPayload::json(Tool::AlphaFold2, endpoint(Tool::AlphaFold2)?, &job.job_name, &job)
}

pub fn colabfold(form: &FormState) -> Result<JobPayload, PayloadError> {
    let job = ColabFoldJob {
        job_name: text(form, keys::JOB_NAME),
        protein_sequence: fasta_sequence(form),
        template_mode: text(form, keys::TEMPLATE_MODE),
        num_relax: text(form, keys::NUM_RELAX),
        msa_mode: text(form, keys::MSA_MODE),
        pair_mode: text(form, keys::PAIR_MODE),
        model_preset: text(form, keys::MODEL_PRESET),
        num_models: text(form, keys::NUM_MODELS),
        num_recycles: text(form, keys::NUM_RECYCLES),
        recycle_tolerance: text(form, keys::RECYCLE_TOLERANCE),
        max_msa: text(form, keys::MAX_MSA),
        num_seeds: text(form, keys::NUM_SEEDS),
        email: text(form, keys::EMAIL),
        version: text(form, keys::VERSION),
        force_computation: form.flag(keys::FORCE_COMPUTATION),
        make_results_public: form.flag(keys::MAKE_RESULTS_PUBLIC),
        use_dropout: form.flag(keys::USE_DROPOUT),
    };
    JobPayload::json(Tool::ColabFold, endpoint(Tool::ColabFold)?, &job.job_name, &job)
}

pub fn esmfold(form: &FormState) -> Result<JobPayload, PayloadError> {
    let job = EsmFoldJob {
        job_name: text(form, keys::JOB_NAME),
        protein_sequence: fasta_sequence(form),
        num_copies: text(form, keys::NUM_COPIES),
        num_recycles: text(form, keys::NUM_RECYCLES),
        email: text(form, keys::EMAIL),
        make_results_public: form.flag(keys::MAKE_RESULTS_PUBLIC),
        force_computation: form.flag(keys::FORCE_COMPUTATION),
    };
    JobPayload::json(Tool::EsmFold, endpoint(Tool::EsmFold)?, &job.job_name, &job)
}

pub fn omegafold(form: &FormState) -> Result<JobPayload, PayloadError> {
    let job = OmegaFoldJob {
        job_name: text(form, keys::JOB_NAME),
        protein_sequence: fasta_sequence(form),
        num_cycle: text(form, keys::NUM_CYCLE),
        num_pseudo_msas: text(form, keys::NUM_PSEUDO_MSAS),
        pseudo_msa_mask: text(form, keys::PSEUDO_MSA_MASK),
        email: text(form, keys::EMAIL),
        make_results_public: form.flag(keys::MAKE_RESULTS_PUBLIC),
        force_computation: form.flag(keys::FORCE_COMPUTATION),
    };
    JobPayload::json(Tool::OmegaFold, endpoint(Tool::OmegaFold)?, &job.job_name, &job)
}
