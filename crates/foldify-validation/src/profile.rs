use foldify_core::form::{keys, FormState};
use foldify_core::tool::{Tool, ALPHAFOLD3_JSON_ENDPOINT};

/// A form-level rule, applied by [`crate::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    JobName,
    Email,
    ProteinSequence,
    /// AlphaFold2 note about several FASTA records
    MultiSequenceHint,
    TemplateDate,
    MultiFoldSequence,
    ToolSelection,
    ModelSeeds,
    Entities,
}

/// Upload rules, reported apart from the main result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCheck {
    UserCcd,
    JsonInput,
}

/// What one tool page validates and when it recomputes.
#[derive(Debug)]
pub struct ToolProfile {
    pub tool: Tool,
    pub checks: &'static [Check],
    pub file_checks: &'static [FileCheck],
    /// Field keys whose edits trigger a recompute
    pub watched: &'static [&'static str],
    pub endpoint: Option<&'static str>,
}

const SINGLE_SEQUENCE_CHECKS: &[Check] = &[Check::JobName, Check::Email, Check::ProteinSequence];
const SINGLE_SEQUENCE_WATCHED: &[&str] = &[keys::JOB_NAME, keys::EMAIL, keys::PROTEIN_SEQUENCE];

static ALPHAFOLD2: ToolProfile = ToolProfile {
    tool: Tool::AlphaFold2,
    checks: &[
        Check::JobName,
        Check::Email,
        Check::ProteinSequence,
        Check::MultiSequenceHint,
        Check::TemplateDate,
    ],
    file_checks: &[],
    watched: &[
        keys::JOB_NAME,
        keys::EMAIL,
        keys::PROTEIN_SEQUENCE,
        keys::MODEL_PRESET,
        keys::MAX_TEMPLATE_DATE,
    ],
    endpoint: Some("/api/flask/alphafold/submit"),
};

static COLABFOLD: ToolProfile = ToolProfile {
    tool: Tool::ColabFold,
    checks: SINGLE_SEQUENCE_CHECKS,
    file_checks: &[],
    watched: SINGLE_SEQUENCE_WATCHED,
    endpoint: Some("/api/flask/colabfold/submit"),
};

static ESMFOLD: ToolProfile = ToolProfile {
    tool: Tool::EsmFold,
    checks: SINGLE_SEQUENCE_CHECKS,
    file_checks: &[],
    watched: SINGLE_SEQUENCE_WATCHED,
    endpoint: Some("/api/flask/esmfold/submit"),
};

static OMEGAFOLD: ToolProfile = ToolProfile {
    tool: Tool::OmegaFold,
    checks: SINGLE_SEQUENCE_CHECKS,
    file_checks: &[],
    watched: SINGLE_SEQUENCE_WATCHED,
    endpoint: Some("/api/flask/omegafold/submit"),
};

static ALPHAFOLD3: ToolProfile = ToolProfile {
    tool: Tool::AlphaFold3,
    checks: &[Check::JobName, Check::Email, Check::ModelSeeds, Check::Entities],
    file_checks: &[FileCheck::UserCcd],
    watched: &[keys::JOB_NAME, keys::EMAIL, keys::MODEL_SEEDS],
    endpoint: Some("/api/flask/alphafold3/v1/submit"),
};

static ALPHAFOLD3_JSON: ToolProfile = ToolProfile {
    tool: Tool::AlphaFold3,
    checks: &[Check::JobName, Check::Email],
    file_checks: &[FileCheck::JsonInput],
    watched: &[keys::JOB_NAME, keys::EMAIL, keys::JSON_MODE],
    endpoint: Some(ALPHAFOLD3_JSON_ENDPOINT),
};

static MULTIFOLD: ToolProfile = ToolProfile {
    tool: Tool::MultiFold,
    checks: &[
        Check::JobName,
        Check::Email,
        Check::MultiFoldSequence,
        Check::ToolSelection,
    ],
    file_checks: &[],
    watched: &[
        keys::JOB_NAME,
        keys::EMAIL,
        keys::PROTEIN_SEQUENCE,
        keys::SELECTED_TOOLS,
    ],
    endpoint: None,
};

impl ToolProfile {
    pub fn for_tool(tool: Tool) -> &'static ToolProfile {
        match tool {
            Tool::AlphaFold2 => &ALPHAFOLD2,
            Tool::AlphaFold3 => &ALPHAFOLD3,
            Tool::ColabFold => &COLABFOLD,
            Tool::EsmFold => &ESMFOLD,
            Tool::OmegaFold => &OMEGAFOLD,
            Tool::MultiFold => &MULTIFOLD,
        }
    }

    /// Like [`ToolProfile::for_tool`], but honours the AlphaFold3 JSON upload mode
    pub fn for_form(form: &FormState) -> &'static ToolProfile {
        if form.tool == Tool::AlphaFold3 && form.flag(keys::JSON_MODE) {
            &ALPHAFOLD3_JSON
        } else {
            Self::for_tool(form.tool)
        }
    }

    /// Entity edits always count; plain fields only when listed.
    /// The JSON-mode switch is watched on every AlphaFold3 page.
    pub fn watches(&self, key: &str) -> bool {
        self.watched.contains(&key)
            || (self.checks.contains(&Check::Entities) && is_entity_key(key))
            || (self.tool == Tool::AlphaFold3 && key == keys::JSON_MODE)
    }
}

fn is_entity_key(key: &str) -> bool {
    key == keys::SEQUENCES
        || ["type-", "copies-", "input-"]
            .iter()
            .any(|prefix| key.starts_with(prefix))
}
