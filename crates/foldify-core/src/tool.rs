use serde::{Deserialize, Serialize};

/// Prediction tools the frontend can submit to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    AlphaFold2,
    AlphaFold3,
    ColabFold,
    EsmFold,
    OmegaFold,
    MultiFold,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::AlphaFold2,
        Tool::AlphaFold3,
        Tool::ColabFold,
        Tool::EsmFold,
        Tool::OmegaFold,
        Tool::MultiFold,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "alphafold2" | "alphafold" => Some(Tool::AlphaFold2),
            "alphafold3" => Some(Tool::AlphaFold3),
            "colabfold" => Some(Tool::ColabFold),
            "esmfold" => Some(Tool::EsmFold),
            "omegafold" => Some(Tool::OmegaFold),
            "multifold" => Some(Tool::MultiFold),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Tool::AlphaFold2 => "alphafold2",
            Tool::AlphaFold3 => "alphafold3",
            Tool::ColabFold => "colabfold",
            Tool::EsmFold => "esmfold",
            Tool::OmegaFold => "omegafold",
            Tool::MultiFold => "multifold",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::AlphaFold2 => "AlphaFold2",
            Tool::AlphaFold3 => "AlphaFold3",
            Tool::ColabFold => "ColabFold",
            Tool::EsmFold => "ESMFold",
            Tool::OmegaFold => "OmegaFold",
            Tool::MultiFold => "MultiFold",
        }
    }

    /// Job-name suffix used when the tool runs as part of a MultiFold batch
    pub fn suffix_tag(&self) -> &'static str {
        match self {
            Tool::AlphaFold2 => "-AF2",
            Tool::AlphaFold3 => "-AF3",
            Tool::ColabFold => "-CBF",
            Tool::EsmFold => "-EMF",
            Tool::OmegaFold => "-OMF",
            Tool::MultiFold => "",
        }
    }

    /// Backend endpoint receiving this tool's submissions.
    /// MultiFold has none of its own; it fans out to the other tools.
    pub fn submit_endpoint(&self) -> Option<&'static str> {
        match self {
            Tool::AlphaFold2 => Some("/api/flask/alphafold/submit"),
            Tool::AlphaFold3 => Some("/api/flask/alphafold3/v1/submit"),
            Tool::ColabFold => Some("/api/flask/colabfold/submit"),
            Tool::EsmFold => Some("/api/flask/esmfold/submit"),
            Tool::OmegaFold => Some("/api/flask/omegafold/submit"),
            Tool::MultiFold => None,
        }
    }

    /// Whether the tool can be picked inside a MultiFold batch
    pub fn is_multifold_member(&self) -> bool {
        *self != Tool::MultiFold
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

pub const ALPHAFOLD3_JSON_ENDPOINT: &str = "/api/flask/alphafold3/v1/submit/json";
