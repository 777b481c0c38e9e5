use serde::{Deserialize, Serialize};

/// How the sequence text box is being filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Bare residue letters, possibly wrapped across lines
    #[serde(alias = "amino")]
    Plain,
    Fasta,
}

impl InputMode {
    /// Auto-detect the mode from content
    pub fn detect(content: &str) -> Self {
        if content.trim_start().starts_with('>') {
            InputMode::Fasta
        } else {
            InputMode::Plain
        }
    }
}

/// Kind of an uploaded file, judged by its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// mmCIF chemical component dictionary
    Ccd,
    /// AlphaFold3 input document
    Json,
    Unknown,
}

impl AttachmentKind {
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".cif") {
            AttachmentKind::Ccd
        } else if lower.ends_with(".json") {
            AttachmentKind::Json
        } else {
            AttachmentKind::Unknown
        }
    }
}
