use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoleculeType {
    Protein,
    Rna,
    Dna,
    Ligand,
}

impl std::fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoleculeType::Protein => write!(f, "protein"),
            MoleculeType::Rna => write!(f, "rna"),
            MoleculeType::Dna => write!(f, "dna"),
            MoleculeType::Ligand => write!(f, "ligand"),
        }
    }
}

/// One FASTA record derived from user input.
///
/// `body` never contains whitespace or a leading `>`; records are rebuilt on
/// every normalization call rather than edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceRecord {
    pub header: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecule_type: Option<MoleculeType>,
}

impl SequenceRecord {
    pub fn new(header: impl Into<String>, body: &str) -> Self {
        let header: String = header.into();
        Self {
            header: header.trim_start_matches('>').to_string(),
            body: body
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .trim_start_matches('>')
                .to_string(),
            molecule_type: None,
        }
    }

    pub fn with_molecule_type(mut self, molecule_type: MoleculeType) -> Self {
        self.molecule_type = Some(molecule_type);
        self
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Render as a two-line FASTA record
    pub fn to_fasta(&self) -> String {
        format!(">{}\n{}", self.header, self.body)
    }
}
