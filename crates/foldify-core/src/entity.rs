use serde::{Deserialize, Serialize};

use crate::sequence::MoleculeType;

/// Input type of an AlphaFold3 entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "protein")]
    Protein,
    #[serde(rename = "rna")]
    Rna,
    #[serde(rename = "dna")]
    Dna,
    /// Ligand given as standard CCD codes
    #[serde(rename = "ligand")]
    Ligand,
    /// Ligand given as codes from a user-supplied CCD file
    #[serde(rename = "ligand-ccd")]
    LigandCcd,
    #[serde(rename = "ligand-smiles")]
    LigandSmiles,
}

impl EntityKind {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "protein" => Some(EntityKind::Protein),
            "rna" => Some(EntityKind::Rna),
            "dna" => Some(EntityKind::Dna),
            "ligand" => Some(EntityKind::Ligand),
            "ligand-ccd" => Some(EntityKind::LigandCcd),
            "ligand-smiles" => Some(EntityKind::LigandSmiles),
            _ => None,
        }
    }

    pub fn molecule_type(&self) -> MoleculeType {
        match self {
            EntityKind::Protein => MoleculeType::Protein,
            EntityKind::Rna => MoleculeType::Rna,
            EntityKind::Dna => MoleculeType::Dna,
            EntityKind::Ligand | EntityKind::LigandCcd | EntityKind::LigandSmiles => {
                MoleculeType::Ligand
            }
        }
    }

    /// Polymer inputs are written as one uppercase letter per residue
    pub fn is_polymer(&self) -> bool {
        matches!(
            self,
            EntityKind::Protein | EntityKind::Rna | EntityKind::Dna
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Protein => "Protein",
            EntityKind::Rna => "RNA",
            EntityKind::Dna => "DNA",
            EntityKind::Ligand => "Ligand (CCD)",
            EntityKind::LigandCcd => "Ligand (Custom CCD)",
            EntityKind::LigandSmiles => "Ligand (SMILES)",
        }
    }
}

/// One entity row of the AlphaFold3 form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Comma-separated chain letters, e.g. "A,B"
    #[serde(default)]
    pub copies: String,
    /// Residue string, CCD code list or SMILES depending on `kind`
    #[serde(default)]
    pub input: String,
}

impl Entity {
    pub fn new(kind: EntityKind, copies: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            kind,
            copies: copies.into(),
            input: input.into(),
        }
    }

    pub fn empty_protein() -> Self {
        Self::new(EntityKind::Protein, "", "")
    }

    pub fn copy_ids(&self) -> Vec<String> {
        self.copies.split(',').map(str::to_string).collect()
    }

    /// Number of chains this entity expands to; an empty copy list counts as one
    pub fn copy_count(&self) -> usize {
        if self.copies.is_empty() {
            1
        } else {
            self.copies.split(',').count()
        }
    }

    /// Model tokens consumed: input length times copies
    pub fn token_count(&self) -> usize {
        if self.input.is_empty() {
            return 0;
        }
        self.input.len() * self.copy_count()
    }
}

/// Which column of an entity row an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityField {
    Kind,
    Copies,
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondAtom {
    #[serde(default)]
    pub id: String,
    pub residue: u32,
    #[serde(default)]
    pub atom: String,
}

impl BondAtom {
    pub fn new(id: impl Into<String>, residue: u32, atom: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            residue,
            atom: atom.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.atom.is_empty()
    }
}

impl Default for BondAtom {
    fn default() -> Self {
        Self::new("", 1, "")
    }
}

/// A covalent bond between two atoms, serialized as a two-element array
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BondedAtomPair(pub BondAtom, pub BondAtom);

impl BondedAtomPair {
    pub fn is_complete(&self) -> bool {
        self.0.is_complete() && self.1.is_complete()
    }
}
