//! AlphaFold3 job documents.
//!
//! Sent as multipart: the job as JSON in the `data` part, plus the optional
//! custom CCD file. Sequence entries are externally tagged by molecule
//! kind, the way the AlphaFold3 input dialect spells them.

use foldify_core::entity::{BondAtom, BondedAtomPair, Entity, EntityKind};
use foldify_core::form::{keys, AttachmentSlot, FormState};
use foldify_core::tool::{Tool, ALPHAFOLD3_JSON_ENDPOINT};
use serde::{Deserialize, Serialize};

use crate::body::{FilePart, JobPayload};
use crate::error::PayloadError;

pub const DIALECT: &str = "alphafold3";
pub const DEFAULT_TEMPLATE_COUNT: i64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub id: Vec<String>,
    pub sequence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ligand {
    pub id: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccd_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceEntry {
    Protein(Chain),
    Rna(Chain),
    Dna(Chain),
    Ligand(Ligand),
}

impl From<&Entity> for SequenceEntry {
    fn from(entity: &Entity) -> Self {
        let id = entity.copy_ids();
        let chain = || Chain {
            id: id.clone(),
            sequence: entity.input.clone(),
        };
        match entity.kind {
            EntityKind::Protein => SequenceEntry::Protein(chain()),
            EntityKind::Rna => SequenceEntry::Rna(chain()),
            EntityKind::Dna => SequenceEntry::Dna(chain()),
            EntityKind::Ligand | EntityKind::LigandCcd => SequenceEntry::Ligand(Ligand {
                id: id.clone(),
                ccd_codes: Some(entity.input.split(',').map(str::to_string).collect()),
                smiles: None,
            }),
            EntityKind::LigandSmiles => SequenceEntry::Ligand(Ligand {
                id: id.clone(),
                ccd_codes: None,
                smiles: Some(entity.input.clone()),
            }),
        }
    }
}

/// `[chain id, residue number, atom name]`
pub type WireAtom = (String, u32, String);

fn wire_atom(atom: &BondAtom) -> WireAtom {
    (atom.id.clone(), atom.residue, atom.atom.clone())
}

/// Complete pairs only; `None` when nothing is left to send
pub fn bonded_atom_pairs(bonds: &[BondedAtomPair]) -> Option<Vec<(WireAtom, WireAtom)>> {
    let pairs: Vec<_> = bonds
        .iter()
        .filter(|pair| pair.is_complete())
        .map(|pair| (wire_atom(&pair.0), wire_atom(&pair.1)))
        .collect();
    (!pairs.is_empty()).then_some(pairs)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaFold3Job {
    pub name: String,
    pub model_seeds: Vec<u64>,
    pub sequences: Vec<SequenceEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonded_atom_pairs: Option<Vec<(WireAtom, WireAtom)>>,
    #[serde(rename = "userCCDPath", skip_serializing_if = "Option::is_none")]
    pub user_ccd_path: Option<String>,
    pub dialect: String,
    pub version: u8,
    pub public: bool,
    pub email: String,
    pub large_input: bool,
    pub force_computation: bool,
    #[serde(rename = "precomputedMSA")]
    pub precomputed_msa: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precomputed_templates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_templates: Option<i64>,
}

/// Parse `1,2,3`; validation has already checked the shape
pub fn parse_model_seeds(raw: &str) -> Result<Vec<u64>, PayloadError> {
    raw.split(',')
        .map(|seed| {
            seed.trim()
                .parse()
                .map_err(|_| PayloadError::InvalidModelSeed(seed.to_string()))
        })
        .collect()
}

pub fn job(form: &FormState) -> Result<AlphaFold3Job, PayloadError> {
    let ccd = form.attachment(AttachmentSlot::UserCcd);
    let templates = form.flag(keys::PRECOMPUTED_TEMPLATES);

    Ok(AlphaFold3Job {
        name: form.text(keys::JOB_NAME).to_string(),
        model_seeds: parse_model_seeds(form.text(keys::MODEL_SEEDS))?,
        sequences: form.entities.iter().map(SequenceEntry::from).collect(),
        bonded_atom_pairs: bonded_atom_pairs(&form.bonds),
        user_ccd_path: ccd.map(|a| a.file_name.clone()),
        dialect: DIALECT.to_string(),
        version: if ccd.is_some() { 3 } else { 1 },
        public: form.flag(keys::MAKE_RESULTS_PUBLIC),
        email: form.text(keys::EMAIL).to_string(),
        large_input: form.flag(keys::LARGE_INPUT),
        force_computation: form.flag(keys::FORCE_COMPUTATION),
        precomputed_msa: form.flag(keys::PRECOMPUTED_MSA),
        precomputed_templates: templates.then_some(true),
        number_of_templates: templates.then(|| {
            form.number(keys::NUMBER_OF_TEMPLATES)
                .unwrap_or(DEFAULT_TEMPLATE_COUNT)
        }),
    })
}

pub fn build(form: &FormState) -> Result<JobPayload, PayloadError> {
    let job = job(form)?;
    let files = form
        .attachment(AttachmentSlot::UserCcd)
        .map(|a| FilePart::from_attachment(keys::USER_CCD_FILE, a))
        .into_iter()
        .collect();
    let endpoint = Tool::AlphaFold3
        .submit_endpoint()
        .ok_or(PayloadError::NoEndpoint(Tool::AlphaFold3))?;

    JobPayload::multipart(Tool::AlphaFold3, endpoint, &job.name, &job, files)
}

/// Metadata sent next to an uploaded AlphaFold3 input document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonUploadJob {
    pub name: String,
    pub public: bool,
    pub email: String,
    pub force_computation: bool,
    pub large_input: bool,
}

pub fn json_upload(form: &FormState) -> Result<JobPayload, PayloadError> {
    let file = form
        .attachment(AttachmentSlot::JsonInput)
        .ok_or(PayloadError::MissingAttachment(keys::JSON_FILE))?;
    let job = JsonUploadJob {
        name: form.text(keys::JOB_NAME).to_string(),
        public: form.flag(keys::MAKE_RESULTS_PUBLIC),
        email: form.text(keys::EMAIL).to_string(),
        force_computation: form.flag(keys::FORCE_COMPUTATION),
        large_input: form.flag(keys::LARGE_INPUT),
    };

    JobPayload::multipart(
        Tool::AlphaFold3,
        ALPHAFOLD3_JSON_ENDPOINT,
        &job.name,
        &job,
        vec![FilePart::from_attachment(keys::JSON_FILE, file)],
    )
}
