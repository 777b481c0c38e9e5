use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::entity::{BondedAtomPair, Entity};
use crate::slug::random_job_name;
use crate::tool::Tool;

/// Form field names, shared by validation error keys and payload builders.
pub mod keys {
    pub const JOB_NAME: &str = "jobName";
    pub const EMAIL: &str = "email";
    pub const PROTEIN_SEQUENCE: &str = "proteinSequence";
    pub const MODEL_PRESET: &str = "modelPreset";
    pub const MODEL_SEEDS: &str = "modelSeeds";
    pub const SELECTED_TOOLS: &str = "selectedTools";
    pub const SEQUENCES: &str = "sequences";
    pub const MAX_TEMPLATE_DATE: &str = "maxTemplateDate";
    pub const PREDICTIONS_PER_MODEL: &str = "predictionsPerModel";
    pub const DB_PRESET: &str = "dbPreset";
    pub const VERSION: &str = "version";
    pub const RUN_RELAX: &str = "runRelax";
    pub const REUSE_MSAS: &str = "reuseMSAs";
    pub const FORCE_COMPUTATION: &str = "forceComputation";
    pub const MAKE_RESULTS_PUBLIC: &str = "makeResultsPublic";
    pub const TEMPLATE_MODE: &str = "templateMode";
    pub const NUM_RELAX: &str = "numRelax";
    pub const MSA_MODE: &str = "msaMode";
    pub const PAIR_MODE: &str = "pairMode";
    pub const NUM_MODELS: &str = "numModels";
    pub const NUM_RECYCLES: &str = "numRecycles";
    pub const RECYCLE_TOLERANCE: &str = "recycleTolerance";
    pub const MAX_MSA: &str = "maxMSA";
    pub const NUM_SEEDS: &str = "numSeeds";
    pub const USE_DROPOUT: &str = "useDropout";
    pub const NUM_COPIES: &str = "numCopies";
    pub const NUM_CYCLE: &str = "numCycle";
    pub const NUM_PSEUDO_MSAS: &str = "numPseudoMSAs";
    pub const PSEUDO_MSA_MASK: &str = "pseudoMSAMask";
    pub const LARGE_INPUT: &str = "largeInput";
    pub const PRECOMPUTED_MSA: &str = "precomputedMSA";
    pub const PRECOMPUTED_TEMPLATES: &str = "precomputedTemplates";
    pub const NUMBER_OF_TEMPLATES: &str = "numberOfTemplates";
    pub const USER_CCD_FILE: &str = "userCCDFile";
    pub const JSON_FILE: &str = "jsonFile";
    /// AlphaFold3 page switched to uploading a finished input document
    pub const JSON_MODE: &str = "jsonMode";

    /// Key of a per-entity field, e.g. `input-2`
    pub fn entity(field: &str, index: usize) -> String {
        format!("{}-{}", field, index)
    }
}

/// A single form value as typed by the user.
///
/// JSON numbers are kept in their text form, which is what the backend
/// receives for every dropdown, so `5` and `"5"` read the same.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FieldValue, E> {
        Ok(FieldValue::Flag(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(String::new()))
    }
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentSlot {
    /// Custom chemical component dictionary (`.cif`)
    UserCcd,
    /// Complete AlphaFold3 input document (`.json`)
    JsonInput,
}

/// A file the user picked in an upload control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub slot: AttachmentSlot,
    pub file_name: String,
    #[serde(default)]
    pub content: String,
}

impl Attachment {
    pub fn new(slot: AttachmentSlot, file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            slot,
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Everything the user has entered on one tool page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub tool: Tool,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub bonds: Vec<BondedAtomPair>,
    /// Tool keys picked on the MultiFold page, kept verbatim
    #[serde(default)]
    pub selected_tools: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl FormState {
    /// A fresh form prefilled with the tool's defaults and a random job name
    pub fn new(tool: Tool) -> Self {
        let mut form = Self::empty(tool);
        form.set(keys::JOB_NAME, random_job_name());
        for (key, value) in tool_defaults(tool) {
            form.fields.insert(key.to_string(), value);
        }
        if tool == Tool::AlphaFold3 {
            form.entities.push(Entity::empty_protein());
            form.bonds.push(BondedAtomPair::default());
        }
        form
    }

    pub fn empty(tool: Tool) -> Self {
        Self {
            tool,
            fields: BTreeMap::new(),
            entities: Vec::new(),
            bonds: Vec::new(),
            selected_tools: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Text value of a field; missing and non-text fields read as empty
    pub fn text(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(FieldValue::Flag(true)))
    }

    pub fn number(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn attachment(&self, slot: AttachmentSlot) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.slot == slot)
    }

    /// Replace the attachment in `slot`, or clear it with `None`
    pub fn set_attachment(&mut self, slot: AttachmentSlot, attachment: Option<Attachment>) {
        self.attachments.retain(|a| a.slot != slot);
        if let Some(a) = attachment {
            self.attachments.push(a);
        }
    }
}

/// Initial field values for each tool's page
pub fn tool_defaults(tool: Tool) -> Vec<(&'static str, FieldValue)> {
    let mut defaults: Vec<(&'static str, FieldValue)> = vec![
        (keys::EMAIL, "".into()),
        (keys::FORCE_COMPUTATION, false.into()),
        (keys::MAKE_RESULTS_PUBLIC, false.into()),
    ];

    let specific: Vec<(&'static str, FieldValue)> = match tool {
        Tool::AlphaFold2 => vec![
            (keys::PROTEIN_SEQUENCE, "".into()),
            (keys::MAX_TEMPLATE_DATE, "".into()),
            (keys::PREDICTIONS_PER_MODEL, "5".into()),
            (keys::DB_PRESET, "full_dbs".into()),
            (keys::MODEL_PRESET, "monomer".into()),
            (keys::VERSION, "Alphafold 2.3.1".into()),
            (keys::RUN_RELAX, true.into()),
            (keys::REUSE_MSAS, false.into()),
        ],
        Tool::ColabFold => vec![
            (keys::PROTEIN_SEQUENCE, "".into()),
            (keys::TEMPLATE_MODE, "none".into()),
            (keys::NUM_RELAX, "0".into()),
            (keys::MSA_MODE, "mmseqs2_uniref_env".into()),
            (keys::PAIR_MODE, "unpaired_paired".into()),
            (keys::MODEL_PRESET, "alphafold2_ptm".into()),
            (keys::NUM_MODELS, "5".into()),
            (keys::NUM_RECYCLES, "3".into()),
            (keys::RECYCLE_TOLERANCE, "auto".into()),
            (keys::MAX_MSA, "auto".into()),
            (keys::NUM_SEEDS, "1".into()),
            (keys::VERSION, "Colabfold 1.5.2".into()),
            (keys::USE_DROPOUT, false.into()),
        ],
        Tool::EsmFold => vec![
            (keys::PROTEIN_SEQUENCE, "".into()),
            (keys::NUM_RECYCLES, "3".into()),
            (keys::NUM_COPIES, "1".into()),
        ],
        Tool::OmegaFold => vec![
            (keys::PROTEIN_SEQUENCE, "".into()),
            (keys::NUM_CYCLE, "4".into()),
            (keys::NUM_PSEUDO_MSAS, "1".into()),
            (keys::PSEUDO_MSA_MASK, "0.2".into()),
        ],
        Tool::AlphaFold3 => vec![
            (keys::MODEL_SEEDS, "1".into()),
            (keys::LARGE_INPUT, false.into()),
            (keys::PRECOMPUTED_MSA, true.into()),
            (keys::PRECOMPUTED_TEMPLATES, false.into()),
            (keys::NUMBER_OF_TEMPLATES, 20i64.into()),
        ],
        Tool::MultiFold => vec![(keys::PROTEIN_SEQUENCE, "".into())],
    };

    defaults.extend(specific);
    defaults
}
