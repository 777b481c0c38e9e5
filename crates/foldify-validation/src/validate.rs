use std::collections::BTreeMap;

use foldify_core::form::{keys, AttachmentSlot, FormState};
use serde::{Deserialize, Serialize};

use crate::profile::{Check, FileCheck, ToolProfile};
use crate::rules;

/// Outcome of a whole-form validation pass.
///
/// `is_valid` is derived from `errors` and cannot drift from it; warnings
/// never block submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawValidationResult")]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
    warnings: BTreeMap<String, String>,
    is_valid: bool,
}

#[derive(Deserialize)]
struct RawValidationResult {
    #[serde(default)]
    errors: BTreeMap<String, String>,
    #[serde(default)]
    warnings: BTreeMap<String, String>,
}

impl From<RawValidationResult> for ValidationResult {
    fn from(raw: RawValidationResult) -> Self {
        Self::new(raw.errors, raw.warnings)
    }
}

impl ValidationResult {
    pub fn new(errors: BTreeMap<String, String>, warnings: BTreeMap<String, String>) -> Self {
        let is_valid = errors.is_empty();
        Self {
            errors,
            warnings,
            is_valid,
        }
    }

    pub fn valid() -> Self {
        Self::new(BTreeMap::new(), BTreeMap::new())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn warnings(&self) -> &BTreeMap<String, String> {
        &self.warnings
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn warning(&self, key: &str) -> Option<&str> {
        self.warnings.get(key).map(String::as_str)
    }
}

#[derive(Default)]
struct Collector {
    errors: BTreeMap<String, String>,
    warnings: BTreeMap<String, String>,
}

impl Collector {
    fn error(&mut self, key: impl Into<String>, message: Option<String>) {
        if let Some(message) = message {
            self.errors.insert(key.into(), message);
        }
    }

    fn warning(&mut self, key: impl Into<String>, message: Option<String>) {
        if let Some(message) = message {
            self.warnings.insert(key.into(), message);
        }
    }

    fn finish(self) -> ValidationResult {
        ValidationResult::new(self.errors, self.warnings)
    }
}

/// Recompute every check the form's tool runs.
pub fn validate(form: &FormState) -> ValidationResult {
    let profile = ToolProfile::for_form(form);
    let mut out = Collector::default();

    for check in profile.checks {
        apply(*check, form, &mut out);
    }

    out.finish()
}

fn apply(check: Check, form: &FormState, out: &mut Collector) {
    match check {
        Check::JobName => out.error(keys::JOB_NAME, rules::job_name(form.text(keys::JOB_NAME))),
        Check::Email => out.error(keys::EMAIL, rules::email(form.text(keys::EMAIL))),
        Check::ProteinSequence => out.error(
            keys::PROTEIN_SEQUENCE,
            rules::protein_sequence(form.text(keys::PROTEIN_SEQUENCE)),
        ),
        Check::MultiSequenceHint => out.warning(
            keys::PROTEIN_SEQUENCE,
            rules::multi_sequence_warning(
                form.text(keys::PROTEIN_SEQUENCE),
                form.text(keys::MODEL_PRESET),
            ),
        ),
        Check::TemplateDate => out.error(
            keys::MAX_TEMPLATE_DATE,
            rules::template_date(form.text(keys::MAX_TEMPLATE_DATE)),
        ),
        Check::MultiFoldSequence => out.error(
            keys::PROTEIN_SEQUENCE,
            rules::multifold_sequence(form.text(keys::PROTEIN_SEQUENCE)),
        ),
        Check::ToolSelection => {
            out.error(keys::SELECTED_TOOLS, rules::selected_tools(&form.selected_tools))
        }
        Check::ModelSeeds => {
            out.error(keys::MODEL_SEEDS, rules::model_seeds(form.text(keys::MODEL_SEEDS)))
        }
        Check::Entities => entities(form, out),
    }
}

fn entities(form: &FormState, out: &mut Collector) {
    for (index, entity) in form.entities.iter().enumerate() {
        out.error(keys::entity("input", index), rules::entity_input(entity));
        out.error(keys::entity("copies", index), rules::entity_copies(entity));
    }

    for index in rules::duplicate_copy_ids(&form.entities) {
        let key = keys::entity("copies", index);
        if !out.errors.contains_key(&key) {
            out.error(key, Some(rules::COPIES_DUPLICATE.to_string()));
        }
    }

    // token overflow overrides the syntax message on the same key
    for (index, entity) in form.entities.iter().enumerate() {
        if let Some(overflow) = rules::entity_token_limit(entity) {
            let key = keys::entity("input", index);
            out.warning(key.clone(), Some(overflow.warning));
            out.error(key, Some(overflow.error));
        }
    }
}

/// Validity of the uploaded files, kept apart from [`validate`]
pub fn validate_attachments(form: &FormState) -> ValidationResult {
    let profile = ToolProfile::for_form(form);
    let mut out = Collector::default();

    for check in profile.file_checks {
        match check {
            FileCheck::UserCcd => out.error(
                keys::USER_CCD_FILE,
                rules::ccd_attachment(form.attachment(AttachmentSlot::UserCcd)),
            ),
            FileCheck::JsonInput => out.error(
                keys::JSON_FILE,
                rules::json_attachment(form.attachment(AttachmentSlot::JsonInput)),
            ),
        }
    }

    out.finish()
}
