//! One tool page's form, its live validation, and its submit button.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use foldify_core::entity::{BondAtom, BondedAtomPair, Entity, EntityField, EntityKind};
use foldify_core::form::{keys, Attachment, AttachmentSlot, FieldValue, FormState};
use foldify_core::tool::Tool;
use foldify_formats::{switch_mode, to_amino_only, InputMode};
use foldify_validation::{validate, validate_attachments, ToolProfile, ValidationResult};
use tracing::{debug, info};

use crate::client::BackendClient;
use crate::error::{SubmitError, SubmitRejected};
use crate::multifold::{submit_multifold, MultiFoldReport};

#[derive(Debug)]
pub enum SubmitOutcome {
    Single(Result<String, SubmitError>),
    MultiFold(MultiFoldReport),
}

/// Releases the in-flight flag however the submission ends
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FormController<C: BackendClient + ?Sized> {
    client: Arc<C>,
    form: FormState,
    result: ValidationResult,
    files: ValidationResult,
    in_flight: AtomicBool,
}

impl<C: BackendClient + ?Sized> FormController<C> {
    pub fn new(client: Arc<C>, form: FormState) -> Self {
        let result = validate(&form);
        let files = validate_attachments(&form);
        Self {
            client,
            form,
            result,
            files,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    /// Validity of the uploaded files
    pub fn files(&self) -> &ValidationResult {
        &self.files
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn recompute(&mut self, cause: &str) {
        self.result = validate(&self.form);
        debug!(
            "revalidated {} form after {} change: {} errors",
            self.form.tool.key(),
            cause,
            self.result.errors().len()
        );
    }

    /// Set a plain field. Returns whether validation was recomputed.
    pub fn set_field(&mut self, key: &str, value: impl Into<FieldValue>) -> bool {
        let mut value = value.into();
        if self.form.tool == Tool::MultiFold && key == keys::PROTEIN_SEQUENCE {
            if let FieldValue::Text(text) = &value {
                value = FieldValue::Text(to_amino_only(text));
            }
        }
        self.form.set(key, value);

        if !ToolProfile::for_form(&self.form).watches(key) {
            return false;
        }
        self.recompute(key);
        if key == keys::JSON_MODE {
            self.files = validate_attachments(&self.form);
        }
        true
    }

    /// Convert the sequence box to the other input mode
    pub fn switch_input_mode(&mut self, to: InputMode) {
        let converted = switch_mode(
            self.form.text(keys::PROTEIN_SEQUENCE),
            to,
            self.form.text(keys::JOB_NAME),
        );
        self.set_field(keys::PROTEIN_SEQUENCE, converted);
    }

    pub fn set_selected_tools(&mut self, tools: Vec<String>) {
        self.form.selected_tools = tools;
        if ToolProfile::for_form(&self.form).watches(keys::SELECTED_TOOLS) {
            self.recompute(keys::SELECTED_TOOLS);
        }
    }

    pub fn add_entity(&mut self) {
        self.form.entities.push(Entity::empty_protein());
        self.recompute(keys::SEQUENCES);
    }

    pub fn remove_entity(&mut self, index: usize) {
        if index < self.form.entities.len() {
            self.form.entities.remove(index);
            self.recompute(keys::SEQUENCES);
        }
    }

    /// Edit one field of an entity; unknown kinds and indices are ignored
    pub fn set_entity(&mut self, index: usize, field: EntityField, value: &str) {
        let Some(entity) = self.form.entities.get_mut(index) else {
            return;
        };
        match field {
            EntityField::Kind => match EntityKind::from_key(value) {
                Some(kind) => entity.kind = kind,
                None => return,
            },
            EntityField::Copies => entity.copies = value.to_string(),
            EntityField::Input => entity.input = value.to_string(),
        }
        self.recompute(keys::SEQUENCES);
    }

    pub fn add_bond(&mut self) {
        self.form.bonds.push(BondedAtomPair::default());
    }

    pub fn remove_bond(&mut self, index: usize) {
        if index < self.form.bonds.len() {
            self.form.bonds.remove(index);
        }
    }

    /// Replace one side (0 or 1) of a bond
    pub fn set_bond_atom(&mut self, index: usize, side: usize, atom: BondAtom) {
        if let Some(pair) = self.form.bonds.get_mut(index) {
            match side {
                0 => pair.0 = atom,
                1 => pair.1 = atom,
                _ => {}
            }
        }
    }

    pub fn set_attachment(&mut self, slot: AttachmentSlot, attachment: Option<Attachment>) {
        self.form.set_attachment(slot, attachment);
        self.files = validate_attachments(&self.form);
    }

    /// Build and send the form.
    ///
    /// The in-flight flag is claimed before the first await, so a second
    /// call made while the first is pending is turned away instead of
    /// sending a duplicate job.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitRejected> {
        if !self.result.is_valid() {
            return Err(SubmitRejected::Invalid(self.result.clone()));
        }
        if !self.files.is_valid() {
            return Err(SubmitRejected::Invalid(self.files.clone()));
        }
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(SubmitRejected::InFlight);
        }
        let _guard = FlightGuard(&self.in_flight);

        if self.form.tool == Tool::MultiFold {
            let report = submit_multifold(self.client.as_ref(), &self.form).await;
            return Ok(SubmitOutcome::MultiFold(report));
        }

        let payload = foldify_payload::build(&self.form)?;
        info!("submitting {} job {}", payload.tool.key(), payload.job_name);
        let outcome = self.client.submit(payload.endpoint, &payload.body).await;
        Ok(SubmitOutcome::Single(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use foldify_payload::SubmissionBody;
    use foldify_validation::rules;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct Recorder {
        endpoints: Mutex<Vec<String>>,
        release: Notify,
        hold: bool,
    }

    #[async_trait]
    impl BackendClient for Recorder {
        async fn submit(&self, endpoint: &str, _body: &SubmissionBody) -> Result<String, SubmitError> {
            self.endpoints.lock().unwrap().push(endpoint.to_string());
            if self.hold {
                self.release.notified().await;
            }
            Ok("Job submitted".to_string())
        }
    }

    fn esmfold_form() -> FormState {
        let mut form = FormState::new(Tool::EsmFold);
        form.set(keys::EMAIL, "a@b.co");
        form.set(keys::PROTEIN_SEQUENCE, "MKTAYI");
        form
    }

    #[test]
    fn test_unwatched_field_does_not_recompute() {
        let mut form = FormState::new(Tool::AlphaFold2);
        form.set(keys::PROTEIN_SEQUENCE, "MKT");
        let mut controller = FormController::new(Arc::new(Recorder::default()), form);
        assert_eq!(controller.result().error(keys::EMAIL), Some(rules::EMAIL_REQUIRED));

        assert!(!controller.set_field(keys::DB_PRESET, "reduced_dbs"));
        assert!(controller.set_field(keys::EMAIL, "a@b.co"));
        assert!(controller.result().is_valid());
    }

    #[test]
    fn test_entity_edits_recompute() {
        let mut form = FormState::new(Tool::AlphaFold3);
        form.set(keys::EMAIL, "a@b.co");
        let mut controller = FormController::new(Arc::new(Recorder::default()), form);
        assert_eq!(
            controller.result().error("input-0"),
            Some(rules::ENTITY_INPUT_REQUIRED)
        );

        controller.set_entity(0, EntityField::Input, "MKT");
        controller.set_entity(0, EntityField::Copies, "A");
        assert!(controller.result().is_valid());

        controller.add_entity();
        assert_eq!(
            controller.result().error("copies-1"),
            Some(rules::COPIES_REQUIRED)
        );
        controller.remove_entity(1);
        assert!(controller.result().is_valid());
    }

    #[test]
    fn test_multifold_sequence_drops_headers() {
        let mut controller =
            FormController::new(Arc::new(Recorder::default()), FormState::new(Tool::MultiFold));
        controller.set_field(keys::PROTEIN_SEQUENCE, ">x\nMKT\nAYI");
        assert_eq!(controller.form().text(keys::PROTEIN_SEQUENCE), "MKTAYI");
    }

    #[test]
    fn test_switch_input_mode() {
        let mut controller = FormController::new(Arc::new(Recorder::default()), esmfold_form());
        controller.switch_input_mode(InputMode::Fasta);
        assert!(controller.form().text(keys::PROTEIN_SEQUENCE).starts_with('>'));
        controller.switch_input_mode(InputMode::Plain);
        assert_eq!(controller.form().text(keys::PROTEIN_SEQUENCE), "MKTAYI");
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let client = Arc::new(Recorder::default());
        let controller = FormController::new(client.clone(), FormState::new(Tool::EsmFold));
        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, SubmitRejected::Invalid(_)));
        assert!(client.endpoints.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_submission() {
        let client = Arc::new(Recorder::default());
        let controller = FormController::new(client.clone(), esmfold_form());
        let outcome = controller.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Single(Ok(ref m)) if m == "Job submitted"));
        assert_eq!(
            *client.endpoints.lock().unwrap(),
            vec!["/api/flask/esmfold/submit".to_string()]
        );
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_double_submit_is_rejected() {
        let client = Arc::new(Recorder {
            hold: true,
            ..Recorder::default()
        });
        let controller = FormController::new(client.clone(), esmfold_form());

        let first = controller.submit();
        let second = async {
            tokio::task::yield_now().await;
            let rejected = controller.submit().await;
            client.release.notify_one();
            rejected
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first, Ok(SubmitOutcome::Single(Ok(_)))));
        assert!(matches!(second, Err(SubmitRejected::InFlight)));
        assert_eq!(client.endpoints.lock().unwrap().len(), 1);
        assert!(!controller.is_submitting());
    }
}
