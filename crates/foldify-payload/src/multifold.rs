//! MultiFold fans one sequence out to several tools, each with its stock
//! settings. Job names get a `MULTIFOLD-` prefix and a per-tool tag so the
//! results page can group them.

use foldify_core::entity::{Entity, EntityKind};
use foldify_core::form::{keys, tool_defaults, FormState};
use foldify_core::tool::Tool;
use foldify_formats::to_fasta;

use crate::body::JobPayload;
use crate::error::PayloadError;

pub const JOB_PREFIX: &str = "MULTIFOLD-";

/// Name shared by every job of the batch
pub fn batch_name(form: &FormState) -> String {
    format!("{}{}", JOB_PREFIX, form.text(keys::JOB_NAME))
}

/// The form a member tool would have had if filled in by hand
pub fn member_form(form: &FormState, tool: Tool) -> FormState {
    let base = batch_name(form);
    let sequence = form.text(keys::PROTEIN_SEQUENCE);

    let mut member = FormState::empty(tool);
    for (key, value) in tool_defaults(tool) {
        member.fields.insert(key.to_string(), value);
    }
    member.set(keys::JOB_NAME, format!("{}{}", base, tool.suffix_tag()));
    member.set(keys::EMAIL, form.text(keys::EMAIL));
    member.set(keys::MAKE_RESULTS_PUBLIC, form.flag(keys::MAKE_RESULTS_PUBLIC));
    member.set(keys::FORCE_COMPUTATION, form.flag(keys::FORCE_COMPUTATION));

    if tool == Tool::AlphaFold3 {
        member.entities = vec![Entity::new(EntityKind::Protein, "A", sequence)];
    } else {
        // the FASTA header names the batch, not the member job
        member.set(keys::PROTEIN_SEQUENCE, to_fasta(sequence, &base));
    }
    member
}

/// One entry per selected key, in selection order. Keys that do not name a
/// member tool come back as [`PayloadError::UnknownTool`].
pub fn plan(form: &FormState) -> Vec<(String, Result<JobPayload, PayloadError>)> {
    form.selected_tools
        .iter()
        .map(|key| {
            let payload = match Tool::from_key(key).filter(Tool::is_multifold_member) {
                Some(tool) => crate::build(&member_form(form, tool)),
                None => Err(PayloadError::UnknownTool(key.clone())),
            };
            (key.clone(), payload)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn multifold(tools: &[&str]) -> FormState {
        let mut form = FormState::new(Tool::MultiFold);
        form.set(keys::JOB_NAME, "batch");
        form.set(keys::EMAIL, "a@b.co");
        form.set(keys::PROTEIN_SEQUENCE, "MKTAYI");
        form.set(keys::MAKE_RESULTS_PUBLIC, true);
        form.selected_tools = tools.iter().map(|t| t.to_string()).collect();
        form
    }

    #[test]
    fn test_member_job_names() {
        let planned = plan(&multifold(&["alphafold2", "colabfold", "esmfold", "omegafold"]));
        let names: Vec<String> = planned
            .iter()
            .map(|(_, p)| p.as_ref().unwrap().job_name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "MULTIFOLD-batch-AF2",
                "MULTIFOLD-batch-CBF",
                "MULTIFOLD-batch-EMF",
                "MULTIFOLD-batch-OMF",
            ]
        );
    }

    #[test]
    fn test_member_uses_defaults_and_shared_fields() {
        let planned = plan(&multifold(&["alphafold2"]));
        let payload = planned[0].1.as_ref().unwrap();
        let data = payload.data();
        assert_eq!(data["dbPreset"], json!("full_dbs"));
        assert_eq!(data["makeResultsPublic"], json!(true));
        assert_eq!(data["email"], json!("a@b.co"));
        let seq = data["proteinSequence"].as_str().unwrap();
        assert!(seq.starts_with(">MULTIFOLD-batch-"));
        assert!(seq.ends_with("\nMKTAYI"));
    }

    #[test]
    fn test_alphafold3_member() {
        let planned = plan(&multifold(&["alphafold3"]));
        let payload = planned[0].1.as_ref().unwrap();
        assert_eq!(payload.endpoint, "/api/flask/alphafold3/v1/submit");
        let data = payload.data();
        assert_eq!(data["name"], json!("MULTIFOLD-batch-AF3"));
        assert_eq!(
            data["sequences"],
            json!([{"protein": {"id": ["A"], "sequence": "MKTAYI"}}])
        );
        assert_eq!(data["modelSeeds"], json!([1]));
        assert_eq!(data["precomputedMSA"], json!(true));
        assert_eq!(data["public"], json!(true));
        assert_eq!(data["version"], json!(1));
    }

    #[test]
    fn test_unknown_tool() {
        let planned = plan(&multifold(&["rosettafold", "esmfold"]));
        assert_eq!(planned.len(), 2);
        assert!(matches!(&planned[0].1, Err(PayloadError::UnknownTool(t)) if t == "rosettafold"));
        assert!(planned[1].1.is_ok());
    }
}
