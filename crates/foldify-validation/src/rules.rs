//! Single-field validators. Each returns the message to show, or `None`.

use chrono::NaiveDate;
use foldify_core::entity::Entity;
use foldify_core::form::Attachment;
use foldify_core::tool::Tool;
use foldify_formats::{fasta, AttachmentKind, InputMode};
use once_cell::sync::Lazy;
use regex::Regex;

/// Residue ceiling of the open platform, per sequence
pub const MAX_RESIDUES: usize = 600;
/// Token ceiling for AlphaFold3 entities (residues times copies)
pub const MAX_TOKENS: usize = 600;

pub const JOB_NAME_REQUIRED: &str = "Job name is required.";
pub const JOB_NAME_CHARSET: &str = "Only letters, numbers, and dashes (hyphens) are allowed.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Email is invalid.";
pub const SEQUENCE_REQUIRED: &str = "Protein sequence is required.";
pub const SEQUENCE_EMPTY: &str = "Protein sequence cannot be empty.";
pub const FASTA_NO_SEQUENCE: &str = "Provide at least one amino acid sequence.";
pub const FASTA_RECORD_TOO_LONG: &str = "Individual protein sequence exceeds the maximum length of 600 amino acids. Consider using full Foldify version at https://foldify.cloud.e-infra.cz for longer sequences.";
pub const SEQUENCE_TOO_LONG: &str = "Protein sequence exceeds the maximum length of 600 amino acids. Consider using full Foldify version at https://foldify.cloud.e-infra.cz for longer sequences.";
pub const MONOMER_BATCH_WARNING: &str = "Seems like you provided more than one amino acid sequence. With Model Preset 'monomer' your protein sequence input will be run as batch of monomers. Please note, that if you want to predict a multimer, you need to select 'multimer' in the Model Preset dropdown.";
pub const MULTIMER_HEADER_WARNING: &str = "In 'multimer' mode each sequence must start with '>' character followed by sequence name.";
pub const MULTIFOLD_SEQUENCE_REQUIRED: &str = "Sequence is required.";
pub const MULTIFOLD_SEQUENCE_TOO_LONG: &str = "Sequence exceeds maximum length of 600 amino acids.";
pub const MULTIFOLD_SEQUENCE_CHARSET: &str = "Use uppercase letters without spaces and new lines.";
pub const TOO_FEW_TOOLS: &str = "At least two tools must be selected.";
pub const MODEL_SEEDS_REQUIRED: &str = "Model Seeds is required";
pub const MODEL_SEEDS_FORMAT: &str = "Use comma-separated integers without spaces.";
pub const COPIES_REQUIRED: &str = "Copy IDs are required";
pub const COPIES_FORMAT: &str = "Use comma-separated uppercase letters without spaces.";
pub const COPIES_DUPLICATE: &str = "Copy IDs must be unique across all entities.";
pub const ENTITY_INPUT_REQUIRED: &str = "Entity input is required";
pub const ENTITY_INPUT_FORMAT: &str = "Use uppercase letters without spaces.";
pub const TOKEN_LIMIT_ERROR: &str = "Sequence exceeds the maximum allowed length of 600 tokens.";
pub const CCD_FILE_EXTENSION: &str = "Please upload a .cif file.";
pub const JSON_FILE_REQUIRED: &str = "JSON file is required.";
pub const JSON_FILE_EXTENSION: &str = "Invalid file format. Please upload a JSON file.";
pub const TEMPLATE_DATE_FORMAT: &str = "Use the YYYY-MM-DD date format.";

static JOB_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]*$").expect("job name pattern"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[a-zA-Z0-9]+@[a-zA-Z0-9]+\.[a-zA-Z0-9]+\b").expect("email pattern")
});
static MODEL_SEEDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+,)*\d+$").expect("model seeds pattern"));
static COPIES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z,]*$").expect("copies pattern"));
static UPPERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]*$").expect("residue pattern"));

pub fn job_name(value: &str) -> Option<String> {
    if value.is_empty() {
        Some(JOB_NAME_REQUIRED.to_string())
    } else if !JOB_NAME_RE.is_match(value) {
        Some(JOB_NAME_CHARSET.to_string())
    } else {
        None
    }
}

/// The pattern is searched, not anchored: any embedded address passes
pub fn email(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(EMAIL_REQUIRED.to_string())
    } else if !EMAIL_RE.is_match(value) {
        Some(EMAIL_INVALID.to_string())
    } else {
        None
    }
}

fn content_lines(value: &str) -> usize {
    value.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Sequence box of the single-sequence tools, in either input mode
pub fn protein_sequence(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some(SEQUENCE_REQUIRED.to_string());
    }

    match InputMode::detect(value) {
        InputMode::Fasta => {
            if content_lines(value) < 2 {
                Some(FASTA_NO_SEQUENCE.to_string())
            } else if fasta::records(value)
                .iter()
                .any(|rec| rec.len() > MAX_RESIDUES)
            {
                Some(FASTA_RECORD_TOO_LONG.to_string())
            } else {
                None
            }
        }
        InputMode::Plain => {
            let residues = value.chars().filter(|c| !c.is_whitespace()).count();
            if residues == 0 {
                Some(SEQUENCE_EMPTY.to_string())
            } else if residues > MAX_RESIDUES {
                Some(SEQUENCE_TOO_LONG.to_string())
            } else {
                None
            }
        }
    }
}

/// Non-blocking note shown when FASTA text holds more than one record line
pub fn multi_sequence_warning(value: &str, model_preset: &str) -> Option<String> {
    if InputMode::detect(value) != InputMode::Fasta || content_lines(value) <= 2 {
        return None;
    }
    if model_preset != "multimer" {
        Some(MONOMER_BATCH_WARNING.to_string())
    } else {
        Some(MULTIMER_HEADER_WARNING.to_string())
    }
}

/// MultiFold only takes one bare uppercase sequence
pub fn multifold_sequence(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(MULTIFOLD_SEQUENCE_REQUIRED.to_string())
    } else if value.len() > MAX_RESIDUES {
        Some(MULTIFOLD_SEQUENCE_TOO_LONG.to_string())
    } else if !UPPERCASE_RE.is_match(value) {
        Some(MULTIFOLD_SEQUENCE_CHARSET.to_string())
    } else {
        None
    }
}

pub fn selected_tools(tools: &[String]) -> Option<String> {
    if tools.len() < 2 {
        Some(TOO_FEW_TOOLS.to_string())
    } else {
        None
    }
}

pub fn model_seeds(value: &str) -> Option<String> {
    if value.is_empty() {
        Some(MODEL_SEEDS_REQUIRED.to_string())
    } else if !MODEL_SEEDS_RE.is_match(value) {
        Some(MODEL_SEEDS_FORMAT.to_string())
    } else {
        None
    }
}

pub fn entity_copies(entity: &Entity) -> Option<String> {
    if entity.copies.is_empty() {
        Some(COPIES_REQUIRED.to_string())
    } else if !COPIES_RE.is_match(&entity.copies) {
        Some(COPIES_FORMAT.to_string())
    } else {
        None
    }
}

pub fn entity_input(entity: &Entity) -> Option<String> {
    if entity.kind.is_polymer() && !UPPERCASE_RE.is_match(&entity.input) {
        Some(ENTITY_INPUT_FORMAT.to_string())
    } else if entity.input.is_empty() {
        Some(ENTITY_INPUT_REQUIRED.to_string())
    } else {
        None
    }
}

/// Both messages raised when an entity is over the token ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOverflow {
    pub tokens: usize,
    pub error: String,
    pub warning: String,
}

pub fn token_limit_warning(tokens: usize) -> String {
    format!(
        "Your sequence contains **{}** tokens, which exceeds the limit of **{} tokens** in the open version of Foldify Prediction Platform. Consider using full version of Foldify at **[https://foldify.cloud.e-infra.cz](https://foldify.cloud.e-infra.cz)**. Valid MetaCenter account is required - apply **[here](https://metavo.metacentrum.cz/cs/application/index.html)**.",
        tokens, MAX_TOKENS
    )
}

pub fn entity_token_limit(entity: &Entity) -> Option<TokenOverflow> {
    let tokens = entity.token_count();
    if tokens <= MAX_TOKENS {
        return None;
    }
    Some(TokenOverflow {
        tokens,
        error: TOKEN_LIMIT_ERROR.to_string(),
        warning: token_limit_warning(tokens),
    })
}

/// Indices of entities reusing a chain id claimed by an earlier entity
pub fn duplicate_copy_ids(entities: &[Entity]) -> Vec<usize> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates = Vec::new();
    for (index, entity) in entities.iter().enumerate() {
        let mut clash = false;
        for id in entity.copies.split(',').filter(|id| !id.is_empty()) {
            if !seen.insert(id.to_string()) {
                clash = true;
            }
        }
        if clash {
            duplicates.push(index);
        }
    }
    duplicates
}

/// The custom CCD upload is optional but must be mmCIF when given
pub fn ccd_attachment(attachment: Option<&Attachment>) -> Option<String> {
    match attachment {
        Some(a) if AttachmentKind::from_file_name(&a.file_name) != AttachmentKind::Ccd => {
            Some(CCD_FILE_EXTENSION.to_string())
        }
        _ => None,
    }
}

pub fn json_attachment(attachment: Option<&Attachment>) -> Option<String> {
    match attachment {
        None => Some(JSON_FILE_REQUIRED.to_string()),
        Some(a) if AttachmentKind::from_file_name(&a.file_name) != AttachmentKind::Json => {
            Some(JSON_FILE_EXTENSION.to_string())
        }
        Some(_) => None,
    }
}

/// Empty means "no limit"
pub fn template_date(value: &str) -> Option<String> {
    if value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        None
    } else {
        Some(TEMPLATE_DATE_FORMAT.to_string())
    }
}

/// Resolve MultiFold tool keys, keeping unknown ones as errors for the caller
pub fn parse_tools(keys: &[String]) -> Vec<Result<Tool, String>> {
    keys.iter()
        .map(|k| {
            Tool::from_key(k)
                .filter(Tool::is_multifold_member)
                .ok_or_else(|| k.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldify_core::entity::EntityKind;
    use foldify_core::form::AttachmentSlot;

    #[test]
    fn test_job_name() {
        assert_eq!(job_name("abc-123"), None);
        assert_eq!(job_name("abc def").as_deref(), Some(JOB_NAME_CHARSET));
        assert_eq!(job_name("").as_deref(), Some(JOB_NAME_REQUIRED));
        assert_eq!(job_name("under_score").as_deref(), Some(JOB_NAME_CHARSET));
    }

    #[test]
    fn test_email() {
        assert_eq!(email("a@b.co"), None);
        assert_eq!(email("not-an-email").as_deref(), Some(EMAIL_INVALID));
        assert_eq!(email("   ").as_deref(), Some(EMAIL_REQUIRED));
        // searched, not anchored
        assert_eq!(email("me: jo@lab.org"), None);
    }

    #[test]
    fn test_plain_sequence_length() {
        assert_eq!(protein_sequence(&"A".repeat(600)), None);
        assert_eq!(
            protein_sequence(&"A".repeat(601)).as_deref(),
            Some(SEQUENCE_TOO_LONG)
        );
        // whitespace does not count
        let wrapped = format!("{}\n{}", "A".repeat(300), "A".repeat(300));
        assert_eq!(protein_sequence(&wrapped), None);
    }

    #[test]
    fn test_plain_sequence_empty() {
        assert_eq!(protein_sequence("").as_deref(), Some(SEQUENCE_REQUIRED));
        assert_eq!(protein_sequence(" \n\t").as_deref(), Some(SEQUENCE_EMPTY));
    }

    #[test]
    fn test_fasta_sequence() {
        assert_eq!(protein_sequence(">only-header").as_deref(), Some(FASTA_NO_SEQUENCE));
        assert_eq!(protein_sequence(">a\nMKT"), None);

        let long_second = format!(">a\nMKT\n>b\n{}", "A".repeat(601));
        assert_eq!(
            protein_sequence(&long_second).as_deref(),
            Some(FASTA_RECORD_TOO_LONG)
        );
    }

    #[test]
    fn test_multi_sequence_warning() {
        let two = ">a\nMKT\n>b\nAYI";
        assert_eq!(
            multi_sequence_warning(two, "monomer").as_deref(),
            Some(MONOMER_BATCH_WARNING)
        );
        assert_eq!(
            multi_sequence_warning(two, "multimer").as_deref(),
            Some(MULTIMER_HEADER_WARNING)
        );
        assert_eq!(multi_sequence_warning(">a\nMKT\n", "monomer"), None);
        assert_eq!(multi_sequence_warning("MKT\nAYI\nAKQ", "monomer"), None);
    }

    #[test]
    fn test_multifold_sequence() {
        assert_eq!(multifold_sequence("MKTAYI"), None);
        assert_eq!(
            multifold_sequence("MKT AYI").as_deref(),
            Some(MULTIFOLD_SEQUENCE_CHARSET)
        );
        assert_eq!(
            multifold_sequence(&"A".repeat(601)).as_deref(),
            Some(MULTIFOLD_SEQUENCE_TOO_LONG)
        );
        assert_eq!(multifold_sequence("  ").as_deref(), Some(MULTIFOLD_SEQUENCE_REQUIRED));
    }

    #[test]
    fn test_model_seeds() {
        assert_eq!(model_seeds("1,2,3"), None);
        assert_eq!(model_seeds("42"), None);
        assert_eq!(model_seeds("1, 2").as_deref(), Some(MODEL_SEEDS_FORMAT));
        assert_eq!(model_seeds("1,").as_deref(), Some(MODEL_SEEDS_FORMAT));
        assert_eq!(model_seeds("").as_deref(), Some(MODEL_SEEDS_REQUIRED));
    }

    #[test]
    fn test_entity_fields() {
        let ok = Entity::new(EntityKind::Protein, "A,B", "MKT");
        assert_eq!(entity_copies(&ok), None);
        assert_eq!(entity_input(&ok), None);

        let lower = Entity::new(EntityKind::Dna, "a", "acgt");
        assert_eq!(entity_copies(&lower).as_deref(), Some(COPIES_FORMAT));
        assert_eq!(entity_input(&lower).as_deref(), Some(ENTITY_INPUT_FORMAT));

        let empty = Entity::new(EntityKind::Rna, "", "");
        assert_eq!(entity_copies(&empty).as_deref(), Some(COPIES_REQUIRED));
        assert_eq!(entity_input(&empty).as_deref(), Some(ENTITY_INPUT_REQUIRED));

        // SMILES is free text
        let smiles = Entity::new(EntityKind::LigandSmiles, "C", "CC(=O)OC1C[NH+]2CCC1CC2");
        assert_eq!(entity_input(&smiles), None);
    }

    #[test]
    fn test_token_limit() {
        let three = Entity::new(EntityKind::Protein, "A,B,C", "M".repeat(100));
        assert_eq!(entity_token_limit(&three), None);

        let seven = Entity::new(EntityKind::Protein, "A,B,C,D,E,F,G", "M".repeat(100));
        let overflow = entity_token_limit(&seven).unwrap();
        assert_eq!(overflow.tokens, 700);
        assert_eq!(overflow.error, TOKEN_LIMIT_ERROR);
        assert!(overflow.warning.contains("**700** tokens"));
    }

    #[test]
    fn test_duplicate_copy_ids() {
        let entities = vec![
            Entity::new(EntityKind::Protein, "A,B", "MKT"),
            Entity::new(EntityKind::Rna, "C", "ACGU"),
            Entity::new(EntityKind::Ligand, "B", "ATP"),
        ];
        assert_eq!(duplicate_copy_ids(&entities), vec![2]);
    }

    #[test]
    fn test_attachments() {
        let cif = Attachment::new(AttachmentSlot::UserCcd, "lig.cif", "");
        let txt = Attachment::new(AttachmentSlot::UserCcd, "lig.txt", "");
        assert_eq!(ccd_attachment(None), None);
        assert_eq!(ccd_attachment(Some(&cif)), None);
        assert_eq!(ccd_attachment(Some(&txt)).as_deref(), Some(CCD_FILE_EXTENSION));

        let json = Attachment::new(AttachmentSlot::JsonInput, "job.json", "{}");
        assert_eq!(json_attachment(None).as_deref(), Some(JSON_FILE_REQUIRED));
        assert_eq!(json_attachment(Some(&json)), None);
        assert_eq!(json_attachment(Some(&cif)).as_deref(), Some(JSON_FILE_EXTENSION));
    }

    #[test]
    fn test_template_date() {
        assert_eq!(template_date(""), None);
        assert_eq!(template_date("2022-01-31"), None);
        assert_eq!(template_date("31.1.2022").as_deref(), Some(TEMPLATE_DATE_FORMAT));
        assert_eq!(template_date("2022-02-30").as_deref(), Some(TEMPLATE_DATE_FORMAT));
    }

    #[test]
    fn test_parse_tools() {
        let keys = vec!["alphafold2".to_string(), "rosetta".to_string(), "multifold".to_string()];
        let parsed = parse_tools(&keys);
        assert_eq!(parsed[0], Ok(Tool::AlphaFold2));
        assert_eq!(parsed[1], Err("rosetta".to_string()));
        assert_eq!(parsed[2], Err("multifold".to_string()));
    }
}
