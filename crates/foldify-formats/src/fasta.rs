use foldify_core::sequence::SequenceRecord;
use rand::Rng;

use crate::detect::InputMode;

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Wrap a bare residue string into a single FASTA record.
///
/// Text that is already FASTA is returned with leading blank space removed
/// and otherwise untouched. Otherwise
/// whitespace is removed, letters are uppercased and a `>{job_name}-{n}`
/// header is synthesized, `n` being random in `0..1000`. The header is not
/// stable across calls.
pub fn to_fasta(raw: &str, job_name: &str) -> String {
    to_fasta_with(raw, job_name, &mut rand::thread_rng())
}

pub fn to_fasta_with<R: Rng + ?Sized>(raw: &str, job_name: &str, rng: &mut R) -> String {
    if InputMode::detect(raw) == InputMode::Fasta {
        return raw.trim_start().to_string();
    }

    let clean = strip_whitespace(raw).to_uppercase();
    if clean.is_empty() {
        return String::new();
    }

    let suffix: u32 = rng.gen_range(0..1000);
    format!(">{}-{}\n{}", job_name, suffix, clean)
}

/// Drop FASTA header lines and join the residues, without whitespace.
/// Non-FASTA text is returned unchanged.
pub fn to_amino_only(raw: &str) -> String {
    if InputMode::detect(raw) != InputMode::Fasta {
        return raw.to_string();
    }

    let joined: String = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with('>'))
        .collect();
    strip_whitespace(&joined)
}

/// Split FASTA text into records. Lines before the first header are ignored.
pub fn records(raw: &str) -> Vec<SequenceRecord> {
    let mut out = Vec::new();
    let mut current_header: Option<String> = None;
    let mut current_body = String::new();

    for line in raw.lines() {
        let trimmed = line.trim();

        if let Some(header) = trimmed.strip_prefix('>') {
            if let Some(prev) = current_header.take() {
                out.push(SequenceRecord::new(prev, &std::mem::take(&mut current_body)));
            }
            current_header = Some(header.trim().to_string());
            current_body.clear();
        } else if current_header.is_some() {
            current_body.push_str(trimmed);
        }
    }

    if let Some(header) = current_header {
        out.push(SequenceRecord::new(header, &current_body));
    }

    out
}

/// Convert the text box content when the user flips between input modes
pub fn switch_mode(raw: &str, to: InputMode, job_name: &str) -> String {
    match to {
        InputMode::Fasta if !raw.is_empty() => to_fasta(raw, job_name),
        InputMode::Plain => to_amino_only(raw),
        _ => raw.to_string(),
    }
}
