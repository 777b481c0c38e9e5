//! Sequence input normalization: plain residue strings and FASTA text.

pub mod detect;
pub mod fasta;

pub use detect::{AttachmentKind, InputMode};
pub use fasta::{records, switch_mode, to_amino_only, to_fasta};
