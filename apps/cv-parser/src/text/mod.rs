// Text stage: normalization of extracted text, per-line classification and the
// static keyword tables both stages share.

pub mod classifier;
pub mod lexicon;
pub mod normalizer;

pub use classifier::SectionKind;
pub use normalizer::{normalize_text, split_lines, RawLine};
