//! Normalization and section segmentation for clinical note text.
//!
//! The segmenter turns a normalized note into an ordered mapping of
//! canonical section to body text using a three-tier fallback cascade, with
//! a specialized sub-segmenter for fully templated consult notes.

pub mod consult;
pub mod lexicon;
pub mod normalize;
pub mod segment;

pub use consult::{ConsultNote, ConsultSegmenter, DiagnosticStudy};
pub use lexicon::{HeaderLexicon, HeaderMatch, normalize_header};
pub use normalize::{MAX_INPUT_LEN, Normalized, normalize};
pub use segment::{MIN_HEADER_SCORE, Segmenter};
