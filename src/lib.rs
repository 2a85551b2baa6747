#![warn(clippy::large_types_passed_by_value)]

pub mod annotate;
pub mod api;
pub mod batch;
pub mod correct;
pub mod shared;

pub use crate::annotate::{
    AlignmentMatcher, AnnotationProtocol, AnnotationResult, GermlineMatcher, Strand,
};
pub use crate::api::{correct_sequences, get_predicted_errors, get_predicted_errors_batch};
pub use crate::batch::{run_protocol, run_with_matcher, BatchRunner, BatchSummary, Entry, Record};
pub use crate::correct::{ErrorModel, ErrorModelParameters, ErrorProfile};
pub use crate::shared::{
    AlignedPair, AlignmentParameters, AminoAcid, ConfigError, Dna, Gene, GermlineDatabase,
    Options, QualityDecoder, QualityEncoding, RecordError, Species, OPTIMIZED_THRESHOLD,
};
