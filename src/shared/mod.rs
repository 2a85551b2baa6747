//! Shared functionalities: sequences, genes, alignments, quality, options
pub mod alignment;
pub mod errors;
pub mod gene;
pub mod options;
pub mod parameters;
pub mod parser;
pub mod quality;
pub mod sequence;

pub use alignment::{comparable, AlignedPair, SegmentAlignment};
pub use errors::{ConfigError, RecordError, MIN_SEQUENCE_LENGTH};
pub use gene::{chain_label, get_imgt_representation, Gene, GeneType};
pub use options::{
    InputFormat, Options, ReceptorType, Species, OPTIMIZED_PRECISION, OPTIMIZED_RECALL,
    OPTIMIZED_THRESHOLD,
};
pub use parameters::AlignmentParameters;
pub use parser::GermlineDatabase;
pub use quality::{QualityDecoder, QualityEncoding};
pub use sequence::{AminoAcid, Dna};
