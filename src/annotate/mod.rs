//! V(D)J annotation of the reads
pub mod clonotype;
pub mod germline;
pub mod junction;
pub mod protocol;
pub mod report;

pub use clonotype::{group_clonotypes, ClonotypeCollection, ClonotypeGroup};
pub use germline::{AlignmentMatcher, Assignment, GermlineMatcher, SegmentHit, Strand};
pub use junction::Junction;
pub use protocol::AnnotationProtocol;
pub use report::{AnnotationResult, GeneCall, HEADER};
