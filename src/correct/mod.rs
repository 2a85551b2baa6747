//! Error model and correction of the read bases
pub mod context;
pub mod corrector;
pub mod model;

pub use context::BaseContext;
pub use corrector::{correct, count_corrections};
pub use model::{ErrorModel, ErrorModelParameters, ErrorProfile};
