//! Wrappers for the external capture collaborators.
//!
//! Each collaborator is consumed only through its command-line contract;
//! nothing here interprets capture data itself.

pub mod daemon;
pub mod dissector;
pub mod scanner;

pub use daemon::SurveyDaemon;
pub use dissector::{FieldExtractor, TsharkExtractor};
