pub mod command;
pub mod error;
pub mod plan;
pub mod probe;
pub mod reconcile;
pub mod runtime;
pub mod source;
pub mod version;
