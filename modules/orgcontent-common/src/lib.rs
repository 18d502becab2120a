pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, EngineSettings};
pub use error::{Degradation, OrgContentError};
pub use types::*;
