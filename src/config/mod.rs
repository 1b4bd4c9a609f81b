//! Configuration management for the envset binary

pub mod parser;
pub mod run;
pub mod validation;

// Re-export main functionality
pub use parser::{display_config_summary, load_config, ConfigParser};
pub use run::{Declaration, RunConfig};
pub use validation::{ConfigValidator, ValidationLevel, ValidationWarning};
