pub mod cli;
pub mod config;
pub mod extractor;
pub mod github;
pub mod script;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use config::Config;
pub use extractor::{ExtractionState, ProfileExtractor, extract_project_info};
pub use types::profile::ProjectProfile;
pub use workflow::launch;
