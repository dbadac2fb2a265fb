pub mod cleanup_report;
pub mod common;
pub mod generated_tree;
pub mod project_config;
pub mod render_context;

pub use cleanup_report::{CleanupFailure, CleanupReport};
pub use common::RelativePath;
pub use generated_tree::{FsEntry, GeneratedTree};
pub use project_config::{ArchitectureConfig, FrontendConfig, ProjectConfig, ProjectConfigBuilder};
pub use render_context::{ContextValue, RenderContext};
