//! Infrastructure adapters for fastkit.
//!
//! This crate implements the ports defined in `fastkit-core::application::ports`.
//! It contains all external dependencies and I/O operations: the local and
//! in-memory filesystems, the embedded templates and the MiniJinja renderer.

pub mod builtin_templates;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;
pub mod template_set;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::MiniJinjaRenderer;
pub use template_set::TemplateSet;
