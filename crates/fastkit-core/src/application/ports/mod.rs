//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `fastkit-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: Template rendering
//!
//! - **Driving (Input) Ports**: the CLI commands, which call the services directly

pub mod output;

pub use output::{Filesystem, TemplateRenderer};

#[cfg(test)]
pub use output::MockTemplateRenderer;
