//! Template rendering adapters.

pub mod jinja;

pub use jinja::MiniJinjaRenderer;
