//! MiniJinja-backed template renderer.

use minijinja::{AutoEscape, Environment, ErrorKind};
use tracing::{debug, trace};

use fastkit_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::RenderContext,
    error::{FastkitError, FastkitResult},
};

use crate::{builtin_templates, template_set::TemplateSet};

/// Renders registered templates with MiniJinja.
///
/// Every template is parsed once at construction, so a syntax error in an
/// overlay surfaces before any file is written.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Build a renderer over `templates`.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::RenderingFailed`] naming the first template that
    /// does not parse.
    pub fn new(templates: TemplateSet) -> FastkitResult<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let count = templates.len();
        for (id, source) in templates {
            env.add_template_owned(id.clone(), source)
                .map_err(|e| rendering_failed(&id, &e))?;
        }
        debug!(count, "template environment ready");
        Ok(Self { env })
    }

    /// Renderer over the embedded templates only.
    pub fn builtin() -> FastkitResult<Self> {
        Self::new(TemplateSet::builtin())
    }

    /// Renderer over the embedded templates plus the resolved overlay.
    pub fn with_overlay(configured: Option<&std::path::Path>) -> FastkitResult<Self> {
        Self::new(builtin_templates::all_templates(configured)?)
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template_id: &str, context: &RenderContext) -> FastkitResult<String> {
        trace!(template = template_id, "rendering");
        let template = self.env.get_template(template_id).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                FastkitError::from(ApplicationError::TemplateNotFound {
                    id: template_id.to_string(),
                })
            } else {
                rendering_failed(template_id, &e)
            }
        })?;
        template
            .render(context)
            .map_err(|e| rendering_failed(template_id, &e))
    }

    fn has_template(&self, template_id: &str) -> bool {
        self.env.get_template(template_id).is_ok()
    }
}

fn rendering_failed(template: &str, e: &minijinja::Error) -> FastkitError {
    let mut reason = e.to_string();
    if let Some(detail) = e.detail() {
        if !reason.contains(detail) {
            reason = format!("{reason} ({detail})");
        }
    }
    ApplicationError::RenderingFailed {
        template: template.to_string(),
        reason,
    }
    .into()
}
