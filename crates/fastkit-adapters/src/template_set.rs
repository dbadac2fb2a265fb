//! The set of template sources a renderer is built from.

use std::{borrow::Cow, collections::BTreeMap, path::Path};

use tracing::{debug, info, instrument};

use fastkit_core::error::FastkitResult;

use crate::{builtin_templates::BUILTIN, template_loader::FilesystemTemplateLoader};

/// Template sources keyed by id (`"service/app/main.py"`).
///
/// Embedded sources are borrowed; overlay sources are owned.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, Cow<'static, str>>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every template compiled into the binary.
    pub fn builtin() -> Self {
        let templates = BUILTIN
            .iter()
            .map(|(id, source)| ((*id).to_string(), Cow::Borrowed(*source)))
            .collect();
        Self { templates }
    }

    /// Register or replace a template. Returns the previous source, if any.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        source: impl Into<Cow<'static, str>>,
    ) -> Option<Cow<'static, str>> {
        self.templates.insert(id.into(), source.into())
    }

    /// Layer the templates found under `dir` on top of this set.
    ///
    /// Files with an id already in the set replace it; new ids are added.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn with_overlay(mut self, dir: &Path) -> FastkitResult<Self> {
        let mut replaced = 0usize;
        let loaded = FilesystemTemplateLoader::new(dir).load_all()?;
        let total = loaded.len();
        for (id, source) in loaded {
            if self.insert(id.clone(), source).is_some() {
                debug!(id = %id, "overlay replaces embedded template");
                replaced += 1;
            }
        }
        info!(total, replaced, "template overlay applied");
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.templates.get(id).map(AsRef::as_ref)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Template ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl IntoIterator for TemplateSet {
    type Item = (String, Cow<'static, str>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Cow<'static, str>>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.into_iter()
    }
}
