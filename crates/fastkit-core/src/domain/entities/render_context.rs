use std::collections::BTreeMap;

use serde::Serialize;

/// A single template variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Str(String),
    Bool(bool),
    List(Vec<String>),
}

/// Variables handed to the template renderer.
///
/// ## Built-in Variables
///
/// | Variable | Example |
/// |----------|---------|
/// | `project_name` | "Shop API" |
/// | `project_slug` | "shop_api" |
/// | `project_kebab` | "shop-api" |
/// | `project_pascal` | "ShopApi" |
///
/// Generators layer their own variables on top (`provider`, `domain_name`,
/// `services`, ...). Serializes as a flat map, which is what minijinja sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    variables: BTreeMap<String, ContextValue>,
}

impl RenderContext {
    pub fn new(project_name: impl Into<String>) -> Self {
        let name = project_name.into();
        let mut variables = BTreeMap::new();
        variables.insert("project_slug".into(), ContextValue::Str(to_snake_case(&name)));
        variables.insert("project_kebab".into(), ContextValue::Str(to_kebab_case(&name)));
        variables.insert("project_pascal".into(), ContextValue::Str(to_pascal_case(&name)));
        variables.insert("project_name".into(), ContextValue::Str(name));
        Self { variables }
    }

    pub fn with_str(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables
            .insert(key.into(), ContextValue::Str(value.into()));
        self
    }

    pub fn with_bool(mut self, key: impl Into<String>, value: bool) -> Self {
        self.variables.insert(key.into(), ContextValue::Bool(value));
        self
    }

    pub fn with_list<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = values.into_iter().map(Into::into).collect();
        self.variables.insert(key.into(), ContextValue::List(list));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.variables.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.variables.get(key) {
            Some(ContextValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn project_name(&self) -> &str {
        self.get_str("project_name").unwrap_or_default()
    }

    /// Substitute `{{key}}` placeholders for string variables.
    ///
    /// Used for one-line snippets such as settings lines; whole files go
    /// through the `TemplateRenderer` port. Unknown placeholders are kept.
    pub fn render(&self, snippet: &str) -> String {
        let mut out = snippet.to_string();
        for (key, value) in &self.variables {
            if let ContextValue::Str(s) = value {
                out = out.replace(&format!("{{{{{key}}}}}"), s);
                out = out.replace(&format!("{{{{ {key} }}}}"), s);
            }
        }
        out
    }
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

/// `"Shop API"` → `"shop_api"`.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// `"Shop API"` → `"shop-api"`.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// `"order_items"` → `"OrderItems"`.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Split on separators (`_`, `-`, whitespace), camelCase transitions and
/// acronym boundaries (`HTTPServer` → `http`, `server`). Words are lowercased.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        current.push(c);

        if let Some(&next) = chars.peek() {
            let camel = c.is_lowercase() && next.is_uppercase();
            let acronym = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase());
            if camel || acronym {
                words.push(current.to_lowercase());
                current.clear();
            }
        }
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}
