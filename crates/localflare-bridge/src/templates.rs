//! Minimal `{{ key }}` templates.
//!
//! Placeholders are looked up in a JSON object context; dotted keys walk
//! nested objects (`{{ user.name }}`). Inserted values are HTML-escaped;
//! strings are inserted as-is, other values as compact JSON, missing keys
//! as nothing.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use localflare_common::TemplateError;
use regex::{Captures, Regex};
use serde_json::Value;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)\s*\}\}")
        .expect("templates: static regex pattern must compile")
});

/// Renders templates from a folder, or inline when no folder is set.
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    folder: Option<PathBuf>,
}

impl TemplateRenderer {
    pub fn new(folder: Option<PathBuf>) -> Self {
        Self { folder }
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    /// Render `name` with `context`.
    ///
    /// With a folder configured, `name` is a file inside it. Without one,
    /// `name` is the template source itself.
    pub fn render(&self, name: &str, context: &Value) -> Result<String, TemplateError> {
        match &self.folder {
            Some(folder) => {
                let path = folder.join(name);
                if !path.is_file() {
                    return Err(TemplateError::NotFound(path));
                }
                let source = std::fs::read_to_string(&path)
                    .map_err(|source| TemplateError::Io { path, source })?;
                Ok(render_str(&source, context))
            }
            None => Ok(render_str(name, context)),
        }
    }
}

/// Substitute every placeholder in `source` from `context`.
pub fn render_str(source: &str, context: &Value) -> String {
    PLACEHOLDER_RE
        .replace_all(source, |caps: &Captures<'_>| {
            lookup(context, &caps[1])
                .map(|v| escape_html(&value_to_text(v)))
                .unwrap_or_default()
        })
        .into_owned()
}

fn lookup<'a>(context: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(context, |value, part| value.get(part))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
