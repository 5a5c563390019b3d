// File: src/renderer.rs
// Purpose: Variable interpolation and placeholder substitution

use std::collections::HashMap;

use maud::html;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

static VAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_\-]*(?:\.[a-zA-Z0-9_\-]+)*)\}").unwrap());

/// How interpolated values are written into the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// HTML and XML: values are entity-escaped
    Html,
    /// JSON payloads: values are escaped as the inside of a JSON string
    Json,
    /// Plain text and unknown payloads: values are written verbatim
    None,
}

impl Escape {
    /// Escaping for a routing entry point, from its file extension
    pub fn for_extension(extension: Option<&str>) -> Self {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("html") | Some("htm") | Some("xml") => Escape::Html,
            Some("json") => Escape::Json,
            _ => Escape::None,
        }
    }
}

/// Template renderer with variable interpolation
///
/// Every render pass writes into its own owned `String`; nothing is shared
/// between passes except the variable table.
#[derive(Debug, Clone)]
pub struct Renderer {
    variables: HashMap<String, Value>,
    escape: Escape,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
            escape: Escape::Html,
        }
    }

    pub fn with_variables(variables: HashMap<String, Value>, escape: Escape) -> Self {
        Self { variables, escape }
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn get_var(&self, path: &str) -> Option<&Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let value = self.variables.get(head)?;
        match rest {
            Some(rest) => value.lookup(rest),
            None => Some(value),
        }
    }

    /// Replaces every known `{name}` or `{a.b}`; unknown ones stay as written
    pub fn render(&self, content: &str) -> String {
        VAR_REGEX
            .replace_all(content, |caps: &regex::Captures| {
                match self.get_var(&caps[1]).filter(|v| v.is_scalar()) {
                    Some(value) => self.write(value),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Renders `source` with `child` substituted at every `placeholder`
    ///
    /// The source is interpolated around the placeholder, never through it,
    /// so already-rendered child content is not interpolated a second time.
    pub fn render_with_child(&self, source: &str, placeholder: &str, child: &str) -> String {
        if placeholder.is_empty() {
            return self.render(source);
        }
        source
            .split(placeholder)
            .map(|piece| self.render(piece))
            .collect::<Vec<_>>()
            .join(child)
    }

    fn write(&self, value: &Value) -> String {
        match self.escape {
            Escape::Html => html! { (value.to_string()) }.into_string(),
            Escape::Json => json_string_body(&value.to_string()),
            Escape::None => value.to_string(),
        }
    }
}

fn json_string_body(text: &str) -> String {
    let quoted = serde_json::Value::String(text.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
