//! Suggestion rendering: the wrapping template and the line-oriented writers.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// Template used when nothing overrides it
pub const DEFAULT_TEMPLATE: &str = r#"fmt.Errorf("{context}: %w", {ident})"#;

const CONTEXT_PLACEHOLDER: &str = "{context}";
const IDENT_PLACEHOLDER: &str = "{ident}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("wrapping template must not be empty")]
    Empty,

    #[error("wrapping template {0:?} has no {{context}} placeholder")]
    MissingContext(String),

    #[error("wrapping template {0:?} spans multiple lines")]
    Multiline(String),
}

/// Wrapping expression with `{context}` and `{ident}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapTemplate {
    raw: String,
}

impl WrapTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        if raw.trim().is_empty() {
            return Err(TemplateError::Empty);
        }
        if raw.contains('\n') || raw.contains('\r') {
            return Err(TemplateError::Multiline(raw.to_string()));
        }
        if !raw.contains(CONTEXT_PLACEHOLDER) {
            return Err(TemplateError::MissingContext(raw.to_string()));
        }
        Ok(Self { raw: raw.to_string() })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substitute both placeholders in a single left-to-right pass, so text
    /// coming from `context` is never re-expanded.
    pub fn render(&self, context: &str, ident: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + context.len());
        let mut rest = self.raw.as_str();
        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if let Some(after) = tail.strip_prefix(CONTEXT_PLACEHOLDER) {
                out.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(IDENT_PLACEHOLDER) {
                out.push_str(ident);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for WrapTemplate {
    fn default() -> Self {
        Self { raw: DEFAULT_TEMPLATE.to_string() }
    }
}

/// One suggested fix, emitted as soon as it is produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub file: String,
    pub line: usize,
    pub context: String,
    pub replacement: String,
}

impl Suggestion {
    pub fn new(file: &str, line: usize, context: String, template: &WrapTemplate, ident: &str) -> Self {
        let replacement = template.render(&context, ident);
        Self { file: file.to_string(), line, context, replacement }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.replacement)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `path:line:replacement`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writes suggestions line by line to any sink
pub struct SuggestionWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> SuggestionWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn emit(&mut self, suggestion: &Suggestion) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", suggestion),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, suggestion)?;
                self.out.write_all(b"\n")
            }
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_renders_go_errorf() {
        let s = Suggestion::new("pkg/a.go", 12, "load config".to_string(), &WrapTemplate::default(), "err");
        assert_eq!(s.to_string(), r#"pkg/a.go:12:fmt.Errorf("load config: %w", err)"#);
    }

    #[test]
    fn custom_template_substitutes_both_placeholders() {
        let t = WrapTemplate::parse(r#"errors.Wrap({ident}, "{context}")"#).unwrap();
        assert_eq!(t.render("save item", "e"), r#"errors.Wrap(e, "save item")"#);
    }

    #[test]
    fn render_keeps_unknown_braces_and_does_not_reexpand() {
        let t = WrapTemplate::parse("wrap{x}({context})").unwrap();
        assert_eq!(t.render("{ident}", "err"), "wrap{x}({ident})");
    }

    #[test]
    fn template_validation() {
        assert_eq!(WrapTemplate::parse("  "), Err(TemplateError::Empty));
        assert!(matches!(WrapTemplate::parse("wrap(err)"), Err(TemplateError::MissingContext(_))));
        assert!(matches!(WrapTemplate::parse("a\n{context}"), Err(TemplateError::Multiline(_))));
    }

    #[test]
    fn writer_emits_text_and_json_lines() {
        let s = Suggestion::new("a.go", 3, "run".to_string(), &WrapTemplate::default(), "err");

        let mut text = SuggestionWriter::new(Vec::new(), OutputFormat::Text);
        text.emit(&s).unwrap();
        assert_eq!(
            String::from_utf8(text.into_inner()).unwrap(),
            "a.go:3:fmt.Errorf(\"run: %w\", err)\n"
        );

        let mut json = SuggestionWriter::new(Vec::new(), OutputFormat::Json);
        json.emit(&s).unwrap();
        let out = String::from_utf8(json.into_inner()).unwrap();
        assert!(out.ends_with('\n'));
        let v: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(v["file"], "a.go");
        assert_eq!(v["line"], 3);
        assert_eq!(v["context"], "run");
        assert_eq!(v["replacement"], "fmt.Errorf(\"run: %w\", err)");
    }
}
