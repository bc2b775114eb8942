//! Document to YAML text
//!
//! Block style with four-space indentation. Empty containers are written
//! inline (`{}`, `[]`), head comments become `#` lines above their key.

use crate::document::{Entry, Node, Scalar, ScalarStyle};

const INDENT: usize = 4;

/// Plain scalars YAML 1.1 readers would take for booleans or null
const AMBIGUOUS_WORDS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF", "true", "True", "TRUE", "false", "False", "FALSE", "null", "Null", "NULL", "~",
];

/// Render a document to YAML text ending with a newline
pub fn render(node: &Node) -> String {
    let mut emitter = Emitter::default();

    match node {
        Node::Mapping(entries) if !entries.is_empty() => emitter.mapping(entries, 0),
        Node::Sequence(items) if !items.is_empty() => emitter.sequence(items, 0),
        other => {
            emitter.out.push_str(&inline_text(other));
            emitter.out.push('\n');
        }
    }

    emitter.out
}

/// Text of a scalar as it appears after `key: ` or `- `
pub fn scalar_text(scalar: &Scalar) -> String {
    match scalar.style {
        ScalarStyle::Plain => scalar.value.clone(),
        ScalarStyle::Str if is_plain_safe(&scalar.value) => scalar.value.clone(),
        ScalarStyle::Str => quote(&scalar.value),
    }
}

/// Render `#` lines for a head comment
pub fn comment_lines(comment: &str) -> Vec<String> {
    comment
        .trim_matches('\n')
        .split('\n')
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                "#".to_string()
            } else if line.starts_with('#') {
                line.to_string()
            } else {
                format!("# {line}")
            }
        })
        .collect()
}

#[derive(Default)]
struct Emitter {
    out: String,
    /// The next line continues after a `- ` already written
    inline: bool,
}

impl Emitter {
    fn line_start(&mut self, indent: usize) {
        if self.inline {
            self.inline = false;
        } else {
            self.out.extend(std::iter::repeat_n(' ', indent));
        }
    }

    fn mapping(&mut self, entries: &[Entry], indent: usize) {
        for entry in entries {
            if let Some(comment) = &entry.head_comment {
                for line in comment_lines(comment) {
                    self.line_start(indent);
                    self.out.push_str(&line);
                    self.out.push('\n');
                }
            }

            self.line_start(indent);
            self.out.push_str(&scalar_text(&Scalar::string(entry.key.as_str())));
            self.out.push(':');
            self.value(&entry.value, indent + INDENT);
        }
    }

    fn sequence(&mut self, items: &[Node], indent: usize) {
        for item in items {
            self.line_start(indent);
            self.out.push('-');

            match item {
                Node::Mapping(entries) if !entries.is_empty() => {
                    self.out.push(' ');
                    self.inline = true;
                    self.mapping(entries, indent + 2);
                }
                Node::Sequence(children) if !children.is_empty() => {
                    self.out.push(' ');
                    self.inline = true;
                    self.sequence(children, indent + 2);
                }
                leaf => self.inline_value(leaf),
            }
        }
    }

    /// Value following `key:`, either inline or as a nested block
    fn value(&mut self, node: &Node, indent: usize) {
        match node {
            Node::Mapping(entries) if !entries.is_empty() => {
                self.out.push('\n');
                self.mapping(entries, indent);
            }
            Node::Sequence(items) if !items.is_empty() => {
                self.out.push('\n');
                self.sequence(items, indent);
            }
            leaf => self.inline_value(leaf),
        }
    }

    fn inline_value(&mut self, node: &Node) {
        let text = inline_text(node);
        if !text.is_empty() {
            self.out.push(' ');
            self.out.push_str(&text);
        }
        self.out.push('\n');
    }
}

fn inline_text(node: &Node) -> String {
    match node {
        Node::Mapping(_) => "{}".to_string(),
        Node::Sequence(_) => "[]".to_string(),
        Node::Scalar(scalar) => scalar_text(scalar),
    }
}

/// Whether a string can be written without quotes and still read back as
/// the same string
fn is_plain_safe(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };

    if value.trim() != value
        || value.chars().any(char::is_control)
        || "-?:,[]{}#&*!|>'\"%@`".contains(first)
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || AMBIGUOUS_WORDS.contains(&value)
    {
        return false;
    }

    // Anything the YAML resolver turns into a number stays quoted
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(value),
        Ok(serde_yaml::Value::String(ref s)) if s == value
    )
}

/// Double-quoted form; JSON string escaping is valid YAML
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.escape_default()))
}
