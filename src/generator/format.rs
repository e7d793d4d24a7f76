//! Post-processing of rendered Go source.
//!
//! Every generated file goes through [`post_process`]: HTML entities that a
//! templating layer may have introduced are reversed, then a [`SourceFormatter`]
//! validates and normalizes the text. Any formatter error aborts generation.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::naming::{is_valid_identifier, GO_KEYWORDS};

#[allow(clippy::expect_used)]
static HTML_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#34|quot|#39|apos);").expect("valid entity regex"));

/// Failure to validate or format a generated file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The built-in lexer rejected the source.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// An external formatter exited unsuccessfully.
    #[error("{binary} rejected the source: {diagnostic}")]
    Rejected { binary: String, diagnostic: String },

    /// An external formatter could not be started.
    #[error("formatter {binary} is not available: {source}")]
    Unavailable {
        binary: String,
        #[source]
        source: std::io::Error,
    },
}

/// Validates and normalizes Go source text.
pub trait SourceFormatter {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Return the formatted source or a diagnostic.
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Which formatter a generation run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormatterChoice {
    /// Built-in pass, then `gofmt` when it is installed
    #[default]
    Auto,
    /// Built-in pass only
    Builtin,
    /// Built-in pass, then `gofmt`, which must be installed
    Gofmt,
}

impl FormatterChoice {
    /// Parse an env/config value; unknown values fall back to `Auto`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "builtin" | "canonical" => FormatterChoice::Builtin,
            "gofmt" => FormatterChoice::Gofmt,
            _ => FormatterChoice::Auto,
        }
    }

    /// Instantiate the formatter, using `gofmt_bin` for the external pass.
    pub fn build(self, gofmt_bin: impl Into<PathBuf>) -> Box<dyn SourceFormatter> {
        match self {
            FormatterChoice::Builtin => Box::new(CanonicalFormatter),
            FormatterChoice::Gofmt => Box::new(Chain {
                first: CanonicalFormatter,
                second: Gofmt::new(gofmt_bin),
                optional_second: false,
            }),
            FormatterChoice::Auto => Box::new(Chain {
                first: CanonicalFormatter,
                second: Gofmt::new(gofmt_bin),
                optional_second: true,
            }),
        }
    }
}

/// Reverse the quote entities an HTML-escaping template layer would produce.
pub fn unescape_html_entities(source: &str) -> String {
    HTML_ENTITY
        .replace_all(source, |caps: &regex::Captures<'_>| match &caps[1] {
            "#34" | "quot" => "\"",
            _ => "'",
        })
        .into_owned()
}

/// Unescape, then validate/format with `formatter`.
///
/// # Errors
///
/// Returns the formatter's diagnostic when the source does not parse.
pub fn post_process(raw: &str, formatter: &dyn SourceFormatter) -> Result<String, FormatError> {
    let unescaped = unescape_html_entities(raw);
    let formatted = formatter.format(&unescaped)?;
    tracing::debug!(formatter = formatter.name(), bytes = formatted.len(), "formatted source");
    Ok(formatted)
}

/// External `gofmt` invoked over stdin/stdout.
#[derive(Debug, Clone)]
pub struct Gofmt {
    binary: PathBuf,
}

impl Gofmt {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Gofmt {
            binary: binary.into(),
        }
    }
}

impl SourceFormatter for Gofmt {
    fn name(&self) -> &'static str {
        "gofmt"
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let binary = self.binary.display().to_string();
        let mut child = Command::new(&self.binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FormatError::Unavailable {
                binary: binary.clone(),
                source,
            })?;

        // gofmt reads all of stdin before writing anything, so writing first is safe.
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| FormatError::Rejected {
                    binary: binary.clone(),
                    diagnostic: e.to_string(),
                })?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| FormatError::Rejected {
                binary: binary.clone(),
                diagnostic: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(FormatError::Rejected {
                binary,
                diagnostic: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|e| FormatError::Rejected {
            binary,
            diagnostic: e.to_string(),
        })
    }
}

/// Canonical pass followed by an external pass.
struct Chain {
    first: CanonicalFormatter,
    second: Gofmt,
    /// Skip the second pass when its binary cannot be started.
    optional_second: bool,
}

impl SourceFormatter for Chain {
    fn name(&self) -> &'static str {
        if self.optional_second {
            "auto"
        } else {
            "canonical+gofmt"
        }
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let canonical = self.first.format(source)?;
        match self.second.format(&canonical) {
            Ok(formatted) => Ok(formatted),
            Err(FormatError::Unavailable { binary, source }) if self.optional_second => {
                tracing::debug!(%binary, error = %source, "gofmt unavailable, keeping canonical output");
                Ok(canonical)
            }
            Err(e) => Err(e),
        }
    }
}

/// Built-in Go validator and formatter.
///
/// Lexes strings, runes, raw strings and comments, checks delimiter balance and
/// literal termination, requires a leading `package` clause and that every
/// top-level line begins a declaration. Output is tab-indented by block depth
/// with top-level declarations separated by exactly one blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalFormatter;

const TOP_LEVEL_KEYWORDS: &[&str] = &["import", "type", "func", "var", "const"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    BlockComment,
    RawString,
}

#[derive(Debug, Clone, Copy)]
struct Opener {
    ch: char,
    line: usize,
}

#[derive(Debug)]
enum OutLine {
    Blank,
    /// Continuation of a raw string or block comment, emitted untouched.
    Verbatim(String),
    Code {
        indent: usize,
        text: String,
        /// Starts a top-level declaration (`func`, `type`, ...).
        decl_start: bool,
        /// Top-level `//` comment line.
        top_comment: bool,
    },
}

struct Lexer {
    mode: Mode,
    stack: Vec<Opener>,
}

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

impl Lexer {
    fn pop(&mut self, close: char, line: usize) -> Result<(), FormatError> {
        match self.stack.pop() {
            Some(open) if closer_for(open.ch) == close => Ok(()),
            Some(open) => Err(FormatError::Syntax {
                line,
                message: format!(
                    "expected '{}' to close '{}' from line {}, found '{close}'",
                    closer_for(open.ch),
                    open.ch,
                    open.line
                ),
            }),
            None => Err(FormatError::Syntax {
                line,
                message: format!("unexpected '{close}'"),
            }),
        }
    }

    /// Number of distinct lines holding a still-open delimiter.
    fn indent(&self) -> usize {
        let mut lines: Vec<usize> = self.stack.iter().map(|o| o.line).collect();
        lines.dedup();
        lines.len()
    }

    fn scan(&mut self, text: &str, line: usize) -> Result<(), FormatError> {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match self.mode {
                Mode::BlockComment => {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        self.mode = Mode::Code;
                    }
                }
                Mode::RawString => {
                    if c == '`' {
                        self.mode = Mode::Code;
                    }
                }
                Mode::Code => match c {
                    '/' if chars.peek() == Some(&'/') => return Ok(()),
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        self.mode = Mode::BlockComment;
                    }
                    '`' => self.mode = Mode::RawString,
                    '"' | '\'' => {
                        let mut closed = false;
                        while let Some(n) = chars.next() {
                            if n == '\\' {
                                chars.next();
                            } else if n == c {
                                closed = true;
                                break;
                            }
                        }
                        if !closed {
                            let message = if c == '"' {
                                "string literal not terminated"
                            } else {
                                "rune literal not terminated"
                            };
                            return Err(FormatError::Syntax {
                                line,
                                message: message.to_string(),
                            });
                        }
                    }
                    '(' | '[' | '{' => self.stack.push(Opener { ch: c, line }),
                    ')' | ']' | '}' => self.pop(c, line)?,
                    _ => {}
                },
            }
        }
        Ok(())
    }
}

fn first_word(text: &str) -> &str {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default()
}

/// Leading identifier of `text`, if it is one and not a keyword.
fn leading_ident(text: &str) -> Option<&str> {
    let word = first_word(text.trim_start());
    (is_valid_identifier(word) && !GO_KEYWORDS.contains(&word)).then_some(word)
}

fn ends_clause(rest: &str) -> bool {
    let rest = rest.trim_start();
    rest.is_empty() || rest.starts_with("//") || rest.starts_with(';')
}

/// Check the clause that follows a top-level keyword.
fn check_header(word: &str, text: &str, line: usize) -> Result<(), FormatError> {
    let rest = text[word.len()..].trim_start();
    let syntax = |message: &str| FormatError::Syntax {
        line,
        message: message.to_string(),
    };
    match word {
        "package" => match leading_ident(rest) {
            Some(name) if ends_clause(&rest[name.len()..]) => Ok(()),
            _ => Err(syntax("expected package name")),
        },
        "type" if !rest.starts_with('(') => leading_ident(rest)
            .map(|_| ())
            .ok_or_else(|| syntax("expected type name")),
        "func" => {
            let name_part = match rest.strip_prefix('(') {
                Some(receiver) => {
                    let close = receiver
                        .find(')')
                        .ok_or_else(|| syntax("receiver not closed"))?;
                    let receiver_type = receiver[..close]
                        .split_whitespace()
                        .last()
                        .unwrap_or_default()
                        .trim_start_matches('*');
                    if leading_ident(receiver_type).is_none() {
                        return Err(syntax("expected receiver type"));
                    }
                    receiver[close + 1..].trim_start()
                }
                None => rest,
            };
            match leading_ident(name_part) {
                Some(name) if name_part[name.len()..].starts_with(['(', '[']) => Ok(()),
                _ => Err(syntax("expected function name")),
            }
        }
        _ => Ok(()),
    }
}

impl CanonicalFormatter {
    fn collect(&self, source: &str) -> Result<Vec<OutLine>, FormatError> {
        let mut lexer = Lexer {
            mode: Mode::Code,
            stack: Vec::new(),
        };
        let mut out = Vec::new();
        let mut seen_package = false;

        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            if lexer.mode != Mode::Code {
                out.push(OutLine::Verbatim(raw.to_string()));
                lexer.scan(raw, line)?;
                continue;
            }

            let trimmed = raw.trim_start();
            if trimmed.trim_end().is_empty() {
                out.push(OutLine::Blank);
                continue;
            }

            let leading_closers = trimmed
                .chars()
                .take_while(|c| matches!(c, ')' | ']' | '}'))
                .count();
            for c in trimmed.chars().take(leading_closers) {
                lexer.pop(c, line)?;
            }
            let indent = lexer.indent();
            lexer.scan(&trimmed[leading_closers..], line)?;

            let text = if lexer.mode == Mode::Code {
                trimmed.trim_end().to_string()
            } else {
                trimmed.to_string()
            };

            let top_level = indent == 0 && leading_closers == 0;
            let is_comment = text.starts_with("//") || text.starts_with("/*");
            let word = first_word(&text);
            let mut decl_start = false;
            if top_level && !is_comment {
                if !seen_package {
                    if word != "package" {
                        return Err(FormatError::Syntax {
                            line,
                            message: format!("expected 'package', found '{word}'"),
                        });
                    }
                    check_header(word, &text, line)?;
                    seen_package = true;
                } else if TOP_LEVEL_KEYWORDS.contains(&word) {
                    check_header(word, &text, line)?;
                    decl_start = true;
                } else {
                    return Err(FormatError::Syntax {
                        line,
                        message: format!("expected declaration, found '{word}'"),
                    });
                }
            }

            out.push(OutLine::Code {
                indent,
                top_comment: top_level && text.starts_with("//"),
                decl_start,
                text,
            });
        }

        match lexer.mode {
            Mode::BlockComment => {
                return Err(FormatError::Syntax {
                    line: source.lines().count(),
                    message: "comment not terminated".to_string(),
                })
            }
            Mode::RawString => {
                return Err(FormatError::Syntax {
                    line: source.lines().count(),
                    message: "raw string literal not terminated".to_string(),
                })
            }
            Mode::Code => {}
        }
        if let Some(open) = lexer.stack.first() {
            return Err(FormatError::Syntax {
                line: open.line,
                message: format!("'{}' is never closed", open.ch),
            });
        }
        if !seen_package {
            return Err(FormatError::Syntax {
                line: 1,
                message: "expected 'package', found EOF".to_string(),
            });
        }
        Ok(out)
    }
}

impl SourceFormatter for CanonicalFormatter {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let lines = self.collect(source)?;
        let mut emitted: Vec<String> = Vec::with_capacity(lines.len());
        // Tracks whether the previous emitted line was a top-level comment and
        // whether it opened a block, for blank-line placement.
        let mut prev_top_comment = false;
        let mut prev_opens_block = false;
        let mut pending_blank = false;

        for line in lines {
            match line {
                OutLine::Blank => {
                    if !emitted.is_empty() && !prev_opens_block {
                        pending_blank = true;
                    }
                }
                OutLine::Verbatim(text) => {
                    if std::mem::take(&mut pending_blank) {
                        emitted.push(String::new());
                    }
                    emitted.push(text);
                    prev_top_comment = false;
                    prev_opens_block = false;
                }
                OutLine::Code {
                    indent,
                    text,
                    decl_start,
                    top_comment,
                } => {
                    let closes_block = text.starts_with('}') || text.starts_with(')');
                    let wants_blank = (decl_start || top_comment) && !prev_top_comment;
                    if !emitted.is_empty() && (wants_blank || (pending_blank && !closes_block)) {
                        emitted.push(String::new());
                    }
                    pending_blank = false;
                    prev_top_comment = top_comment;
                    prev_opens_block = text.ends_with('{') || text.ends_with('(');
                    emitted.push(format!("{}{}", "\t".repeat(indent), text));
                }
            }
        }

        let mut result = emitted.join("\n");
        result.push('\n');
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_unescape_html_entities() {
        assert_eq!(
            unescape_html_entities("r.Methods(&#34;GET&#34;) &quot;x&quot; &#39;y&#39;"),
            "r.Methods(\"GET\") \"x\" 'y'"
        );
        assert_eq!(unescape_html_entities("a &amp; b"), "a &amp; b");
    }

    #[test]
    fn test_canonical_reindents_and_separates_decls() {
        let raw = "package shop\n// Shop ...\ntype Shop struct{}\nfunc (s *Shop) A() {\n      if true {\n  return\n }\n}\n\n\n\n";
        let out = CanonicalFormatter.format(raw).unwrap();
        assert_eq!(
            out,
            "package shop\n\n// Shop ...\ntype Shop struct{}\n\nfunc (s *Shop) A() {\n\tif true {\n\t\treturn\n\t}\n}\n"
        );
    }

    #[test]
    fn test_canonical_is_idempotent() {
        let raw = "package shop\nimport (\n\"net/http\"\n\n\"github.com/gorilla/mux\"\n)\n// Handler returns the Shop HTTP Handler.\nfunc (s *Shop) Handler() http.Handler {\n\n router := mux.NewRouter()\n router.HandleFunc(\"/a/{id}\", s.handleA).Methods(\"GET\")\n\n return router\n\n}\n";
        let once = CanonicalFormatter.format(raw).unwrap();
        let twice = CanonicalFormatter.format(&once).unwrap();
        assert_eq!(once, twice);
        assert!(once.contains("import (\n\t\"net/http\"\n\n\t\"github.com/gorilla/mux\"\n)\n"));
        assert!(once.contains("{\n\trouter := mux.NewRouter()"));
        assert!(once.ends_with("\treturn router\n}\n"));
    }

    #[test]
    fn test_canonical_ignores_braces_in_literals_and_comments() {
        let raw = "package x\nfunc f() {\n\ts := \"}{\" // }\n\t_ = '{'\n\t/* { */\n}\n";
        assert!(CanonicalFormatter.format(raw).is_ok());
    }

    #[test]
    fn test_canonical_rejects_unbalanced() {
        let err = CanonicalFormatter
            .format("package x\nfunc f() {\n\treturn\n")
            .unwrap_err();
        assert!(matches!(err, FormatError::Syntax { line: 2, .. }), "{err}");

        let err = CanonicalFormatter.format("package x\n}\n").unwrap_err();
        assert!(err.to_string().contains("unexpected '}'"));
    }

    #[test]
    fn test_canonical_rejects_unterminated_string() {
        let err = CanonicalFormatter
            .format("package x\nfunc f() {\n\tx := \"abc\n}\n")
            .unwrap_err();
        assert!(err.to_string().contains("string literal not terminated"));
    }

    #[test]
    fn test_canonical_requires_package_and_declarations() {
        let err = CanonicalFormatter.format("func f() {}\n").unwrap_err();
        assert!(err.to_string().contains("expected 'package'"));

        let err = CanonicalFormatter
            .format("package x\nreturn nil\n")
            .unwrap_err();
        assert!(err.to_string().contains("expected declaration, found 'return'"));
    }

    #[test]
    fn test_canonical_requires_named_headers() {
        let cases = [
            ("package\n", "expected package name"),
            ("package x y\n", "expected package name"),
            ("package func\n", "expected package name"),
            ("package x\ntype  struct{}\n", "expected type name"),
            ("package x\nfunc (s *) A() {\n}\n", "expected receiver type"),
            ("package x\nfunc (s *Shop) () (err error) {\n}\n", "expected function name"),
            ("package x\nfunc () {\n}\n", "expected function name"),
        ];
        for (source, expected) in cases {
            let err = CanonicalFormatter.format(source).unwrap_err();
            assert!(err.to_string().contains(expected), "{source:?}: {err}");
        }

        let ok = "package x // main\n\ntype (\n\tA int\n)\n\nfunc (A) F() {\n}\n\nfunc G[T any]() {\n}\n";
        assert!(CanonicalFormatter.format(ok).is_ok());
    }

    #[test]
    fn test_canonical_keeps_raw_strings_verbatim() {
        let raw = "package x\nconst s = `line one   \n   line two`\n";
        let out = CanonicalFormatter.format(raw).unwrap();
        assert!(out.contains("`line one   \n   line two`"));
    }

    #[test]
    fn test_gofmt_unavailable_is_reported() {
        let err = Gofmt::new("/nonexistent/gofmt-binary")
            .format("package x\n")
            .unwrap_err();
        assert!(matches!(err, FormatError::Unavailable { .. }));
    }

    #[test]
    fn test_auto_falls_back_when_gofmt_missing() {
        let formatter = FormatterChoice::Auto.build("/nonexistent/gofmt-binary");
        let out = formatter.format("package x\nfunc f() {\nreturn\n}\n").unwrap();
        assert_eq!(out, "package x\n\nfunc f() {\n\treturn\n}\n");

        let strict = FormatterChoice::Gofmt.build("/nonexistent/gofmt-binary");
        assert!(strict.format("package x\n").is_err());
    }

    #[test]
    fn test_formatter_choice_parse() {
        assert_eq!(FormatterChoice::parse("BUILTIN"), FormatterChoice::Builtin);
        assert_eq!(FormatterChoice::parse("gofmt"), FormatterChoice::Gofmt);
        assert_eq!(FormatterChoice::parse("whatever"), FormatterChoice::Auto);
    }

    #[test]
    fn test_post_process_unescapes_before_formatting() {
        let raw = "package x\nfunc f() {\n\tg(&#34;GET&#34;)\n}\n";
        let out = post_process(raw, &CanonicalFormatter).unwrap();
        assert!(out.contains("\tg(\"GET\")\n"));
    }
}
