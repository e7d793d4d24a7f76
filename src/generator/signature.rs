//! In-memory model of the Go declarations the synthesizers emit.
//!
//! A generated file is a [`SourceFile`]: an ordered list of [`Decl`] nodes, each
//! rendered on its own by the template engine and concatenated.

use std::fmt;

/// A `name type` pair in a parameter list, result list or struct body.
///
/// An empty `name` renders as the bare type (unnamed result).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn unnamed(ty: impl Into<String>) -> Self {
        Parameter::new("", ty)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{} {}", self.name, self.ty)
        }
    }
}

/// A function or method signature with its body.
///
/// An empty `body` is rendered as a `panic("not implemented")` stub.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub comments: String,
    /// Receiver clause without parentheses (`s *Shop`); `None` for plain functions.
    pub receiver: Option<String>,
    pub name: String,
    pub params: Vec<Parameter>,
    pub results: Vec<Parameter>,
    /// Statements, one per entry, emitted verbatim in order.
    pub body: Vec<String>,
}

impl Signature {
    pub fn method(receiver: impl Into<String>, name: impl Into<String>) -> Self {
        Signature {
            receiver: Some(receiver.into()),
            name: name.into(),
            ..Signature::default()
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_result(mut self, result: Parameter) -> Self {
        self.results.push(result);
        self
    }

    pub fn with_body<I, S>(mut self, body: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body = body.into_iter().map(Into::into).collect();
        self
    }

    /// Result list as it appears after the parameter list, including the
    /// leading space: empty, ` T` or ` (a A, b B)`.
    pub fn results_clause(&self) -> String {
        match self.results.as_slice() {
            [] => String::new(),
            [only] if only.name.is_empty() => format!(" {}", only.ty),
            many => format!(
                " ({})",
                many.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// A struct type declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructDecl {
    pub comments: String,
    pub name: String,
    pub fields: Vec<Parameter>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        StructDecl {
            name: name.into(),
            ..StructDecl::default()
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }
}

/// One group of import paths inside an `import ( ... )` block.
pub type ImportGroup = Vec<String>;

/// A top-level node of a generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Package(String),
    /// Import paths, grouped; groups are separated by a blank line.
    Imports(Vec<ImportGroup>),
    Struct(StructDecl),
    Func(Signature),
}

/// An ordered list of declarations making up one Go file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub decls: Vec<Decl>,
}

impl SourceFile {
    pub fn new(package: impl Into<String>) -> Self {
        SourceFile {
            decls: vec![Decl::Package(package.into())],
        }
    }

    pub fn push(&mut self, decl: Decl) {
        self.decls.push(decl);
    }

    /// Number of function/method declarations.
    pub fn func_count(&self) -> usize {
        self.decls
            .iter()
            .filter(|d| matches!(d, Decl::Func(_)))
            .count()
    }
}

/// Quote `value` as a Go interpreted string literal.
///
/// `&` is written as `\u0026` (as Go's own HTML-safe JSON encoder does) so that no
/// HTML entity sequence can appear inside a literal.
pub fn go_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '&' => out.push_str("\\u0026"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{code:02x}"));
                } else {
                    out.push_str(&format!("\\u{code:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_clause_shapes() {
        let none = Signature::method("s *Shop", "A");
        assert_eq!(none.results_clause(), "");

        let unnamed = Signature::method("s *Shop", "Handler").with_result(Parameter::unnamed("http.Handler"));
        assert_eq!(unnamed.results_clause(), " http.Handler");

        let named = Signature::method("s *Shop", "Get").with_result(Parameter::new("err", "error"));
        assert_eq!(named.results_clause(), " (err error)");

        let two = Signature::method("s *Shop", "Get")
            .with_result(Parameter::new("n", "int"))
            .with_result(Parameter::new("err", "error"));
        assert_eq!(two.results_clause(), " (n int, err error)");
    }

    #[test]
    fn test_go_string_literal_escaping() {
        assert_eq!(go_string_literal("/api/elem/{id}"), r#""/api/elem/{id}""#);
        assert_eq!(go_string_literal(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(go_string_literal("x&#34;y"), r#""x\u0026#34;y""#);
        assert_eq!(go_string_literal("tab\there"), r#""tab\there""#);
        assert_eq!(go_string_literal("\u{1}"), r#""\x01""#);
    }

    #[test]
    fn test_source_file_counts_funcs() {
        let mut file = SourceFile::new("shop");
        file.push(Decl::Struct(StructDecl::new("Shop")));
        file.push(Decl::Func(Signature::method("s *Shop", "A")));
        assert_eq!(file.func_count(), 1);
    }
}
