use askama::Template;

use super::signature::{go_string_literal, Decl, ImportGroup, Parameter, Signature, SourceFile, StructDecl};

/// Template data for a struct declaration.
#[derive(Template)]
#[template(path = "struct.go.txt", escape = "none")]
pub struct StructTemplate<'a> {
    /// Doc comment, one entry per line
    pub doc: Vec<&'a str>,
    /// Type name
    pub name: &'a str,
    /// Struct fields (empty renders `struct{}`)
    pub fields: &'a [Parameter],
}

/// Template data for a function or method declaration.
#[derive(Template)]
#[template(path = "func.go.txt", escape = "none")]
pub struct FuncTemplate<'a> {
    /// Doc comment, one entry per line
    pub doc: Vec<&'a str>,
    /// Receiver clause without parentheses, empty for plain functions
    pub receiver: &'a str,
    /// Function name
    pub name: &'a str,
    /// Parameters in declaration order
    pub params: &'a [Parameter],
    /// Pre-rendered result clause, see [`Signature::results_clause`]
    pub results: String,
    /// Body statements; empty renders a "not implemented" panic
    pub body: &'a [String],
}

/// Template data for an `import ( ... )` block.
#[derive(Template)]
#[template(path = "imports.go.txt", escape = "none")]
pub struct ImportsTemplate {
    /// Quoted import paths, one inner vector per group
    pub groups: Vec<Vec<String>>,
}

/// Template for the starter `config.yaml` written by `genapi create`.
#[derive(Template)]
#[template(path = "config.yaml", escape = "none")]
pub struct ConfigYamlTemplate<'a> {
    /// Lower-cased project name, used as the service name
    pub project_name: &'a str,
    /// Go module path
    pub import_path: &'a str,
}

fn doc_lines(comments: &str) -> Vec<&str> {
    comments.lines().map(str::trim_end).collect()
}

/// Render a struct declaration.
///
/// # Errors
///
/// Returns the askama error if rendering fails.
pub fn render_struct(decl: &StructDecl) -> askama::Result<String> {
    StructTemplate {
        doc: doc_lines(&decl.comments),
        name: &decl.name,
        fields: &decl.fields,
    }
    .render()
}

/// Render a function or method declaration.
///
/// # Errors
///
/// Returns the askama error if rendering fails.
pub fn render_func(sig: &Signature) -> askama::Result<String> {
    FuncTemplate {
        doc: doc_lines(&sig.comments),
        receiver: sig.receiver.as_deref().unwrap_or_default(),
        name: &sig.name,
        params: &sig.params,
        results: sig.results_clause(),
        body: &sig.body,
    }
    .render()
}

/// Render an import block; paths are quoted here.
///
/// # Errors
///
/// Returns the askama error if rendering fails.
pub fn render_imports(groups: &[ImportGroup]) -> askama::Result<String> {
    ImportsTemplate {
        groups: groups
            .iter()
            .filter(|group| !group.is_empty())
            .map(|group| group.iter().map(|path| go_string_literal(path)).collect())
            .collect(),
    }
    .render()
}

/// Render one declaration node.
///
/// # Errors
///
/// Returns the askama error if rendering fails.
pub fn render_decl(decl: &Decl) -> askama::Result<String> {
    match decl {
        Decl::Package(name) => Ok(format!("package {name}\n")),
        Decl::Imports(groups) => render_imports(groups),
        Decl::Struct(s) => render_struct(s),
        Decl::Func(f) => render_func(f),
    }
}

/// Render every declaration of `file` in order, separated by blank lines.
///
/// The result is raw text; it still has to go through the post-processor.
///
/// # Errors
///
/// Returns the first askama error encountered.
pub fn render_source(file: &SourceFile) -> askama::Result<String> {
    let mut out = String::new();
    for decl in &file.decls {
        let rendered = render_decl(decl)?;
        out.push_str(rendered.trim_end());
        out.push_str("\n\n");
    }
    tracing::debug!(decls = file.decls.len(), bytes = out.len(), "rendered source");
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_render_empty_struct() {
        let decl = StructDecl::new("Shop").with_comments("Shop ...");
        assert_eq!(render_struct(&decl).unwrap().trim_end(), "// Shop ...\ntype Shop struct{}");
    }

    #[test]
    fn test_render_struct_with_fields() {
        let mut decl = StructDecl::new("Shop");
        decl.fields.push(Parameter::new("DB", "*sql.DB"));
        let out = render_struct(&decl).unwrap();
        assert_eq!(out.trim_end(), "type Shop struct {\n\tDB *sql.DB\n}");
    }

    #[test]
    fn test_render_func_default_body_panics() {
        let sig = Signature::method("s *Shop", "Todo");
        let out = render_func(&sig).unwrap();
        assert_eq!(
            out.trim_end(),
            "func (s *Shop) Todo() {\n\tpanic(\"not implemented\")\n}"
        );
    }

    #[test]
    fn test_render_func_params_results_body() {
        let sig = Signature::method("s *Shop", "handleGetElem")
            .with_comments("handleGetElem ...")
            .with_param(Parameter::new("w", "http.ResponseWriter"))
            .with_param(Parameter::new("req", "*http.Request"))
            .with_result(Parameter::new("err", "error"))
            .with_body(["return nil"]);
        let out = render_func(&sig).unwrap();
        assert_eq!(
            out.trim_end(),
            "// handleGetElem ...\nfunc (s *Shop) handleGetElem(w http.ResponseWriter, req *http.Request) (err error) {\n\treturn nil\n}"
        );
    }

    #[test]
    fn test_render_plain_function_and_multiline_doc() {
        let sig = Signature {
            comments: "first\nsecond".to_string(),
            name: "main".to_string(),
            body: vec!["run()".to_string()],
            ..Signature::default()
        };
        let out = render_func(&sig).unwrap();
        assert!(out.starts_with("// first\n// second\nfunc main() {"));
    }

    #[test]
    fn test_render_imports_groups() {
        let out = render_imports(&[
            vec!["net/http".to_string()],
            vec!["github.com/gorilla/mux".to_string()],
        ])
        .unwrap();
        assert_eq!(
            out.trim_end(),
            "import (\n\t\"net/http\"\n\n\t\"github.com/gorilla/mux\"\n)"
        );
    }

    #[test]
    fn test_render_source_is_deterministic() {
        let mut file = SourceFile::new("shop");
        file.push(Decl::Struct(StructDecl::new("Shop")));
        file.push(Decl::Func(Signature::method("s *Shop", "A")));
        assert_eq!(render_source(&file).unwrap(), render_source(&file).unwrap());
    }

    #[test]
    fn test_config_template_substitutes_project() {
        let out = ConfigYamlTemplate {
            project_name: "shop",
            import_path: "shop",
        }
        .render()
        .unwrap();
        assert!(out.starts_with("ServiceName: shop\nImportPath: shop\n"));
        assert!(out.contains("URL: \"/api/elem/{id}\""));
    }
}
