//! # API Description Linter
//!
//! Checks a [`RestApi`] before anything is rendered, so that problems show up as
//! readable diagnostics instead of as generated Go that does not compile.
//!
//! ## Checks Performed
//!
//! 1. **Service name** - present, normalizes to an identifier, package is not a Go keyword
//!    (the package clause is checked on its own when a caller supplies one)
//! 2. **Endpoint names** - present, valid, unique after normalization, not `Handler`
//! 3. **HTTP methods** - present and a valid HTTP token (warning if non-standard)
//! 4. **Routes** - no two endpoints share the same URL pattern and method
//!
//! URL patterns are passed through to the router untouched and are not checked.
//!
//! ## Usage
//!
//! ```rust
//! use genapi::linter::{lint_api, LintSeverity};
//! use genapi::{Endpoint, RestApi};
//!
//! let api = RestApi::new("shop")
//!     .with_endpoint(Endpoint::new("GetElem", "/e", "GET"))
//!     .with_endpoint(Endpoint::new("getElem", "/f", "GET"));
//! let issues = lint_api(&api);
//! assert!(issues.iter().any(|i| i.severity == LintSeverity::Error));
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::generator::naming::{
    is_valid_identifier, method_name, normalize_identifier, package_name, GO_KEYWORDS, HANDLER_METHOD,
};
use crate::error::GenError;
use crate::spec::{Endpoint, RestApi};


/// Methods that never produce a `nonstandard_method` warning.
const STANDARD_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "TRACE", "CONNECT",
];

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Error - generation is refused
    Error,
    /// Warning - generation proceeds
    Warning,
    /// Info - best practice suggestion
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "ERROR"),
            LintSeverity::Warning => write!(f, "WARN"),
            LintSeverity::Info => write!(f, "INFO"),
        }
    }
}

/// A lint issue found in an API description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// Where the issue occurred (e.g. `service`, `endpoint[1]:GetElem`)
    pub location: String,
    /// Severity of the issue
    pub severity: LintSeverity,
    /// Type of lint issue (e.g. `duplicate_route`)
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    /// Create a new lint issue
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Lint an API description.
///
/// Issues are returned in input order: service checks first, then endpoints.
pub fn lint_api(api: &RestApi) -> Vec<LintIssue> {
    lint_inputs(&api.service_name, &api.service_name, &api.endpoints)
}

/// Lint the pieces a synthesizer works from.
///
/// Same checks as [`lint_api`], plus the package clause when it is derived from
/// something other than the service name.
pub fn lint_inputs(package: &str, service: &str, endpoints: &[Endpoint]) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    lint_service(service, &mut issues);
    if package_name(package) != package_name(service) {
        lint_package("package", package, &mut issues);
    }

    if endpoints.is_empty() {
        issues.push(LintIssue::new(
            "endpoints",
            LintSeverity::Warning,
            "no_endpoints",
            "no endpoints declared; only the service type and an empty router will be generated",
        ));
    }

    let mut names: HashMap<String, usize> = HashMap::new();
    let mut routes: HashMap<(String, String), usize> = HashMap::new();

    for (idx, endpoint) in endpoints.iter().enumerate() {
        let location = format!("endpoint[{idx}]:{}", endpoint.name);
        let normalized = method_name(&endpoint.name);

        if endpoint.name.trim().is_empty() {
            issues.push(LintIssue::new(
                &location,
                LintSeverity::Error,
                "missing_endpoint_name",
                "endpoint has no name",
            ));
        } else if !is_valid_identifier(&normalized) {
            issues.push(
                LintIssue::new(
                    &location,
                    LintSeverity::Error,
                    "invalid_endpoint_name",
                    format!("'{}' does not form a Go identifier", endpoint.name),
                )
                .with_suggestion("start the name with a letter"),
            );
        } else if normalized == HANDLER_METHOD {
            issues.push(
                LintIssue::new(
                    &location,
                    LintSeverity::Error,
                    "reserved_endpoint_name",
                    format!("'{}' clashes with the generated {HANDLER_METHOD}() method", endpoint.name),
                )
                .with_suggestion("rename the endpoint"),
            );
        } else if let Some(first) = names.insert(normalized.clone(), idx) {
            issues.push(LintIssue::new(
                &location,
                LintSeverity::Error,
                "duplicate_endpoint_name",
                format!("'{}' normalizes to {normalized}, already used by endpoint[{first}]", endpoint.name),
            ));
        }

        let method = endpoint.normalized_method();
        if method.is_empty() {
            issues.push(
                LintIssue::new(&location, LintSeverity::Error, "missing_method", "endpoint has no HTTP method")
                    .with_suggestion("use GET, POST, PUT, DELETE or PATCH"),
            );
        } else if http::Method::from_bytes(method.as_bytes()).is_err() {
            issues.push(LintIssue::new(
                &location,
                LintSeverity::Error,
                "invalid_method",
                format!("'{}' is not a valid HTTP method", endpoint.method),
            ));
        } else {
            if !STANDARD_METHODS.contains(&method.as_str()) {
                issues.push(LintIssue::new(
                    &location,
                    LintSeverity::Warning,
                    "nonstandard_method",
                    format!("'{method}' is not a standard HTTP method"),
                ));
            }
            if let Some(first) = routes.insert((endpoint.url.clone(), method.clone()), idx) {
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Error,
                        "duplicate_route",
                        format!(
                            "{method} {} is already registered by endpoint[{first}]; the router would shadow one of them",
                            endpoint.url
                        ),
                    )
                    .with_suggestion("merge the endpoints or change the URL pattern"),
                );
            }
        }
    }

    issues
}

fn lint_service(service: &str, issues: &mut Vec<LintIssue>) {
    if service.trim().is_empty() {
        issues.push(
            LintIssue::new("service", LintSeverity::Error, "missing_service_name", "service name is empty")
                .with_suggestion("set ServiceName in the configuration"),
        );
        return;
    }
    let type_name = normalize_identifier(service);
    if !is_valid_identifier(&type_name) {
        issues.push(
            LintIssue::new(
                "service",
                LintSeverity::Error,
                "invalid_service_name",
                format!("'{service}' does not form a Go identifier"),
            )
            .with_suggestion("start the name with a letter"),
        );
        return;
    }
    lint_package("service", service, issues);
}

fn lint_package(location: &str, raw: &str, issues: &mut Vec<LintIssue>) {
    let package = package_name(raw);
    if !is_valid_identifier(&package) {
        issues.push(LintIssue::new(
            location,
            LintSeverity::Error,
            "invalid_package_name",
            format!("'{raw}' does not form a package name"),
        ));
    } else if GO_KEYWORDS.contains(&package.as_str()) {
        issues.push(LintIssue::new(
            location,
            LintSeverity::Error,
            "reserved_package_name",
            format!("package name '{package}' is a Go keyword"),
        ));
    }
}

/// Fail with [`GenError::InvalidApi`] when `issues` holds any error.
pub fn reject_errors(issues: &[LintIssue]) -> Result<(), GenError> {
    let errors = errors_only(issues);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(GenError::InvalidApi { issues: errors })
    }
}

/// Keep only the issues that block generation.
pub fn errors_only(issues: &[LintIssue]) -> Vec<LintIssue> {
    issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .cloned()
        .collect()
}

/// Print lint issues to stderr
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        eprintln!("✅ No lint issues found");
        return;
    }
    for issue in issues {
        eprintln!("[{}] {} ({}): {}", issue.severity, issue.location, issue.kind, issue.message);
        if let Some(suggestion) = &issue.suggestion {
            eprintln!("    💡 {suggestion}");
        }
    }
    let errors = issues.iter().filter(|i| i.severity == LintSeverity::Error).count();
    eprintln!("\n{} issue(s), {errors} error(s)", issues.len());
}
