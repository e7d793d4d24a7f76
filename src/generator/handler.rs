use crate::error::GenError;
use crate::linter::{lint_inputs, reject_errors};
use crate::spec::Endpoint;

use super::format::{post_process, SourceFormatter};
use super::naming::{handler_name, method_name, ServiceNames, HANDLER_METHOD};
use super::signature::{go_string_literal, Decl, Parameter, Signature, SourceFile};
use super::templates::render_source;

/// File name of the generated handler stub.
pub const HANDLER_FILE: &str = "handler.go";

/// Router library the generated `Handler()` builds on.
pub const MUX_IMPORT: &str = "github.com/gorilla/mux";

/// One `router.HandleFunc(...)` line of the generated `Handler()` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRegistration {
    pub url: String,
    /// Upper-cased HTTP verb
    pub method: String,
    /// Handler method the route dispatches to (`handleGetElem`)
    pub handler: String,
}

impl RouteRegistration {
    /// Go statement registering this route on the local `router`.
    pub fn statement(&self, receiver: &str) -> String {
        format!(
            "router.HandleFunc({}, {receiver}.{}).Methods({})",
            go_string_literal(&self.url),
            self.handler,
            go_string_literal(&self.method)
        )
    }
}

/// Route registrations in endpoint order.
///
/// Order is kept as given: gorilla/mux matches routes in registration order, so
/// a later identical URL+verb pair would never be reached. Uniqueness is the
/// linter's job, not this function's.
pub fn plan_routes(endpoints: &[Endpoint]) -> Vec<RouteRegistration> {
    endpoints
        .iter()
        .map(|e| RouteRegistration {
            url: e.url.clone(),
            method: e.normalized_method(),
            handler: handler_name(&e.name),
        })
        .collect()
}

fn handler_stub(names: &ServiceNames, endpoint: &Endpoint) -> Signature {
    let handler = handler_name(&endpoint.name);
    Signature::method(names.receiver_clause(), &handler)
        .with_comments(format!("{handler} ..."))
        .with_param(Parameter::new("w", "http.ResponseWriter"))
        .with_param(Parameter::new("req", "*http.Request"))
        .with_body([
            format!("err := {}.{}()", names.receiver, method_name(&endpoint.name)),
            "if err != nil {".to_string(),
            "http.Error(w, err.Error(), http.StatusInternalServerError)".to_string(),
            "return".to_string(),
            "}".to_string(),
            "w.WriteHeader(http.StatusNotImplemented)".to_string(),
        ])
}

/// Build the declaration list for `handler.go`.
///
/// Imports, one private handler per endpoint, then the exported `Handler()`
/// aggregator that registers every route in endpoint order.
pub fn build_handler_file(names: &ServiceNames, endpoints: &[Endpoint]) -> SourceFile {
    let mut file = SourceFile::new(&names.package);
    file.push(Decl::Imports(vec![
        vec!["net/http".to_string()],
        vec![MUX_IMPORT.to_string()],
    ]));

    for endpoint in endpoints {
        tracing::debug!(endpoint = %endpoint, "handler stub");
        file.push(Decl::Func(handler_stub(names, endpoint)));
    }

    let mut body = vec!["router := mux.NewRouter()".to_string()];
    body.extend(
        plan_routes(endpoints)
            .iter()
            .map(|route| route.statement(&names.receiver)),
    );
    body.push("return router".to_string());

    file.push(Decl::Func(
        Signature::method(names.receiver_clause(), HANDLER_METHOD)
            .with_comments(format!(
                "{HANDLER_METHOD} returns the {} HTTP Handler.",
                names.type_name
            ))
            .with_result(Parameter::unnamed("http.Handler"))
            .with_body(body),
    ));
    file
}

/// Synthesize the formatted contents of `handler.go`.
///
/// # Errors
///
/// - [`GenError::InvalidApi`] if a name does not form a Go identifier, or any
///   other linter error
/// - [`GenError::Template`] if a template fails to render
/// - [`GenError::FormatValidation`] if the assembled text does not parse
pub fn synthesize_handler(
    package: &str,
    service: &str,
    endpoints: &[Endpoint],
    formatter: &dyn SourceFormatter,
) -> Result<String, GenError> {
    reject_errors(&lint_inputs(package, service, endpoints))?;
    let names = ServiceNames::new(package, service);
    let raw = render_source(&build_handler_file(&names, endpoints))?;
    post_process(&raw, formatter).map_err(|source| GenError::FormatValidation {
        file: HANDLER_FILE,
        source,
    })
}
