use crate::error::GenError;
use crate::linter::{lint_inputs, reject_errors};
use crate::spec::Endpoint;

use super::format::{post_process, SourceFormatter};
use super::naming::{method_name, ServiceNames};
use super::signature::{Decl, Parameter, Signature, SourceFile, StructDecl};
use super::templates::render_source;

/// File name of the generated service stub.
pub const SERVICE_FILE: &str = "service.go";

/// Build the declaration list for `service.go`.
///
/// One struct for the service, then one `Name() (err error)` stub per endpoint
/// in input order. The stubs return `nil` until the user fills them in.
pub fn build_service_file(names: &ServiceNames, endpoints: &[Endpoint]) -> SourceFile {
    let mut file = SourceFile::new(&names.package);
    file.push(Decl::Struct(
        StructDecl::new(&names.type_name).with_comments(format!("{} ...", names.type_name)),
    ));

    for endpoint in endpoints {
        let name = method_name(&endpoint.name);
        tracing::debug!(endpoint = %endpoint, method = %name, "service stub");
        file.push(Decl::Func(
            Signature::method(names.receiver_clause(), &name)
                .with_comments(format!("{name} ..."))
                .with_result(Parameter::new("err", "error"))
                .with_body(["return nil"]),
        ));
    }
    file
}

/// Synthesize the formatted contents of `service.go`.
///
/// # Errors
///
/// - [`GenError::InvalidApi`] if a name does not form a Go identifier, or any
///   other linter error
/// - [`GenError::Template`] if a template fails to render
/// - [`GenError::FormatValidation`] if the assembled text does not parse
pub fn synthesize_service(
    package: &str,
    service: &str,
    endpoints: &[Endpoint],
    formatter: &dyn SourceFormatter,
) -> Result<String, GenError> {
    reject_errors(&lint_inputs(package, service, endpoints))?;
    let names = ServiceNames::new(package, service);
    let raw = render_source(&build_service_file(&names, endpoints))?;
    post_process(&raw, formatter).map_err(|source| GenError::FormatValidation {
        file: SERVICE_FILE,
        source,
    })
}
