//! # Generator Module
//!
//! Turns a [`RestApi`](crate::spec::RestApi) into two Go source files: a service
//! stub and a gorilla/mux handler that routes every endpoint to it.
//!
//! ## Overview
//!
//! - **`service.go`** - one struct named after the service, one
//!   `Name() (err error)` stub per endpoint
//! - **`handler.go`** - one `handleName(w, req)` adapter per endpoint plus a
//!   `Handler() http.Handler` method that registers every route
//!
//! ## Architecture
//!
//! ```text
//! RestApi → lint → Signature/Decl list → askama templates → post-process → write
//! ```
//!
//! 1. **Naming** - service and endpoint names are normalized into Go identifiers
//!    ([`naming`])
//! 2. **Declarations** - each synthesizer builds a [`SourceFile`] of [`Decl`]
//!    nodes; user text bound for string literals is quoted by
//!    [`go_string_literal`]
//! 3. **Template Rendering** - each node is rendered through an askama template
//!    in `templates/`
//! 4. **Post-processing** - entity reversal followed by a [`SourceFormatter`];
//!    a parse failure aborts the run
//! 5. **Writing** - both files are staged and moved into place together
//!
//! ## Generated Structure
//!
//! ```text
//! shop/
//! ├── service.go     # type Shop struct{} + one stub per endpoint
//! └── handler.go     # handleX per endpoint + Handler()
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use genapi::{Endpoint, GenerateOptions, RestApi};
//! use genapi::generator::FormatterChoice;
//!
//! # fn main() -> Result<(), genapi::GenError> {
//! let api = RestApi::new("shop")
//!     .with_endpoint(Endpoint::new("GetElem", "/api/elem/{id}", "GET"));
//! api.generate(&GenerateOptions::new("shop").with_formatter(FormatterChoice::Builtin))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Template Customization
//!
//! - `func.go.txt` - function and method declarations
//! - `struct.go.txt` - struct declarations
//! - `imports.go.txt` - grouped import block
//! - `config.yaml` - starter API description written by `genapi create`

pub mod format;
mod handler;
pub mod naming;
mod service;
mod signature;
mod templates;
mod writer;

pub use format::{
    post_process, unescape_html_entities, CanonicalFormatter, FormatError, FormatterChoice, Gofmt,
    SourceFormatter,
};
pub use handler::{build_handler_file, plan_routes, synthesize_handler, RouteRegistration, HANDLER_FILE, MUX_IMPORT};
pub use service::{build_service_file, synthesize_service, SERVICE_FILE};
pub use signature::{go_string_literal, Decl, ImportGroup, Parameter, Signature, SourceFile, StructDecl};
pub use templates::*;
pub use writer::{GenerateOptions, GeneratedProject, RenderedSources, WriteMode};
