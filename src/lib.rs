//! # genapi
//!
//! **genapi** scaffolds a Go REST microservice from a declarative description: a
//! service name plus a list of named endpoints, each bound to a URL pattern and an
//! HTTP method. Two files are produced once and then edited by hand:
//!
//! - `service.go` - the service struct and one placeholder method per endpoint
//! - `handler.go` - one `net/http` handler per endpoint plus a `Handler()` method
//!   that wires every endpoint into a `gorilla/mux` router
//!
//! ## Architecture
//!
//! - **[`spec`]** - the [`RestApi`]/[`Endpoint`] input model, config loading and the
//!   [`RestApiBuilder`] used by interactive sessions
//! - **[`linter`]** - input validation run before anything is rendered
//! - **[`generator`]** - signature model, askama templates, the service and handler
//!   synthesizers, the post-processor/formatters and the all-or-nothing writer
//! - **[`bootstrap`]** - `go mod init` / `go mod tidy` for freshly generated projects
//! - **[`cli`]** - the `genapi` command line (`create`, `init`, `generate`, `lint`,
//!   `shell`)
//!
//! ### Generation Flow
//!
//! ```text
//! RestApi ──lint──▶ service synthesizer ─┐
//!                                       ├─▶ unescape ─▶ format/validate ─▶ writer
//!                   handler synthesizer ─┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use genapi::{Endpoint, GenerateOptions, RestApi};
//!
//! # fn main() -> Result<(), genapi::GenError> {
//! let api = RestApi::new("shop")
//!     .with_endpoint(Endpoint::new("GetElem", "/api/elem/{id}", "GET"))
//!     .with_endpoint(Endpoint::new("SetElem", "/api/elem/{id}", "POST"));
//!
//! let project = api.generate(&GenerateOptions::new("shop"))?;
//! println!("wrote {:?}", project.service_path);
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod generator;
pub mod linter;
pub mod logging;
pub mod runtime_config;
pub mod spec;

pub use error::GenError;
pub use generator::{GenerateOptions, GeneratedProject, RenderedSources, WriteMode};
pub use spec::{load_rest_api, Endpoint, RestApi, RestApiBuilder};
