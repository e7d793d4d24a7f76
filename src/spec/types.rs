use serde::{Deserialize, Serialize};

/// Description of a REST service to scaffold.
///
/// Field names follow the config file layout (`ServiceName`, `Endpoints`, ...);
/// lower-case and snake_case spellings are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestApi {
    #[serde(rename = "ServiceName", alias = "servicename", alias = "service_name")]
    pub service_name: String,

    /// Go module path used by `go mod init`. Defaults to the package name.
    #[serde(
        rename = "ImportPath",
        alias = "importpath",
        alias = "import_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub import_path: Option<String>,

    #[serde(rename = "Endpoints", alias = "endpoints", default)]
    pub endpoints: Vec<Endpoint>,
}

impl RestApi {
    pub fn new(service_name: impl Into<String>) -> Self {
        RestApi {
            service_name: service_name.into(),
            import_path: None,
            endpoints: Vec::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    pub fn with_import_path(mut self, import_path: impl Into<String>) -> Self {
        self.import_path = Some(import_path.into());
        self
    }
}

/// A named HTTP operation: the unit of generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    /// URL pattern, passed through to the router as-is (`/api/elem/{id}`).
    #[serde(rename = "URL", alias = "url", alias = "Url", default)]
    pub url: String,
    #[serde(rename = "Method", alias = "method", default)]
    pub method: String,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>, method: impl Into<String>) -> Self {
        Endpoint {
            name: name.into(),
            url: url.into(),
            method: method.into(),
        }
    }

    /// HTTP verb as emitted into the router registration.
    pub fn normalized_method(&self) -> String {
        self.method.trim().to_ascii_uppercase()
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {} {}", self.name, self.normalized_method(), self.url)
    }
}
