use super::types::{Endpoint, RestApi};

/// Accumulates an API description step by step.
///
/// Interactive sessions own exactly one builder and feed it one command at a
/// time; nothing is shared between sessions.
#[derive(Debug, Clone, Default)]
pub struct RestApiBuilder {
    service_name: String,
    import_path: Option<String>,
    endpoints: Vec<Endpoint>,
}

impl RestApiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service name.
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Set the Go module path.
    pub fn import_path(mut self, path: impl Into<String>) -> Self {
        self.import_path = Some(path.into());
        self
    }

    /// Append an endpoint. Order is preserved through generation.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    pub fn set_service_name(&mut self, name: impl Into<String>) {
        self.service_name = name.into();
    }

    pub fn add_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoints.push(endpoint);
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn current_service_name(&self) -> &str {
        &self.service_name
    }

    /// Snapshot the accumulated description.
    pub fn build(&self) -> RestApi {
        RestApi {
            service_name: self.service_name.clone(),
            import_path: self.import_path.clone(),
            endpoints: self.endpoints.clone(),
        }
    }
}

impl From<RestApi> for RestApiBuilder {
    fn from(api: RestApi) -> Self {
        RestApiBuilder {
            service_name: api.service_name,
            import_path: api.import_path,
            endpoints: api.endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain_and_mutation_agree() {
        let chained = RestApiBuilder::new()
            .service_name("shop")
            .endpoint(Endpoint::new("GetElem", "/e", "GET"))
            .build();

        let mut stepwise = RestApiBuilder::new();
        stepwise.set_service_name("shop");
        stepwise.add_endpoint(Endpoint::new("GetElem", "/e", "GET"));

        assert_eq!(chained, stepwise.build());
    }

    #[test]
    fn test_build_is_a_snapshot() {
        let mut builder = RestApiBuilder::new().service_name("shop");
        let before = builder.build();
        builder.add_endpoint(Endpoint::new("Ping", "/ping", "GET"));
        assert!(before.endpoints.is_empty());
        assert_eq!(builder.build().endpoints.len(), 1);
    }
}
