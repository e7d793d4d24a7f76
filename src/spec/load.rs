use std::path::Path;

use anyhow::Context;

use super::types::RestApi;

/// Load an API description from disk.
///
/// `.yaml`/`.yml` files are read as YAML, anything else as JSON.
pub fn load_rest_api(path: &Path) -> anyhow::Result<RestApi> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read configuration file {path:?}"))?;
    let is_yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);
    let api = if is_yaml {
        parse_rest_api_yaml(&content)
    } else {
        parse_rest_api_json(&content)
    }
    .with_context(|| format!("unable to decode {path:?} into an API description"))?;
    tracing::debug!(
        service = %api.service_name,
        endpoints = api.endpoints.len(),
        "loaded API description"
    );
    Ok(api)
}

pub fn parse_rest_api_yaml(content: &str) -> anyhow::Result<RestApi> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn parse_rest_api_json(content: &str) -> anyhow::Result<RestApi> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SHOP_YAML: &str = r#"
ServiceName: shop
Endpoints:
  - Name: "GetElem"
    Method: "GET"
    URL: "/api/elem/{id}"
  - Name: "SetElem"
    Method: "POST"
    URL: "/api/elem/{id}"
"#;

    #[test]
    fn test_parse_yaml_keeps_endpoint_order() {
        let api = parse_rest_api_yaml(SHOP_YAML).unwrap();
        assert_eq!(api.service_name, "shop");
        assert_eq!(api.import_path, None);
        let names: Vec<_> = api.endpoints.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["GetElem", "SetElem"]);
        assert_eq!(api.endpoints[1].url, "/api/elem/{id}");
        assert_eq!(api.endpoints[1].method, "POST");
    }

    #[test]
    fn test_parse_lowercase_keys() {
        let api = parse_rest_api_yaml(
            "servicename: shop\nimportpath: example.com/shop\nendpoints:\n  - name: a\n    url: /a\n    method: get\n",
        )
        .unwrap();
        assert_eq!(api.import_path.as_deref(), Some("example.com/shop"));
        assert_eq!(api.endpoints[0].normalized_method(), "GET");
    }

    #[test]
    fn test_parse_missing_endpoints_defaults_to_empty() {
        let api = parse_rest_api_yaml("ServiceName: shop\n").unwrap();
        assert!(api.endpoints.is_empty());
    }

    #[test]
    fn test_missing_endpoint_keys_are_left_to_the_linter() {
        let yaml = "ServiceName: shop\nEndpoints:\n  - URL: /a\n    Method: GET\n  - Name: Put\n    URL: /b\n";
        let api = parse_rest_api_yaml(yaml).unwrap();
        assert_eq!(api.endpoints.len(), 2);
        assert_eq!(api.endpoints[0].name, "");
        assert_eq!(api.endpoints[1].method, "");

        let kinds: Vec<_> = crate::linter::lint_api(&api).into_iter().map(|i| i.kind).collect();
        assert_eq!(kinds, ["missing_endpoint_name", "missing_method"]);

        let api = parse_rest_api_json(r#"{"ServiceName":"shop","Endpoints":[{"Name":"A"}]}"#).unwrap();
        assert_eq!(api.endpoints[0].url, "");
    }

    #[test]
    fn test_load_json_by_extension() {
        let mut temp = NamedTempFile::with_suffix(".json").expect("create temp file");
        temp.write_all(br#"{"ServiceName":"shop","Endpoints":[{"Name":"Ping","URL":"/ping","Method":"GET"}]}"#)
            .expect("write config");
        temp.flush().expect("flush");
        let api = load_rest_api(temp.path()).unwrap();
        assert_eq!(api.endpoints.len(), 1);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_rest_api(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("not/here.yaml"));
    }
}
