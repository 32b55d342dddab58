//! Integration tests for the HTTP schema provider using wiremock
//!
//! These tests verify CRD downloads against mocked endpoints, including
//! error statuses and malformed documents.

use atlas_k8s::capability::{
    crd_file_name, CapabilitySet, HttpSchemaProvider, SchemaProvider,
};
use atlas_k8s::error::CapabilityError;
use atlas_k8s::resources::ResourceKind;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEAM_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
spec:
  versions:
  - name: v1
    schema:
      openAPIV3Schema:
        properties:
          spec:
            properties:
              name:
                type: string
              usernames:
                type: array
                items:
                  type: string
"#;

fn crd_path(kind: ResourceKind, version: &str) -> String {
    format!("/v{}/config/crd/bases/{}", version, crd_file_name(kind))
}

#[tokio::test]
async fn test_fetch_parses_spec_schema() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(crd_path(ResourceKind::Team, "2.5.0")))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEAM_CRD))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpSchemaProvider::new(&server.uri()).unwrap();
    let spec = provider
        .fetch(ResourceKind::Team, "2.5.0")
        .await
        .expect("document should be served")
        .into_spec_schema()
        .unwrap();

    assert!(spec.has_path("name"));
    assert!(spec.has_path("usernames"));
    assert!(!spec.has_path("members"));
}

#[tokio::test]
async fn test_404_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404: Not Found"))
        .mount(&server)
        .await;

    let provider = HttpSchemaProvider::new(&server.uri()).unwrap();
    let err = provider
        .fetch(ResourceKind::Project, "9.9.0")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_malformed_document_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("spec: [unterminated"))
        .mount(&server)
        .await;

    let provider = HttpSchemaProvider::new(&server.uri()).unwrap();
    assert!(provider.fetch(ResourceKind::Team, "2.5.0").await.is_err());
}

#[tokio::test]
async fn test_capability_set_downloads_every_kind_of_version() {
    let server = MockServer::start().await;

    // 2.2.0 ships eight kinds, each requested exactly once
    Mock::given(method("GET"))
        .and(path_regex(r"^/v2\.2\.0/config/crd/bases/atlas\.mongodb\.com_atlas[a-z]+\.yaml$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TEAM_CRD))
        .expect(8)
        .mount(&server)
        .await;

    let provider = HttpSchemaProvider::new(&server.uri()).unwrap();
    let caps = CapabilitySet::load(&provider, "2.2.0").await.unwrap();

    assert!(caps.is_kind_supported(ResourceKind::Team));
    assert!(caps.is_kind_supported(ResourceKind::Secret));
    assert!(!caps.is_kind_supported(ResourceKind::StreamInstance));
    assert!(caps.is_field_path_supported(ResourceKind::Deployment, "usernames"));
}

#[tokio::test]
async fn test_server_error_makes_schema_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = HttpSchemaProvider::new(&server.uri()).unwrap();
    let err = CapabilitySet::load(&provider, "2.3.1").await.unwrap_err();
    match err {
        CapabilityError::SchemaUnavailable { version, reason, .. } => {
            assert_eq!(version, "2.3.0");
            assert!(reason.contains("503"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
