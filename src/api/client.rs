//! Vanta REST client
//!
//! Thin typed wrapper over [`HttpClient`]: one method per endpoint, each a
//! single HTTP call. Pagination loops live with the callers.

use super::options::{ListEvidenceOptions, ListTestEntitiesOptions, ListTestsOptions};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::model::{
    Computer, Evidence, Group, Integration, Person, Policy, Test, TestEntity, Vendor,
};
use crate::pagination::{ListOutput, PageRequest};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

/// Characters escaped in path segments
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the Vanta REST API
#[derive(Debug)]
pub struct VantaClient {
    http: HttpClient,
    base_url: String,
}

impl VantaClient {
    /// Build a client from a connection config without contacting the API
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(config.http_client_config(), config.auth_config()?)?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    /// Build a client and, for OAuth credentials, obtain the first token so
    /// bad credentials surface here rather than on the first query
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let client = Self::new(config)?;
        let auth = client.http.authenticator();
        if auth.can_refresh() {
            auth.get_or_refresh_token().await?;
        }
        info!(base_url = %client.base_url, "connected to Vanta");
        Ok(client)
    }

    /// API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ========================================================================
    // People
    // ========================================================================

    /// `GET /v1/people`
    pub async fn list_people(&self, page: &PageRequest) -> Result<ListOutput<Person>> {
        self.list("/v1/people", page.apply(RequestConfig::new())).await
    }

    /// `GET /v1/people/{id}`
    pub async fn get_person(&self, id: &str) -> Result<Person> {
        self.get("/v1/people", "person", id).await
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// `GET /v1/groups`
    pub async fn list_groups(&self, page: &PageRequest) -> Result<ListOutput<Group>> {
        self.list("/v1/groups", page.apply(RequestConfig::new())).await
    }

    /// `GET /v1/groups/{id}`
    pub async fn get_group(&self, id: &str) -> Result<Group> {
        self.get("/v1/groups", "group", id).await
    }

    // ========================================================================
    // Policies
    // ========================================================================

    /// `GET /v1/policies`
    pub async fn list_policies(&self, page: &PageRequest) -> Result<ListOutput<Policy>> {
        self.list("/v1/policies", page.apply(RequestConfig::new())).await
    }

    /// `GET /v1/policies/{id}`
    pub async fn get_policy(&self, id: &str) -> Result<Policy> {
        self.get("/v1/policies", "policy", id).await
    }

    // ========================================================================
    // Integrations
    // ========================================================================

    /// `GET /v1/integrations`
    pub async fn list_integrations(&self, page: &PageRequest) -> Result<ListOutput<Integration>> {
        self.list("/v1/integrations", page.apply(RequestConfig::new()))
            .await
    }

    /// `GET /v1/integrations/{id}`
    pub async fn get_integration(&self, id: &str) -> Result<Integration> {
        self.get("/v1/integrations", "integration", id).await
    }

    // ========================================================================
    // Monitored computers
    // ========================================================================

    /// `GET /v1/monitored-computers`
    pub async fn list_computers(&self, page: &PageRequest) -> Result<ListOutput<Computer>> {
        self.list("/v1/monitored-computers", page.apply(RequestConfig::new()))
            .await
    }

    /// `GET /v1/monitored-computers/{id}`
    pub async fn get_computer(&self, id: &str) -> Result<Computer> {
        self.get("/v1/monitored-computers", "computer", id).await
    }

    // ========================================================================
    // Vendors
    // ========================================================================

    /// `GET /v1/vendors`
    pub async fn list_vendors(&self, page: &PageRequest) -> Result<ListOutput<Vendor>> {
        self.list("/v1/vendors", page.apply(RequestConfig::new())).await
    }

    /// `GET /v1/vendors/{id}`
    pub async fn get_vendor(&self, id: &str) -> Result<Vendor> {
        self.get("/v1/vendors", "vendor", id).await
    }

    // ========================================================================
    // Tests
    // ========================================================================

    /// `GET /v1/tests`
    pub async fn list_tests(&self, options: &ListTestsOptions) -> Result<ListOutput<Test>> {
        self.list("/v1/tests", options.to_request()).await
    }

    /// `GET /v1/tests/{id}`
    pub async fn get_test(&self, id: &str) -> Result<Test> {
        self.get("/v1/tests", "test", id).await
    }

    /// `GET /v1/tests/{id}/entities`
    pub async fn list_test_entities(
        &self,
        test_id: &str,
        options: &ListTestEntitiesOptions,
    ) -> Result<ListOutput<TestEntity>> {
        let path = format!("/v1/tests/{}/entities", encode_id("test", test_id)?);
        self.list(&path, options.to_request()).await
    }

    // ========================================================================
    // Evidence
    // ========================================================================

    /// `GET /v1/audits/{auditId}/evidence`
    pub async fn list_evidence(
        &self,
        audit_id: &str,
        options: &ListEvidenceOptions,
    ) -> Result<ListOutput<Evidence>> {
        let path = format!("/v1/audits/{}/evidence", encode_id("audit", audit_id)?);
        self.list(&path, options.to_request()).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestConfig,
    ) -> Result<ListOutput<T>> {
        let output: ListOutput<T> = self.fetch(path, request).await?;
        debug!(
            path,
            rows = output.results.data.len(),
            has_next_page = output.page_info().has_next_page,
            "list response"
        );
        Ok(output)
    }

    async fn get<T: DeserializeOwned>(&self, collection: &str, kind: &str, id: &str) -> Result<T> {
        let path = format!("{collection}/{}", encode_id(kind, id)?);
        self.fetch(&path, RequestConfig::new()).await
    }

    /// Fetch and decode a body. JSON `null`s are dropped first so nullable
    /// scalars fall back to their defaults instead of failing the decode.
    async fn fetch<T: DeserializeOwned>(&self, path: &str, request: RequestConfig) -> Result<T> {
        let mut body: Value = self.http.get_json(path, &request).await?;
        strip_nulls(&mut body);
        serde_json::from_value(body)
            .map_err(|e| Error::decode(format!("failed to JSON-decode response from {path}: {e}")))
    }
}

/// Validate and percent-encode a resource id for use in a path
fn encode_id(kind: &str, id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{kind} ID cannot be empty")));
    }
    Ok(utf8_percent_encode(id, PATH_SEGMENT).to_string())
}

/// Remove object members whose value is `null`, recursively
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_id() {
        assert_eq!(encode_id("person", "abc-123").unwrap(), "abc-123");
        assert_eq!(encode_id("person", "a/b c").unwrap(), "a%2Fb%20c");
        let err = encode_id("person", "  ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: person ID cannot be empty");
    }

    #[test]
    fn test_strip_nulls() {
        let mut value = json!({"a": null, "b": {"c": null, "d": 1}, "e": [{"f": null}]});
        strip_nulls(&mut value);
        assert_eq!(value, json!({"b": {"d": 1}, "e": [{}]}));
    }
}
