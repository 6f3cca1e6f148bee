/*
[INPUT]:  Customer params, ids and per-request headers
[OUTPUT]: Customer records and customer pages
[POS]:    HTTP layer - customer endpoints
[UPDATE]: When adding customer endpoints or changing their payloads
*/

use futures_util::Stream;
use reqwest::Method;

use super::client::require_id;
use super::headers::RequestHeaders;
use super::pagination::paginate;
use super::query::QueryParams;
use super::{Result, StraddleClient};
use crate::types::{
    ApiResponse, Customer, CustomerCreateParams, CustomerListParams, CustomerSummary,
    CustomerUpdateParams, Page, Validate,
};

impl StraddleClient {
    /// Create a customer and start identity verification
    ///
    /// POST /v1/customers
    pub async fn create_customer(
        &self,
        params: &CustomerCreateParams,
    ) -> Result<ApiResponse<Customer>> {
        params.validate()?;
        let builder = self
            .request(Method::POST, &["v1", "customers"], &params.headers)?
            .json(params);
        self.send_json(builder).await
    }

    /// List customers matching the filters
    ///
    /// GET /v1/customers?page_number={n}&page_size={n}&status={status}...
    pub async fn list_customers(
        &self,
        params: &CustomerListParams,
    ) -> Result<Page<CustomerSummary>> {
        params.validate()?;
        let builder = self
            .request(Method::GET, &["v1", "customers"], &params.headers)?
            .query(&params.query_pairs());
        self.send_json(builder).await
    }

    /// Every customer matching the filters, fetching pages lazily
    pub fn list_customers_stream(
        &self,
        params: CustomerListParams,
    ) -> impl Stream<Item = Result<CustomerSummary>> + '_ {
        paginate(params, move |page: CustomerListParams| async move {
            self.list_customers(&page).await
        })
    }

    /// GET /v1/customers/{id}
    pub async fn get_customer(
        &self,
        id: &str,
        headers: &RequestHeaders,
    ) -> Result<ApiResponse<Customer>> {
        let id = require_id("id", id)?;
        let builder = self.request(Method::GET, &["v1", "customers", id], headers)?;
        self.send_json(builder).await
    }

    /// Partially update a customer
    ///
    /// PATCH /v1/customers/{id}
    pub async fn update_customer(
        &self,
        id: &str,
        params: &CustomerUpdateParams,
    ) -> Result<ApiResponse<Customer>> {
        let id = require_id("id", id)?;
        params.validate()?;
        let builder = self
            .request(Method::PATCH, &["v1", "customers", id], &params.headers)?
            .json(params);
        self.send_json(builder).await
    }

    /// Mark a customer inactive; the deleted record is returned
    ///
    /// DELETE /v1/customers/{id}
    pub async fn delete_customer(
        &self,
        id: &str,
        headers: &RequestHeaders,
    ) -> Result<ApiResponse<Customer>> {
        let id = require_id("id", id)?;
        let builder = self.request(Method::DELETE, &["v1", "customers", id], headers)?;
        self.send_json(builder).await
    }

    /// Customer with unmasked compliance data (requires elevated key permissions)
    ///
    /// GET /v1/customers/{id}/unmasked
    pub async fn get_customer_unmasked(
        &self,
        id: &str,
        headers: &RequestHeaders,
    ) -> Result<ApiResponse<Customer>> {
        let id = require_id("id", id)?;
        let builder = self.request(Method::GET, &["v1", "customers", id, "unmasked"], headers)?;
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, RequestHeaders, StraddleClient, StraddleError};
    use crate::types::{
        CustomerCreateParams, CustomerListParams, CustomerStatus, CustomerType,
        CustomerUpdateParams, Nullable,
    };
    use futures_util::TryStreamExt;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> StraddleClient {
        StraddleClient::with_base_url(ClientConfig::new("test-key").with_max_retries(0), &server.uri())
            .expect("client init")
    }

    fn meta() -> serde_json::Value {
        json!({ "api_request_id": "req-1", "api_request_timestamp": "2024-03-01T12:00:00Z" })
    }

    fn customer(id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Ada Lovelace",
            "type": "individual",
            "email": "ada@example.com",
            "phone": "+12125550123",
            "status": status,
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z",
            "external_id": null
        })
    }

    fn page(number: u32, total_pages: u32, ids: &[&str]) -> serde_json::Value {
        json!({
            "meta": {
                "api_request_id": "req-1",
                "api_request_timestamp": "2024-03-01T12:00:00Z",
                "max_page_size": 1000,
                "page_number": number,
                "page_size": 2,
                "total_items": 3,
                "total_pages": total_pages,
                "sort_by": "name",
                "sort_order": "asc"
            },
            "response_type": "array",
            "data": ids.iter().map(|id| customer(id, "pending")).collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_create_customer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("idempotency-key", "idem-42"))
            .and(body_json(json!({
                "type": "individual",
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+12125550123",
                "device": { "ip_address": "192.168.1.1" },
                "external_id": "crm-1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": meta(),
                "response_type": "object",
                "data": customer("cus_1", "pending")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut params = CustomerCreateParams::new(
            CustomerType::Individual,
            "Ada Lovelace",
            "ada@example.com",
            "+12125550123",
            "192.168.1.1",
        );
        params.external_id = Some("crm-1".to_string());
        params.headers = RequestHeaders::new().with_idempotency_key("idem-42");

        let response = client(&server)
            .create_customer(&params)
            .await
            .expect("create_customer failed");

        assert_eq!(response.meta.api_request_id, "req-1");
        assert_eq!(response.data.id, "cus_1");
        assert_eq!(response.data.status, CustomerStatus::Pending);
        assert!(response.data.external_id.is_null());
    }

    #[tokio::test]
    async fn test_create_customer_rejects_invalid_params_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let params = CustomerCreateParams::new(
            CustomerType::Business,
            "",
            "ops@acme.test",
            "+12125550123",
            "10.0.0.1",
        );
        let err = client(&server).create_customer(&params).await.unwrap_err();
        assert!(matches!(err, StraddleError::InvalidData { ref field, .. } if field == "name"));
    }

    #[tokio::test]
    async fn test_list_customers_encodes_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .and(query_param("search_text", "ada lovelace"))
            .and(query_param("status", "pending"))
            .and(query_param("page_size", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 1, &["cus_1"])))
            .expect(1)
            .mount(&server)
            .await;

        let params = CustomerListParams {
            search_text: Some("ada lovelace".to_string()),
            status: vec![CustomerStatus::Pending],
            page_size: Some(2),
            ..Default::default()
        };
        let page = client(&server)
            .list_customers(&params)
            .await
            .expect("list_customers failed");

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.total_pages, 1);
        assert!(!page.has_next_page());
    }

    #[tokio::test]
    async fn test_list_customers_stream_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .and(query_param("page_number", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(2, 2, &["cus_3"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 2, &["cus_1", "cus_2"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let params = CustomerListParams {
            page_size: Some(2),
            ..Default::default()
        };
        let ids: Vec<String> = client
            .list_customers_stream(params)
            .map_ok(|row| row.id)
            .try_collect()
            .await
            .expect("stream failed");

        assert_eq!(ids, vec!["cus_1", "cus_2", "cus_3"]);
    }

    #[tokio::test]
    async fn test_update_customer_sends_explicit_null() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/customers/cus_1"))
            .and(header_exists("idempotency-key"))
            .and(body_json(json!({ "phone": "+12125550199", "external_id": null })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": meta(),
                "response_type": "object",
                "data": customer("cus_1", "verified")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let params = CustomerUpdateParams {
            phone: Some("+12125550199".to_string()),
            external_id: Nullable::Null,
            ..Default::default()
        };
        let response = client(&server)
            .update_customer("cus_1", &params)
            .await
            .expect("update_customer failed");
        assert_eq!(response.data.status, CustomerStatus::Verified);
    }

    #[tokio::test]
    async fn test_get_customer_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/customers/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "status": 404, "title": "Not Found", "type": "not_found",
                           "detail": "Customer missing was not found" },
                "meta": meta(),
                "response_type": "error"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .get_customer("missing", &RequestHeaders::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "Resource not found: Not Found: Customer missing was not found"
        );
    }

    #[tokio::test]
    async fn test_get_customer_rejects_empty_id() {
        let server = MockServer::start().await;
        let err = client(&server)
            .get_customer("", &RequestHeaders::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StraddleError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_unmasked() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/customers/cus_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": meta(),
                "response_type": "object",
                "data": customer("cus_1", "inactive")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut unmasked = customer("cus_1", "verified");
        unmasked["compliance_profile"] = json!({ "dob": "1990-05-17", "ssn": "123-45-6789" });
        Mock::given(method("GET"))
            .and(path("/v1/customers/cus_1/unmasked"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": meta(),
                "response_type": "object",
                "data": unmasked
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let deleted = client
            .delete_customer("cus_1", &RequestHeaders::new())
            .await
            .expect("delete_customer failed");
        assert_eq!(deleted.data.status, CustomerStatus::Inactive);

        let revealed = client
            .get_customer_unmasked("cus_1", &RequestHeaders::new())
            .await
            .expect("get_customer_unmasked failed");
        let profile = revealed.data.compliance_profile.as_ref().expect("profile");
        assert_eq!(
            profile.as_individual().and_then(|p| p.ssn.as_deref()),
            Some("123-45-6789")
        );
    }
}
