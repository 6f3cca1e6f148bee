/*
[INPUT]:  Customer ids and manual review decisions
[OUTPUT]: Identity review details and updated customers
[POS]:    HTTP layer - customer identity review endpoints
[UPDATE]: When review endpoints or decision values change
*/

use reqwest::Method;

use super::client::require_id;
use super::headers::RequestHeaders;
use super::{Result, StraddleClient};
use crate::types::{ApiResponse, Customer, CustomerReview, CustomerReviewDecisionParams, Validate};

impl StraddleClient {
    /// Identity verification breakdown for a customer
    ///
    /// GET /v1/customers/{id}/review
    pub async fn get_customer_review(
        &self,
        id: &str,
        headers: &RequestHeaders,
    ) -> Result<ApiResponse<CustomerReview>> {
        let id = require_id("id", id)?;
        let builder = self.request(Method::GET, &["v1", "customers", id, "review"], headers)?;
        self.send_json(builder).await
    }

    /// Approve or reject a customer sitting in `review`
    ///
    /// PATCH /v1/customers/{id}/review
    pub async fn decide_customer_review(
        &self,
        id: &str,
        params: &CustomerReviewDecisionParams,
    ) -> Result<ApiResponse<Customer>> {
        let id = require_id("id", id)?;
        params.validate()?;
        let builder = self
            .request(
                Method::PATCH,
                &["v1", "customers", id, "review"],
                &params.headers,
            )?
            .json(params);
        self.send_json(builder).await
    }

    /// Re-run identity verification with the customer's current data
    ///
    /// PUT /v1/customers/{id}/refresh_review
    pub async fn refresh_customer_review(
        &self,
        id: &str,
        headers: &RequestHeaders,
    ) -> Result<ApiResponse<Customer>> {
        let id = require_id("id", id)?;
        let builder = self.request(
            Method::PUT,
            &["v1", "customers", id, "refresh_review"],
            headers,
        )?;
        self.send_json(builder).await
    }
}
