/*
[INPUT]:  Per-request headers
[OUTPUT]: Aggregated account reports
[POS]:    HTTP layer - reporting endpoints
[UPDATE]: When new reports are published
*/

use reqwest::Method;

use super::headers::RequestHeaders;
use super::{Result, StraddleClient};
use crate::types::{ApiResponse, CustomersByStatus};

impl StraddleClient {
    /// Customer counts grouped by verification status
    ///
    /// POST /v1/reports/total_customers_by_status
    pub async fn customers_by_status(
        &self,
        headers: &RequestHeaders,
    ) -> Result<ApiResponse<CustomersByStatus>> {
        let builder = self.request(
            Method::POST,
            &["v1", "reports", "total_customers_by_status"],
            headers,
        )?;
        self.send_json(builder).await
    }
}
