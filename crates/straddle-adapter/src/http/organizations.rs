/*
[INPUT]:  Organization params, ids and per-request headers
[OUTPUT]: Organization records and organization pages
[POS]:    HTTP layer - organization endpoints (platform accounts)
[UPDATE]: When adding organization endpoints or changing their payloads
*/

use futures_util::Stream;
use reqwest::Method;

use super::client::require_id;
use super::headers::RequestHeaders;
use super::pagination::paginate;
use super::query::QueryParams;
use super::{Result, StraddleClient};
use crate::types::{
    ApiResponse, Organization, OrganizationCreateParams, OrganizationListParams, Page, Validate,
};

impl StraddleClient {
    /// POST /v1/organizations
    pub async fn create_organization(
        &self,
        params: &OrganizationCreateParams,
    ) -> Result<ApiResponse<Organization>> {
        params.validate()?;
        let builder = self
            .request(Method::POST, &["v1", "organizations"], &params.headers)?
            .json(params);
        self.send_json(builder).await
    }

    /// GET /v1/organizations
    pub async fn list_organizations(
        &self,
        params: &OrganizationListParams,
    ) -> Result<Page<Organization>> {
        params.validate()?;
        let builder = self
            .request(Method::GET, &["v1", "organizations"], &params.headers)?
            .query(&params.query_pairs());
        self.send_json(builder).await
    }

    pub fn list_organizations_stream(
        &self,
        params: OrganizationListParams,
    ) -> impl Stream<Item = Result<Organization>> + '_ {
        paginate(params, move |page: OrganizationListParams| async move {
            self.list_organizations(&page).await
        })
    }

    /// GET /v1/organizations/{id}
    pub async fn get_organization(
        &self,
        id: &str,
        headers: &RequestHeaders,
    ) -> Result<ApiResponse<Organization>> {
        let id = require_id("id", id)?;
        let builder = self.request(Method::GET, &["v1", "organizations", id], headers)?;
        self.send_json(builder).await
    }
}
