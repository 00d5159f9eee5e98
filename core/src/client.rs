//! Request orchestration for the places API.
//!
//! # Design
//! Each operation is split into a `build_*` method that validates arguments
//! and produces an `HttpRequest`, and `parse_response`, which turns an
//! `HttpResponse` into the decoded body or a normalized `ApiError`. The async
//! operation methods simply run build → `Transport::send` → parse.
//!
//! Building is synchronous and happens before the first `.await`, so the
//! envelope captures the identity and base endpoint current at call time.
//! Every build generates a fresh `TrackingId` for the body and a separate
//! client request id for the headers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{ClientConfig, Endpoints};
use crate::envelope::{
    BusinessesPayload, ChainPayload, Envelope, Operation, SearchPayload, StoreIdsPayload,
    StorePagePayload,
};
use crate::error::ApiError;
use crate::http::{
    HttpRequest, HttpResponse, Transport, CLIENT_NAME, CLIENT_VERSION, HEADER_CLIENT,
    HEADER_CLIENT_REQUEST_ID, HEADER_CLIENT_VERSION, HEADER_CONTENT_TYPE, HEADER_IDENTITY,
};
use crate::response::{
    ChainResponse, CreateBusinessesResponse, DeleteBusinessesResponse, ErrorCode,
    FetchBusinessStatusInfoResponse, FetchBusinessesResponse, GetAnalyticsResponse,
    UpdateBusinessesResponse,
};
use crate::session::{Environment, Session};
use crate::transport::UreqTransport;
use crate::types::{BusinessListing, ChainInfo, Identity, SearchCriteria, StoreCriteria};
use crate::validate;

/// Typed client for the places listing API.
#[derive(Debug, Clone)]
pub struct PlacesClient<T = UreqTransport> {
    session: Session,
    transport: T,
}

impl PlacesClient<UreqTransport> {
    /// Production client on the public endpoints using the default transport.
    pub fn new(identity: Identity) -> Result<Self, ApiError> {
        Self::with_transport(identity, None, Endpoints::default(), UreqTransport::new())
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        Self::from_config_with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> PlacesClient<T> {
    pub fn with_transport(
        identity: Identity,
        environment: Option<Environment>,
        endpoints: Endpoints,
        transport: T,
    ) -> Result<Self, ApiError> {
        let session = Session::new(identity, environment, endpoints)?;
        Ok(Self { session, transport })
    }

    pub fn from_config_with_transport(config: ClientConfig, transport: T) -> Result<Self, ApiError> {
        Self::with_transport(config.identity, config.environment, config.endpoints, transport)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -- session ------------------------------------------------------------

    pub fn identity(&self) -> Identity {
        self.session.identity()
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.session.set_identity(identity);
    }

    pub fn switch_to_sandbox(&mut self) {
        self.session.switch_to_sandbox();
        tracing::info!(base_url = self.session.base_url(), "switched to sandbox");
    }

    pub fn switch_to_production(&mut self) {
        self.session.switch_to_production();
        tracing::info!(base_url = self.session.base_url(), "switched to production");
    }

    pub fn is_sandbox(&self) -> bool {
        self.session.is_sandbox()
    }

    pub fn is_production(&self) -> bool {
        self.session.is_production()
    }

    pub fn base_url(&self) -> &str {
        self.session.base_url()
    }

    // -- build --------------------------------------------------------------

    pub fn build_create_businesses(
        &self,
        businesses: &[BusinessListing],
    ) -> Result<HttpRequest, ApiError> {
        validate::batch(businesses)?;
        self.build_request(Operation::CreateBusinesses, BusinessesPayload { businesses })
    }

    pub fn build_update_businesses(
        &self,
        businesses: &[BusinessListing],
    ) -> Result<HttpRequest, ApiError> {
        validate::batch(businesses)?;
        self.build_request(Operation::UpdateBusinesses, BusinessesPayload { businesses })
    }

    pub fn build_fetch_businesses(
        &self,
        page_number: u32,
        page_size: u32,
        search_criteria: &SearchCriteria,
    ) -> Result<HttpRequest, ApiError> {
        validate::paging(page_number, page_size)?;
        validate::search_criteria(search_criteria)?;
        self.build_request(
            Operation::FetchBusinesses,
            SearchPayload {
                page_number,
                page_size,
                search_criteria,
            },
        )
    }

    pub fn build_fetch_business_status_info(
        &self,
        page_number: u32,
        page_size: u32,
        criteria: &StoreCriteria,
    ) -> Result<HttpRequest, ApiError> {
        validate::paging(page_number, page_size)?;
        validate::store_criteria(criteria)?;
        self.build_request(
            Operation::FetchBusinessStatusInfo,
            StorePagePayload::new(page_number, page_size, criteria),
        )
    }

    pub fn build_get_analytics(
        &self,
        page_number: u32,
        page_size: u32,
        criteria: &StoreCriteria,
    ) -> Result<HttpRequest, ApiError> {
        validate::paging(page_number, page_size)?;
        validate::store_criteria(criteria)?;
        self.build_request(
            Operation::GetAnalytics,
            StorePagePayload::new(page_number, page_size, criteria),
        )
    }

    pub fn build_delete_businesses(&self, store_ids: &[String]) -> Result<HttpRequest, ApiError> {
        validate::store_ids(store_ids)?;
        self.build_request(Operation::DeleteBusinesses, StoreIdsPayload { store_ids })
    }

    pub fn build_create_bulk_chain(&self, chain_info: &ChainInfo) -> Result<HttpRequest, ApiError> {
        validate::chain(chain_info)?;
        self.build_request(Operation::CreateBulkChain, ChainPayload { chain_info })
    }

    pub fn build_update_bulk_chain_info(
        &self,
        chain_info: &ChainInfo,
    ) -> Result<HttpRequest, ApiError> {
        validate::chain(chain_info)?;
        self.build_request(Operation::UpdateBulkChainInfo, ChainPayload { chain_info })
    }

    fn build_request<P: Serialize>(
        &self,
        operation: Operation,
        payload: P,
    ) -> Result<HttpRequest, ApiError> {
        let envelope = Envelope::new(self.session.identity_ref(), payload);
        let body = serde_json::to_string(&envelope).map_err(|e| {
            ApiError::InvalidArgument(format!("{operation} payload could not be encoded: {e}"))
        })?;
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.session.base_url(), operation.path());

        tracing::debug!(
            %operation,
            tracking_id = %envelope.tracking_id,
            request_id = %request_id,
            url = %url,
            "built places request"
        );

        Ok(HttpRequest {
            url,
            headers: vec![
                (HEADER_CONTENT_TYPE.to_string(), "application/json".to_string()),
                (HEADER_CLIENT.to_string(), CLIENT_NAME.to_string()),
                (HEADER_CLIENT_VERSION.to_string(), CLIENT_VERSION.to_string()),
                (HEADER_CLIENT_REQUEST_ID.to_string(), request_id.to_string()),
                (HEADER_IDENTITY.to_string(), self.session.identity_header().to_string()),
            ],
            body,
        })
    }

    // -- parse --------------------------------------------------------------

    /// Decode a response body, or normalize a failed one.
    ///
    /// A 2xx body is returned as decoded, including any per-item failures it
    /// reports. A non-2xx status or an undecodable body becomes
    /// `ApiError::RemoteOperationFailed`, carrying the API's `ErrorMessage`
    /// when the body has one.
    pub fn parse_response<R: DeserializeOwned>(
        &self,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<R, ApiError> {
        if !response.is_success() {
            let (api_message, error_code) = api_error_details(&response.body);
            let detail = api_message.unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(ApiError::remote(
                operation,
                Some(response.status),
                error_code,
                Some(&detail),
            ));
        }
        serde_json::from_str(&response.body).map_err(|e| {
            ApiError::remote(
                operation,
                Some(response.status),
                None,
                Some(&format!("malformed response body: {e}")),
            )
        })
    }

    // -- operations ---------------------------------------------------------

    pub async fn create_businesses(
        &self,
        businesses: &[BusinessListing],
    ) -> Result<CreateBusinessesResponse, ApiError> {
        let request = self.build_create_businesses(businesses)?;
        self.dispatch(Operation::CreateBusinesses, request).await
    }

    /// Create one business as a batch of one.
    pub async fn create_single_business(
        &self,
        business: &BusinessListing,
    ) -> Result<CreateBusinessesResponse, ApiError> {
        self.create_businesses(std::slice::from_ref(business)).await
    }

    pub async fn update_businesses(
        &self,
        businesses: &[BusinessListing],
    ) -> Result<UpdateBusinessesResponse, ApiError> {
        let request = self.build_update_businesses(businesses)?;
        self.dispatch(Operation::UpdateBusinesses, request).await
    }

    pub async fn fetch_businesses(
        &self,
        page_number: u32,
        page_size: u32,
        search_criteria: &SearchCriteria,
    ) -> Result<FetchBusinessesResponse, ApiError> {
        let request = self.build_fetch_businesses(page_number, page_size, search_criteria)?;
        self.dispatch(Operation::FetchBusinesses, request).await
    }

    pub async fn fetch_businesses_by_store_ids(
        &self,
        page_number: u32,
        page_size: u32,
        store_ids: &[String],
    ) -> Result<FetchBusinessesResponse, ApiError> {
        let criteria = SearchCriteria::by_store_ids(store_ids.iter().cloned());
        self.fetch_businesses(page_number, page_size, &criteria).await
    }

    pub async fn fetch_businesses_by_name(
        &self,
        page_number: u32,
        page_size: u32,
        business_name: &str,
    ) -> Result<FetchBusinessesResponse, ApiError> {
        let criteria = SearchCriteria::by_name(business_name);
        self.fetch_businesses(page_number, page_size, &criteria).await
    }

    pub async fn fetch_business_status_info(
        &self,
        page_number: u32,
        page_size: u32,
        criteria: &StoreCriteria,
    ) -> Result<FetchBusinessStatusInfoResponse, ApiError> {
        let request = self.build_fetch_business_status_info(page_number, page_size, criteria)?;
        self.dispatch(Operation::FetchBusinessStatusInfo, request).await
    }

    pub async fn get_analytics(
        &self,
        page_number: u32,
        page_size: u32,
        criteria: &StoreCriteria,
    ) -> Result<GetAnalyticsResponse, ApiError> {
        let request = self.build_get_analytics(page_number, page_size, criteria)?;
        self.dispatch(Operation::GetAnalytics, request).await
    }

    pub async fn delete_businesses(
        &self,
        store_ids: &[String],
    ) -> Result<DeleteBusinessesResponse, ApiError> {
        let request = self.build_delete_businesses(store_ids)?;
        self.dispatch(Operation::DeleteBusinesses, request).await
    }

    pub async fn create_bulk_chain(&self, chain_info: &ChainInfo) -> Result<ChainResponse, ApiError> {
        let request = self.build_create_bulk_chain(chain_info)?;
        self.dispatch(Operation::CreateBulkChain, request).await
    }

    pub async fn update_bulk_chain_info(
        &self,
        chain_info: &ChainInfo,
    ) -> Result<ChainResponse, ApiError> {
        let request = self.build_update_bulk_chain_info(chain_info)?;
        self.dispatch(Operation::UpdateBulkChainInfo, request).await
    }

    async fn dispatch<R: DeserializeOwned>(
        &self,
        operation: Operation,
        request: HttpRequest,
    ) -> Result<R, ApiError> {
        let result = match self.transport.send(request).await {
            Ok(response) => self.parse_response(operation, response),
            Err(e) => Err(ApiError::remote(operation, None, None, Some(e.message()))),
        };
        if let Err(e) = &result {
            tracing::warn!(%operation, error = %e, "places request failed");
        }
        result
    }
}

/// Pull `ErrorMessage` and `ErrorCode` out of an error body, if it is JSON.
fn api_error_details(body: &str) -> (Option<String>, Option<ErrorCode>) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return (None, None);
    };
    let message = value
        .get("ErrorMessage")
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let code = value
        .get("ErrorCode")
        .and_then(|c| serde_json::from_value::<ErrorCode>(c.clone()).ok());
    (message, code)
}
