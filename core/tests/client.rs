//! Client behaviour against an in-process recording transport.
//!
//! # Design
//! `RecordingTransport` stores every request it is handed and answers with a
//! canned result, so these tests can assert on exactly what would have gone
//! over the wire without a server.

use std::sync::Mutex;

use places_core::{
    ApiError, BusinessCategory, BusinessListing, Categories, ChainInfo, CreateBusinessesResponse,
    Endpoints, Environment, ErrorCode, HttpRequest, HttpResponse, Identity, Operation,
    OperationResult, Outcome, PlacesClient, SearchCriteria, StoreCriteria, Transport,
    TransportError,
};
use serde_json::{json, Value};
use uuid::Uuid;

const SANDBOX: &str = "http://sandbox.test/v1";
const PRODUCTION: &str = "http://production.test/v1";

#[derive(Debug)]
struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    reply: Result<HttpResponse, TransportError>,
}

impl RecordingTransport {
    fn ok(body: Value) -> Self {
        Self::status(200, body)
    }

    fn status(status: u16, body: Value) -> Self {
        Self::reply(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }))
    }

    fn raw(status: u16, body: &str) -> Self {
        Self::reply(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }))
    }

    fn failing(message: &str) -> Self {
        Self::reply(Err(TransportError::new(message)))
    }

    fn reply(reply: Result<HttpResponse, TransportError>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply,
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn last_body(&self) -> Value {
        let requests = self.requests();
        let last = requests.last().expect("no request was sent");
        serde_json::from_str(&last.body).unwrap()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone()
    }
}

fn identity() -> Identity {
    Identity::new("test", "test", "test@gmail.com")
}

fn client(
    environment: Option<Environment>,
    transport: RecordingTransport,
) -> PlacesClient<RecordingTransport> {
    let endpoints = Endpoints::new(SANDBOX, PRODUCTION).unwrap();
    PlacesClient::with_transport(identity(), environment, endpoints, transport).unwrap()
}

fn listing(store_id: &str) -> BusinessListing {
    let category = BusinessCategory {
        category_name: "Restaurant".to_string(),
        bp_category_id: 700_341,
    };
    BusinessListing::new(
        store_id,
        "Blue Door Diner",
        "1 Main St",
        "Seattle",
        "WA",
        "US",
        "98101",
        Categories {
            business_categories: vec![category.clone()],
            primary_category: category,
        },
    )
}

fn ok_header() -> Value {
    json!({"TrackingId": "t", "OperationStatus": true, "ErrorMessage": "", "ErrorCode": 0, "Errors": {}})
}

fn with_header(payload: Value) -> Value {
    let mut body = ok_header();
    for (k, v) in payload.as_object().unwrap() {
        body[k] = v.clone();
    }
    body
}

// --- request shape ---

#[tokio::test]
async fn create_in_sandbox_sends_one_envelope_and_returns_body_unchanged() {
    let reply = with_header(json!({
        "CreatedBusinesses": {"0": {"StoreId": "Store_1", "Operation": "BUSINESS_ADD", "Status": "SUCCESSFUL", "ErrorMessage": ""}}
    }));
    let c = client(Some(Environment::Sandbox), RecordingTransport::ok(reply.clone()));

    let response = c.create_businesses(&[listing("Store_1")]).await.unwrap();

    let requests = c.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, format!("{SANDBOX}/CreateBusinesses"));

    let body = c.transport().last_body();
    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    assert!(Uuid::parse_str(body["TrackingId"].as_str().unwrap()).is_ok());
    assert_eq!(body["Identity"], json!({"Puid": "test", "AuthProvider": "test", "EmailId": "test@gmail.com"}));
    assert_eq!(body["Businesses"], json!([serde_json::to_value(listing("Store_1")).unwrap()]));

    let expected: CreateBusinessesResponse = serde_json::from_value(reply).unwrap();
    assert_eq!(response, expected);
    assert_eq!(response.outcome(), Outcome::Success);
}

#[tokio::test]
async fn headers_identify_client_and_caller() {
    let c = client(None, RecordingTransport::ok(with_header(json!({"DeletedBusinesses": []}))));
    c.delete_businesses(&["s1".to_string()]).await.unwrap();

    let requests = c.transport().requests();
    let request = &requests[0];
    assert_eq!(request.url, format!("{PRODUCTION}/DeleteBusinesses"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("X-BingApis-SDK-Client"), Some("bing-places-rust"));
    assert!(request.header("X-BingApis-SDK-ClientVersion").is_some());
    let request_id = request.header("X-BingApis-SDK-ClientRequestId").unwrap();
    assert!(Uuid::parse_str(request_id).is_ok());
    let header_identity: Identity =
        serde_json::from_str(request.header("X-BingApis-SDK-Identity").unwrap()).unwrap();
    assert_eq!(header_identity, identity());
}

#[tokio::test]
async fn every_call_gets_a_fresh_tracking_id() {
    let c = client(None, RecordingTransport::ok(with_header(json!({"Businesses": []}))));
    c.fetch_businesses(1, 10, &SearchCriteria::in_batches()).await.unwrap();
    c.fetch_businesses(1, 10, &SearchCriteria::in_batches()).await.unwrap();

    let requests = c.transport().requests();
    let ids: Vec<String> = requests
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_str(&r.body).unwrap();
            body["TrackingId"].as_str().unwrap().to_string()
        })
        .collect();
    assert_ne!(ids[0], ids[1]);
    assert_ne!(
        requests[0].header("X-BingApis-SDK-ClientRequestId"),
        requests[1].header("X-BingApis-SDK-ClientRequestId")
    );
}

#[tokio::test]
async fn session_changes_apply_to_the_next_request() {
    let mut c = client(None, RecordingTransport::ok(with_header(json!({"Businesses": []}))));
    c.switch_to_sandbox();
    c.set_identity(Identity::new("test-2", "test-2", "test-2@gmail.com"));
    c.fetch_businesses(1, 10, &SearchCriteria::in_batches()).await.unwrap();

    assert!(c.transport().requests()[0].url.starts_with(SANDBOX));
    let body = c.transport().last_body();
    assert_eq!(body["Identity"]["Puid"], "test-2");

    c.switch_to_production();
    c.fetch_businesses(1, 10, &SearchCriteria::in_batches()).await.unwrap();
    assert!(c.transport().requests()[1].url.starts_with(PRODUCTION));
}

#[tokio::test]
async fn paged_queries_carry_criteria() {
    let c = client(None, RecordingTransport::ok(with_header(json!({"Businesses": []}))));
    c.fetch_businesses_by_store_ids(2, 50, &["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    let body = c.transport().last_body();
    assert_eq!(body["PageNumber"], 2);
    assert_eq!(body["PageSize"], 50);
    assert_eq!(body["SearchCriteria"], json!({"CriteriaType": "SearchByStoreIds", "StoreIds": ["a", "b"]}));

    c.fetch_businesses_by_name(1, 10, "Blue Door").await.unwrap();
    let body = c.transport().last_body();
    assert_eq!(body["SearchCriteria"], json!({"CriteriaType": "SearchByQuery", "BusinessName": "Blue Door"}));
}

#[tokio::test]
async fn status_and_analytics_use_flat_criteria() {
    let c = client(
        None,
        RecordingTransport::ok(with_header(json!({"BusinessesStatusInfo": [], "BusinessesAnalytics": []}))),
    );
    c.fetch_business_status_info(1, 100, &StoreCriteria::GetInBatches)
        .await
        .unwrap();
    let body = c.transport().last_body();
    assert_eq!(body["CriteriaType"], "GetInBatches");
    assert!(body.get("StoreIds").is_none());

    c.get_analytics(1, 100, &StoreCriteria::SearchByStoreIds(vec!["s1".to_string()]))
        .await
        .unwrap();
    let body = c.transport().last_body();
    assert_eq!(body["CriteriaType"], "SearchByStoreIds");
    assert_eq!(body["StoreIds"], json!(["s1"]));
    assert!(c.transport().requests()[1].url.ends_with("/GetAnalytics"));
}

#[tokio::test]
async fn chain_requests_wrap_chain_info() {
    let c = client(None, RecordingTransport::ok(with_header(json!({"Operation": "CHAIN_ADD"}))));
    let mut chain = ChainInfo::new("Contoso", 12);
    chain.website = Some("https://contoso.example".to_string());
    let response = c.create_bulk_chain(&chain).await.unwrap();
    assert_eq!(response.operation.as_deref(), Some("CHAIN_ADD"));

    let body = c.transport().last_body();
    assert_eq!(body["ChainInfo"]["ChainName"], "Contoso");
    assert_eq!(body["ChainInfo"]["Locations"], 12);
    assert_eq!(body["ChainInfo"]["Website"], "https://contoso.example");

    c.update_bulk_chain_info(&chain).await.unwrap();
    assert!(c.transport().requests()[1].url.ends_with("/UpdateBulkChainInfo"));
}

// --- validation never reaches the transport ---

#[tokio::test]
async fn invalid_arguments_send_nothing() {
    let c = client(None, RecordingTransport::ok(ok_header()));

    let err = c.create_businesses(&[]).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));

    let too_many: Vec<BusinessListing> = (0..1001).map(|i| listing(&format!("s{i}"))).collect();
    assert!(matches!(
        c.update_businesses(&too_many).await,
        Err(ApiError::InvalidArgument(_))
    ));

    let err = c
        .fetch_businesses(0, 10, &SearchCriteria::in_batches())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid argument: PageNumber must be greater than or equal to 1.");

    let err = c
        .get_analytics(1, 1001, &StoreCriteria::GetInBatches)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid argument: PageSize must be between 1 and 1000.");

    assert!(c.delete_businesses(&[]).await.is_err());
    assert!(c
        .fetch_business_status_info(1, 10, &StoreCriteria::SearchByStoreIds(Vec::new()))
        .await
        .is_err());
    assert!(c.fetch_businesses_by_store_ids(1, 10, &[]).await.is_err());
    assert!(c.create_bulk_chain(&ChainInfo::new("Tiny", 9)).await.is_err());

    assert!(c.transport().requests().is_empty());
}

#[test]
fn construction_rejects_bad_identity() {
    let endpoints = Endpoints::default();
    let err = PlacesClient::with_transport(
        Identity::new("test", "", "test@gmail.com"),
        None,
        endpoints.clone(),
        RecordingTransport::ok(ok_header()),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidIdentity(_)));

    let err = PlacesClient::with_transport(
        Identity::new("test", "test", "invalid-email"),
        None,
        endpoints,
        RecordingTransport::ok(ok_header()),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidEmail(_)));
}

#[test]
fn empty_email_is_reported_as_missing_identity() {
    let err = PlacesClient::with_transport(
        Identity::new("test", "test", ""),
        None,
        Endpoints::default(),
        RecordingTransport::ok(ok_header()),
    )
    .unwrap_err();
    match err {
        ApiError::InvalidIdentity(message) => assert!(message.contains("EmailId"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// --- error normalization ---

#[tokio::test]
async fn transport_error_is_normalized() {
    let c = client(None, RecordingTransport::failing("Network error"));
    let err = c.create_single_business(&listing("Store_1")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to create businesses: Network error");
    match err {
        ApiError::RemoteOperationFailed {
            operation, status, ..
        } => {
            assert_eq!(operation, Operation::CreateBusinesses);
            assert_eq!(status, None);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn api_error_message_is_preferred() {
    let body = json!({"OperationStatus": false, "ErrorMessage": "Invalid request", "ErrorCode": 400});
    let c = client(None, RecordingTransport::status(400, body));
    let err = c.delete_businesses(&["s1".to_string()]).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete businesses: Invalid request");
    match err {
        ApiError::RemoteOperationFailed {
            status, error_code, ..
        } => {
            assert_eq!(status, Some(400));
            assert_eq!(error_code, Some(ErrorCode::Number(400)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_status() {
    let c = client(None, RecordingTransport::raw(503, "<html>unavailable</html>"));
    let err = c.fetch_businesses(1, 10, &SearchCriteria::in_batches()).await.unwrap_err();
    assert_eq!(err.operation(), Some(Operation::FetchBusinesses));
    assert!(err.to_string().ends_with("HTTP 503"), "{err}");
}

#[tokio::test]
async fn malformed_success_body_is_a_remote_failure() {
    let c = client(None, RecordingTransport::raw(200, "not json"));
    let err = c.get_analytics(1, 10, &StoreCriteria::GetInBatches).await.unwrap_err();
    assert!(matches!(err, ApiError::RemoteOperationFailed { status: Some(200), .. }));
    assert!(err.to_string().contains("malformed response body"));
}

// --- outcome classification ---

#[tokio::test]
async fn partial_failure_is_data_not_error() {
    let reply = with_header(json!({
        "CreatedBusinesses": {
            "0": {"StoreId": "Store_1", "Operation": "BUSINESS_ADD", "Status": "FAILED",
                  "ErrorMessage": "Create business failed since store ID Store_1 already exists in your account."},
            "1": {"StoreId": "Store_2", "Operation": "BUSINESS_ADD", "Status": "SUCCESSFUL", "ErrorMessage": ""}
        }
    }));
    let c = client(None, RecordingTransport::ok(reply));
    let response = c
        .create_businesses(&[listing("Store_1"), listing("Store_2")])
        .await
        .unwrap();

    match response.outcome() {
        Outcome::PartialFailure { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].store_id.as_deref(), Some("Store_1"));
            assert!(failures[0].message.contains("already exists"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(response.failed_store_ids(), ["Store_1"]);
}

#[tokio::test]
async fn operation_status_false_is_rejected_outcome() {
    let reply = json!({
        "TrackingId": "t",
        "OperationStatus": false,
        "ErrorMessage": "Total number of businesses should be greater than or equal to 1 and less than or equal to 1000",
        "ErrorCode": 4,
        "CreatedBusinesses": {}
    });
    let c = client(None, RecordingTransport::ok(reply));
    let response = c.create_businesses(&[listing("Store_1")]).await.unwrap();
    match response.outcome() {
        Outcome::Rejected { code, message } => {
            assert_eq!(code, Some(ErrorCode::Number(4)));
            assert!(message.starts_with("Total number of businesses"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(response.failed_store_ids().is_empty());
}

#[tokio::test]
async fn delete_failures_are_reported_by_store_id() {
    let reply = with_header(json!({
        "DeletedBusinesses": [
            {"StoreId": "s1", "Status": "SUCCESSFUL", "ErrorMessage": ""},
            {"StoreId": "s9", "Status": "FAILED", "ErrorMessage": "Store ID s9 not found in your account."}
        ]
    }));
    let c = client(None, RecordingTransport::ok(reply));
    let response = c
        .delete_businesses(&["s1".to_string(), "s9".to_string()])
        .await
        .unwrap();
    assert_eq!(response.failed_store_ids(), ["s9"]);
}
