//! Response DTOs and the tagged `Outcome` view over them.
//!
//! # Design
//! The API answers almost everything with HTTP 200 and reports problems in
//! the body: `OperationStatus: false` when the whole request was refused, or
//! per-item entries (a `FAILED` status, a validation error) when only some
//! businesses were rejected. Those are returned as data, never as
//! `ApiError`. `OperationResult::outcome` folds the body into one of three
//! cases so callers can `match` instead of inspecting every field.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::BusinessListing;

/// `ErrorCode` is numeric in most responses but a string in some.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl ErrorCode {
    /// Whether the code signals success (`0` or `"0"`).
    pub fn is_zero(&self) -> bool {
        match self {
            ErrorCode::Number(n) => *n == 0,
            ErrorCode::Text(s) => s.trim() == "0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessError {
    pub column_name: String,
    pub error_message: String,
}

/// Entry in the `Errors` map: input validation failures for one business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub business_errors: Vec<BusinessError>,
}

impl ValidationError {
    fn summary(&self) -> String {
        let mut parts: Vec<String> = self.error_message.iter().cloned().collect();
        parts.extend(
            self.business_errors
                .iter()
                .map(|e| format!("{}: {}", e.column_name, e.error_message)),
        );
        parts.join("; ")
    }
}

/// Fields every response carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseHeader {
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub operation_status: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_code: Option<ErrorCode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: BTreeMap<String, ValidationError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WarningMessage {
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub warning_message: Option<String>,
}

/// Per-business result of a create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessOperationStatus {
    pub store_id: String,
    /// `SUCCESSFUL`, `SUCCESSFUL_WITH_WARNING` or `FAILED`.
    pub status: String,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warning_messages: Vec<WarningMessage>,
}

impl BusinessOperationStatus {
    pub fn is_failed(&self) -> bool {
        self.status.eq_ignore_ascii_case("FAILED")
    }

    pub fn has_warnings(&self) -> bool {
        !self.warning_messages.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessStatus {
    QualityCheckInProgress,
    QualityIssueFound,
    PublishInProgress,
    Published,
    Dropped,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QualityIssue {
    pub issue_type: String,
    #[serde(default)]
    pub sub_issue_type: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessStatusInfo {
    pub store_id: String,
    pub business_status: BusinessStatus,
    #[serde(rename = "YPId", default)]
    pub yp_id: Option<String>,
    #[serde(rename = "YPIdAssignDate", default)]
    pub yp_id_assign_date: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub last_update_date: Option<String>,
    #[serde(default)]
    pub has_pending_publish: bool,
    #[serde(default)]
    pub publish_link: Option<String>,
    #[serde(default)]
    pub quality_issues: Option<Vec<QualityIssue>>,
}

/// One reporting period of analytics for a business. Counters the API adds
/// later are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessStatistics {
    #[serde(default)]
    pub impression_count: u64,
    #[serde(default)]
    pub click_count: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessAnalytics {
    pub store_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub statistics: Vec<BusinessStatistics>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteBusinessStatus {
    pub store_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl DeleteBusinessStatus {
    pub fn is_failed(&self) -> bool {
        let failed_status = self
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("FAILED"));
        failed_status || self.error_message.as_deref().is_some_and(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateBusinessesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_businesses: BTreeMap<String, BusinessOperationStatus>,
    #[serde(flatten)]
    pub header: ResponseHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateBusinessesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_businesses: BTreeMap<String, BusinessOperationStatus>,
    #[serde(flatten)]
    pub header: ResponseHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchBusinessesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub businesses: Vec<BusinessListing>,
    #[serde(flatten)]
    pub header: ResponseHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchBusinessStatusInfoResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub businesses_status_info: Vec<BusinessStatusInfo>,
    #[serde(flatten)]
    pub header: ResponseHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetAnalyticsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub businesses_analytics: Vec<BusinessAnalytics>,
    #[serde(flatten)]
    pub header: ResponseHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteBusinessesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub deleted_businesses: Vec<DeleteBusinessStatus>,
    #[serde(flatten)]
    pub header: ResponseHeader,
}

/// Response to `CreateBulkChain` and `UpdateBulkChainInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChainResponse {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(flatten)]
    pub header: ResponseHeader,
}

/// One rejected item inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Key in the response map, or the store id for list-shaped payloads.
    pub key: String,
    pub store_id: Option<String>,
    pub message: String,
}

/// What a transport-successful response actually says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every item was accepted.
    Success,
    /// The request was processed but some items were rejected.
    PartialFailure { failures: Vec<ItemFailure> },
    /// The API refused the request as a whole (`OperationStatus: false`).
    Rejected {
        code: Option<ErrorCode>,
        message: String,
    },
}

/// Common view over every response type.
pub trait OperationResult {
    fn header(&self) -> &ResponseHeader;

    /// Item-level failures in the operation-specific payload.
    fn payload_failures(&self) -> Vec<ItemFailure> {
        Vec::new()
    }

    fn outcome(&self) -> Outcome {
        let header = self.header();
        if !header.operation_status {
            return Outcome::Rejected {
                code: header.error_code.clone(),
                message: header.error_message.clone().unwrap_or_default(),
            };
        }

        let mut failures: Vec<ItemFailure> = header
            .errors
            .iter()
            .map(|(key, err)| ItemFailure {
                key: key.clone(),
                store_id: err.store_id.clone(),
                message: err.summary(),
            })
            .collect();
        failures.extend(self.payload_failures());

        if failures.is_empty() {
            Outcome::Success
        } else {
            Outcome::PartialFailure { failures }
        }
    }

    /// Store ids of every rejected item, in response order.
    fn failed_store_ids(&self) -> Vec<String> {
        match self.outcome() {
            Outcome::PartialFailure { failures } => {
                failures.into_iter().filter_map(|f| f.store_id).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn status_failures(entries: &BTreeMap<String, BusinessOperationStatus>) -> Vec<ItemFailure> {
    entries
        .iter()
        .filter(|(_, status)| status.is_failed())
        .map(|(key, status)| ItemFailure {
            key: key.clone(),
            store_id: Some(status.store_id.clone()),
            message: status.error_message.clone().unwrap_or_default(),
        })
        .collect()
}

impl OperationResult for CreateBusinessesResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }

    fn payload_failures(&self) -> Vec<ItemFailure> {
        status_failures(&self.created_businesses)
    }
}

impl OperationResult for UpdateBusinessesResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }

    fn payload_failures(&self) -> Vec<ItemFailure> {
        status_failures(&self.updated_businesses)
    }
}

impl OperationResult for FetchBusinessesResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }
}

impl OperationResult for FetchBusinessStatusInfoResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }
}

impl OperationResult for GetAnalyticsResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }
}

impl OperationResult for DeleteBusinessesResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }

    fn payload_failures(&self) -> Vec<ItemFailure> {
        self.deleted_businesses
            .iter()
            .filter(|d| d.is_failed())
            .map(|d| ItemFailure {
                key: d.store_id.clone(),
                store_id: Some(d.store_id.clone()),
                message: d.error_message.clone().unwrap_or_default(),
            })
            .collect()
    }
}

impl OperationResult for ChainResponse {
    fn header(&self) -> &ResponseHeader {
        &self.header
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
