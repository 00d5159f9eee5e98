//! Per-call request envelopes.
//!
//! Every request body is `{TrackingId, Identity, ...payload}`. The payload
//! structs below borrow from the caller's arguments and are flattened into
//! the envelope, so no listing is cloned to build a request.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::types::{BusinessListing, ChainInfo, CriteriaType, Identity, SearchCriteria, StoreCriteria};

/// The eight remote operations, one per endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateBusinesses,
    UpdateBusinesses,
    FetchBusinesses,
    FetchBusinessStatusInfo,
    GetAnalytics,
    DeleteBusinesses,
    CreateBulkChain,
    UpdateBulkChainInfo,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::CreateBusinesses,
        Operation::UpdateBusinesses,
        Operation::FetchBusinesses,
        Operation::FetchBusinessStatusInfo,
        Operation::GetAnalytics,
        Operation::DeleteBusinesses,
        Operation::CreateBulkChain,
        Operation::UpdateBulkChainInfo,
    ];

    /// Path appended to the active base endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Operation::CreateBusinesses => "/CreateBusinesses",
            Operation::UpdateBusinesses => "/UpdateBusinesses",
            Operation::FetchBusinesses => "/GetBusinesses",
            Operation::FetchBusinessStatusInfo => "/GetBusinessStatusInfo",
            Operation::GetAnalytics => "/GetAnalytics",
            Operation::DeleteBusinesses => "/DeleteBusinesses",
            Operation::CreateBulkChain => "/CreateBulkChain",
            Operation::UpdateBulkChainInfo => "/UpdateBulkChainInfo",
        }
    }

    /// Human-readable name used in error messages ("Failed to ...").
    pub fn description(self) -> &'static str {
        match self {
            Operation::CreateBusinesses => "create businesses",
            Operation::UpdateBusinesses => "update businesses",
            Operation::FetchBusinesses => "fetch businesses",
            Operation::FetchBusinessStatusInfo => "fetch business status info",
            Operation::GetAnalytics => "get analytics",
            Operation::DeleteBusinesses => "delete businesses",
            Operation::CreateBulkChain => "create bulk chain",
            Operation::UpdateBulkChainInfo => "update bulk chain info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

/// Request body for one call.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<'a, P> {
    #[serde(rename = "TrackingId")]
    pub tracking_id: Uuid,
    #[serde(rename = "Identity")]
    pub identity: &'a Identity,
    #[serde(flatten)]
    pub payload: P,
}

impl<'a, P: Serialize> Envelope<'a, P> {
    /// Wrap `payload` with a fresh tracking id.
    pub fn new(identity: &'a Identity, payload: P) -> Self {
        Self {
            tracking_id: Uuid::new_v4(),
            identity,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessesPayload<'a> {
    pub businesses: &'a [BusinessListing],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchPayload<'a> {
    pub page_number: u32,
    pub page_size: u32,
    pub search_criteria: &'a SearchCriteria,
}

/// Paging plus `CriteriaType`/`StoreIds` at the top level, as the status and
/// analytics endpoints expect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorePagePayload<'a> {
    pub page_number: u32,
    pub page_size: u32,
    pub criteria_type: CriteriaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_ids: Option<&'a [String]>,
}

impl<'a> StorePagePayload<'a> {
    pub fn new(page_number: u32, page_size: u32, criteria: &'a StoreCriteria) -> Self {
        Self {
            page_number,
            page_size,
            criteria_type: criteria.criteria_type(),
            store_ids: criteria.store_ids(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreIdsPayload<'a> {
    pub store_ids: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChainPayload<'a> {
    pub chain_info: &'a ChainInfo,
}
