//! Typed async client core for the places business-listing API.
//!
//! # Overview
//! `PlacesClient` validates arguments, wraps them in a per-call envelope
//! (fresh `TrackingId` plus the session identity), sends the request through
//! an injected `Transport`, and returns the decoded body or one normalized
//! `ApiError`.
//!
//! # Design
//! - `Session` owns identity and environment; only `&mut self` methods
//!   change them, and requests read them at build time.
//! - Each operation has a synchronous `build_*` half and a shared
//!   `parse_response` half, so callers can do their own I/O.
//! - Responses that report per-item failures are successes at this layer;
//!   `OperationResult::outcome` classifies them.
//! - `UreqTransport` is the default transport. Anything implementing
//!   `Transport` can replace it.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod response;
pub mod session;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::PlacesClient;
pub use config::{ClientConfig, ConfigError, Endpoints};
pub use envelope::Operation;
pub use error::{ApiError, TransportError};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use response::{
    BusinessAnalytics, BusinessOperationStatus, BusinessStatistics, BusinessStatus,
    BusinessStatusInfo, ChainResponse, CreateBusinessesResponse, DeleteBusinessStatus,
    DeleteBusinessesResponse, ErrorCode, FetchBusinessStatusInfoResponse,
    FetchBusinessesResponse, GetAnalyticsResponse, ItemFailure, OperationResult, Outcome,
    QualityIssue, ResponseHeader, UpdateBusinessesResponse, ValidationError,
};
pub use session::{Environment, Session};
pub use transport::UreqTransport;
pub use types::{
    BusinessCategory, BusinessListing, Categories, ChainInfo, CriteriaType, Identity,
    SearchCriteria, StoreCriteria,
};
