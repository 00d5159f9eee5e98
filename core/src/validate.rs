//! Argument checks run before any request is built.
//!
//! All functions are pure and synchronous. A failure here means nothing was
//! sent.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ApiError;
use crate::types::{ChainInfo, CriteriaType, Identity, SearchCriteria, StoreCriteria};

pub const MAX_BATCH_SIZE: usize = 1000;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const MIN_CHAIN_LOCATIONS: u32 = 10;

// Syntactic only: one `@`, no whitespace, a dot inside the domain.
static EMAIL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

pub fn is_email_valid(email: &str) -> bool {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Reject an identity with a blank field or a malformed email.
pub fn identity(identity: &Identity) -> Result<(), ApiError> {
    let missing: Vec<&str> = [
        ("Puid", &identity.puid),
        ("AuthProvider", &identity.auth_provider),
        ("EmailId", &identity.email_id),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
        return Err(ApiError::InvalidIdentity(format!(
            "Identity is required; missing {}",
            missing.join(", ")
        )));
    }
    if !is_email_valid(&identity.email_id) {
        return Err(ApiError::InvalidEmail(format!(
            "EmailId {:?} is not a valid email address",
            identity.email_id
        )));
    }
    Ok(())
}

pub fn batch<T>(items: &[T]) -> Result<(), ApiError> {
    if items.is_empty() || items.len() > MAX_BATCH_SIZE {
        return Err(ApiError::InvalidArgument(format!(
            "Businesses array must contain between 1 and {MAX_BATCH_SIZE} items (got {}).",
            items.len()
        )));
    }
    Ok(())
}

pub fn paging(page_number: u32, page_size: u32) -> Result<(), ApiError> {
    if page_number < 1 {
        return Err(ApiError::InvalidArgument(
            "PageNumber must be greater than or equal to 1.".to_string(),
        ));
    }
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(ApiError::InvalidArgument(format!(
            "PageSize must be between 1 and {MAX_PAGE_SIZE}."
        )));
    }
    Ok(())
}

pub fn store_ids(store_ids: &[String]) -> Result<(), ApiError> {
    if store_ids.is_empty() {
        return Err(ApiError::InvalidArgument(
            "StoreIds must contain at least one store id.".to_string(),
        ));
    }
    Ok(())
}

pub fn search_criteria(criteria: &SearchCriteria) -> Result<(), ApiError> {
    if criteria.criteria_type == CriteriaType::SearchByStoreIds {
        return store_ids(criteria.store_ids.as_deref().unwrap_or_default());
    }
    Ok(())
}

pub fn store_criteria(criteria: &StoreCriteria) -> Result<(), ApiError> {
    match criteria {
        StoreCriteria::GetInBatches => Ok(()),
        StoreCriteria::SearchByStoreIds(ids) => store_ids(ids),
    }
}

pub fn chain(info: &ChainInfo) -> Result<(), ApiError> {
    if info.locations < MIN_CHAIN_LOCATIONS {
        return Err(ApiError::InvalidArgument(format!(
            "Locations must be at least {MIN_CHAIN_LOCATIONS} for a chain (got {}).",
            info.locations
        )));
    }
    Ok(())
}
