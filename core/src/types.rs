//! Request-side DTOs for the places API.
//!
//! Field names follow the wire format (PascalCase) through serde renames;
//! optional fields are omitted from the JSON when `None`.

use serde::{Deserialize, Serialize};

/// The caller's identity, sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Identity {
    pub puid: String,
    pub auth_provider: String,
    pub email_id: String,
}

impl Identity {
    pub fn new(
        puid: impl Into<String>,
        auth_provider: impl Into<String>,
        email_id: impl Into<String>,
    ) -> Self {
        Self {
            puid: puid.into(),
            auth_provider: auth_provider.into(),
            email_id: email_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCategory {
    #[serde(rename = "CategoryName")]
    pub category_name: String,
    #[serde(rename = "BPCategoryId")]
    pub bp_category_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Categories {
    pub business_categories: Vec<BusinessCategory>,
    pub primary_category: BusinessCategory,
}

/// Special opening hours for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HolidayHoursTimePeriod {
    /// `yyyy-MM-dd`
    pub date: String,
    /// `HH:mm`, 24-hour clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_closed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Amenity {
    pub id: String,
    pub name: String,
}

/// One business location as submitted to and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessListing {
    pub store_id: String,
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_name: Option<String>,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state_or_province: String,
    pub country: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub categories: Categories,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_web_site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(rename = "MenuURL", default, skip_serializing_if = "Option::is_none")]
    pub menu_url: Option<String>,
    #[serde(rename = "OrderURL", default, skip_serializing_if = "Option::is_none")]
    pub order_url: Option<String>,
    /// `"$"` through `"$$$$$"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_price: Option<String>,
    /// `"1 star"` through `"5 star"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_star_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<Amenity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_24_hours: Option<bool>,
    /// Entries like `"Mon 08:00 AM-08:00 PM"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_hours: Option<Vec<HolidayHoursTimePeriod>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_address: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_areas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_closed: Option<bool>,
}

impl BusinessListing {
    /// A listing with only the required fields set.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store_id: impl Into<String>,
        business_name: impl Into<String>,
        address_line1: impl Into<String>,
        city: impl Into<String>,
        state_or_province: impl Into<String>,
        country: impl Into<String>,
        zip_code: impl Into<String>,
        categories: Categories,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            business_name: business_name.into(),
            chain_name: None,
            address_line1: address_line1.into(),
            address_line2: None,
            city: city.into(),
            state_or_province: state_or_province.into(),
            country: country.into(),
            zip_code: zip_code.into(),
            phone_number: None,
            categories,
            latitude: None,
            longitude: None,
            business_email: None,
            main_web_site: None,
            facebook_address: None,
            twitter_address: None,
            photos: None,
            menu_url: None,
            order_url: None,
            restaurant_price: None,
            hotel_star_rating: None,
            npi: None,
            offers: None,
            amenities: None,
            open_24_hours: None,
            operating_hours: None,
            holiday_hours: None,
            hide_address: None,
            service_areas: None,
            is_closed: None,
        }
    }
}

/// How a paged query selects businesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriteriaType {
    GetInBatches,
    SearchByStoreIds,
    SearchByQuery,
}

/// Criteria for `GetBusinesses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(rename = "CriteriaType")]
    pub criteria_type: CriteriaType,
    #[serde(rename = "StoreIds", default, skip_serializing_if = "Option::is_none")]
    pub store_ids: Option<Vec<String>>,
    #[serde(rename = "BusinessName", default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(rename = "City", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "BPCategoryId", default, skip_serializing_if = "Option::is_none")]
    pub bp_category_id: Option<u64>,
    #[serde(rename = "Zip", default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl SearchCriteria {
    fn empty(criteria_type: CriteriaType) -> Self {
        Self {
            criteria_type,
            store_ids: None,
            business_name: None,
            city: None,
            bp_category_id: None,
            zip: None,
        }
    }

    /// Page through every business on the account.
    pub fn in_batches() -> Self {
        Self::empty(CriteriaType::GetInBatches)
    }

    pub fn by_store_ids<I, S>(store_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store_ids: Some(store_ids.into_iter().map(Into::into).collect()),
            ..Self::empty(CriteriaType::SearchByStoreIds)
        }
    }

    pub fn by_name(business_name: impl Into<String>) -> Self {
        Self {
            business_name: Some(business_name.into()),
            ..Self::empty(CriteriaType::SearchByQuery)
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_category(mut self, bp_category_id: u64) -> Self {
        self.bp_category_id = Some(bp_category_id);
        self
    }

    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }
}

/// Selection for the status and analytics queries, which only support
/// paging or an explicit store-id set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCriteria {
    GetInBatches,
    SearchByStoreIds(Vec<String>),
}

impl StoreCriteria {
    pub fn criteria_type(&self) -> CriteriaType {
        match self {
            StoreCriteria::GetInBatches => CriteriaType::GetInBatches,
            StoreCriteria::SearchByStoreIds(_) => CriteriaType::SearchByStoreIds,
        }
    }

    pub fn store_ids(&self) -> Option<&[String]> {
        match self {
            StoreCriteria::GetInBatches => None,
            StoreCriteria::SearchByStoreIds(ids) => Some(ids),
        }
    }
}

/// A chain of locations managed in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChainInfo {
    pub chain_name: String,
    pub locations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_contact_email: Option<String>,
}

impl ChainInfo {
    pub fn new(chain_name: impl Into<String>, locations: u32) -> Self {
        Self {
            chain_name: chain_name.into(),
            locations,
            website: None,
            client_contact_name: None,
            client_contact_email: None,
        }
    }
}
