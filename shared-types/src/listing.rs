use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};

use crate::SearchQuery;

/// Format of `date` and `expirationDate` in search responses.
pub const LISTING_DATE_FORMAT: &str = "%d/%m/%Y";

/// A job listing as returned by the search endpoint.
///
/// Two listings are the same entity when their `job_id` matches; no other
/// field takes part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub job_id: i64,
    pub employer_id: i64,
    pub employer_name: String,
    #[serde(default)]
    pub employer_profile_id: Option<i64>,
    #[serde(default)]
    pub employer_profile_name: Option<String>,
    pub job_title: String,
    pub location_name: String,
    // TODO: salaries arrive as JSON floats; switch to a decimal type once the
    // API documents its precision.
    #[serde(default)]
    pub minimum_salary: Option<f64>,
    #[serde(default)]
    pub maximum_salary: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(with = "listing_date")]
    pub expiration_date: NaiveDate,
    #[serde(with = "listing_date")]
    pub date: NaiveDate,
    pub job_description: String,
    pub applications: i64,
    pub job_url: String,
}

impl PartialEq for Listing {
    fn eq(&self, other: &Self) -> bool {
        self.job_id == other.job_id
    }
}

impl Eq for Listing {}

impl Hash for Listing {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.job_id.hash(state);
    }
}

mod listing_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(LISTING_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), LISTING_DATE_FORMAT)
            .map_err(|e| serde::de::Error::custom(format!("invalid listing date '{raw}': {e}")))
    }
}

/// Body of a successful search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<Listing>,
    pub total_results: i64,
}

/// A response together with the query that produced it.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub query: SearchQuery,
    pub response: SearchResponse,
}

#[cfg(test)]
pub(crate) fn test_listing(job_id: i64, title: &str) -> Listing {
    Listing {
        job_id,
        employer_id: 1,
        employer_name: "Acme".to_string(),
        employer_profile_id: None,
        employer_profile_name: None,
        job_title: title.to_string(),
        location_name: "London".to_string(),
        minimum_salary: None,
        maximum_salary: None,
        currency: None,
        expiration_date: NaiveDate::from_ymd_opt(2021, 9, 30).unwrap(),
        date: NaiveDate::from_ymd_opt(2021, 8, 12).unwrap(),
        job_description: String::new(),
        applications: 0,
        job_url: format!("https://example.com/jobs/{job_id}"),
    }
}
