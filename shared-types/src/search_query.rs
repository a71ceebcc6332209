use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Page size used to compute skip offsets when a query does not set one.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Anything that can be turned into the ordered `(name, value)` pairs of a
/// search request's query string.
pub trait ToQueryPairs {
    fn to_query_pairs(&self) -> Vec<(String, String)>;
}

/// Job types accepted by the search endpoint.
///
/// Variant order is the order in which the flags are written to the query
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobType {
    Permanent,
    Contract,
    Temp,
    PartTime,
    FullTime,
    Graduate,
}

impl JobType {
    pub const ALL: [JobType; 6] = [
        JobType::Permanent,
        JobType::Contract,
        JobType::Temp,
        JobType::PartTime,
        JobType::FullTime,
        JobType::Graduate,
    ];

    pub fn param_name(&self) -> &'static str {
        match self {
            JobType::Permanent => "permanent",
            JobType::Contract => "contract",
            JobType::Temp => "temp",
            JobType::PartTime => "partTime",
            JobType::FullTime => "fullTime",
            JobType::Graduate => "graduate",
        }
    }
}

/// Who posted a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingSource {
    DirectEmployer,
    RecruitmentAgency,
}

impl ListingSource {
    pub fn param_name(&self) -> &'static str {
        match self {
            ListingSource::DirectEmployer => "postedByDirectEmployer",
            ListingSource::RecruitmentAgency => "postedByRecruitmentAgency",
        }
    }
}

impl ToQueryPairs for BTreeSet<JobType> {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|job_type| (job_type.param_name().to_string(), "true".to_string()))
            .collect()
    }
}

impl ToQueryPairs for BTreeSet<ListingSource> {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|source| (source.param_name().to_string(), "true".to_string()))
            .collect()
    }
}

/// Parameters of a job search. Based on the jobseeker search API:
/// https://www.reed.co.uk/developers/jobseeker
///
/// Unset fields are left out of the request entirely; the server applies its
/// own defaults for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// id of the employer posting the job
    pub employer_id: Option<String>,
    /// profile id of the employer posting the job
    pub employer_profile_id: Option<String>,
    pub keywords: Option<String>,
    pub location_name: Option<String>,
    /// distance from `location_name` in miles (server default is 10)
    pub distance_from_location: Option<i64>,
    #[serde(default)]
    pub job_types: BTreeSet<JobType>,
    pub minimum_salary: Option<f64>,
    pub maximum_salary: Option<f64>,
    #[serde(default)]
    pub listing_sources: BTreeSet<ListingSource>,
    /// maximum number of results to return (server default and limit is 100)
    pub results_to_take: Option<i64>,
    /// number of results to skip, used together with `results_to_take` for paging
    pub results_to_skip: Option<i64>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this query searching for `keywords`.
    pub fn with_keywords(&self, keywords: &str) -> Self {
        Self {
            keywords: Some(keywords.to_string()),
            ..self.clone()
        }
    }

    /// Page size used for skip arithmetic.
    pub fn page_size(&self) -> i64 {
        self.results_to_take.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// A copy of this query for `keywords` positioned at page `page`.
    pub fn for_page(&self, keywords: &str, page: u64) -> Self {
        let page_size = self.page_size();
        Self {
            results_to_take: Some(page_size),
            results_to_skip: Some(page as i64 * page_size),
            ..self.with_keywords(keywords)
        }
    }
}

fn push_text(pairs: &mut Vec<(String, String)>, name: &str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
        pairs.push((name.to_string(), value.to_string()));
    }
}

fn push_integer(pairs: &mut Vec<(String, String)>, name: &str, value: Option<i64>) {
    if let Some(value) = value {
        pairs.push((name.to_string(), value.to_string()));
    }
}

fn push_amount(pairs: &mut Vec<(String, String)>, name: &str, value: Option<f64>) {
    if let Some(value) = value {
        pairs.push((name.to_string(), format!("{value:.0}")));
    }
}

impl ToQueryPairs for SearchQuery {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        push_text(&mut pairs, "employerId", &self.employer_id);
        push_text(&mut pairs, "employerProfileId", &self.employer_profile_id);
        push_text(&mut pairs, "keywords", &self.keywords);
        push_text(&mut pairs, "locationName", &self.location_name);
        push_integer(&mut pairs, "distanceFromLocation", self.distance_from_location);
        pairs.extend(self.job_types.to_query_pairs());
        push_amount(&mut pairs, "minimumSalary", self.minimum_salary);
        push_amount(&mut pairs, "maximumSalary", self.maximum_salary);
        pairs.extend(self.listing_sources.to_query_pairs());
        push_integer(&mut pairs, "resultsToTake", self.results_to_take);
        push_integer(&mut pairs, "resultsToSkip", self.results_to_skip);

        pairs
    }
}
