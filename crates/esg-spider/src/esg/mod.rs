use serde::Deserialize;

mod sql;

/// Raw HTTP retrieval of the scores payload.
pub mod fetch;

/// `{ "companies": [ { "name": ..., "esg_score": ... }, ... ] }` decoding.
pub mod de;

/// PostgreSQL persistence of company scores, `esg_database.companies`.
pub mod store;

/// The top-N leaderboard printed at the end of a run.
pub mod report;

/// A single company and its ESG rating, as found in the API payload and in
/// `esg_database.companies`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CompanyScore {
    pub name: String,
    pub esg_score: f64,
}

impl CompanyScore {
    pub fn new(name: impl Into<String>, esg_score: f64) -> Self {
        Self {
            name: name.into(),
            esg_score,
        }
    }
}
