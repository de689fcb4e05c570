use super::CompanyScore;
use crate::error::DecodeError;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, trace, warn};

// companies
// ----------------------------------------------------------------
//
// {
//   "companies": [
//     { "name": "Acme", "esg_score": 88.2 },
//     { "name": "Globex", "esg_score": 71 },
//     ...
//   ]
// }

/// How an element of the `companies` array is projected onto a [CompanyScore].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Missing or mistyped fields collapse to `""` / `0.0`; every element yields a record.
    #[default]
    Lenient,

    /// Elements without a string `name` and a numeric `esg_score` are skipped.
    Strict,
}

/// Decode a scores payload, preserving the order of the `companies` array.
pub fn decode(body: &str, strictness: Strictness) -> Result<Vec<CompanyScore>, DecodeError> {
    let root: Value = serde_json::from_str(body)?;
    let companies = root
        .get("companies")
        .ok_or(DecodeError::MissingCompanies)?
        .as_array()
        .ok_or(DecodeError::NotAnArray)?;

    let scores: Vec<CompanyScore> = match strictness {
        Strictness::Lenient => companies.iter().map(lenient).collect(),
        Strictness::Strict => companies
            .iter()
            .enumerate()
            .filter_map(|(i, element)| {
                // the derived visitor would also take `["name", score]`
                if !element.is_object() {
                    warn!("skipping companies[{i}], error(not an object)");
                    return None;
                }
                match CompanyScore::deserialize(element) {
                    Ok(score) => Some(score),
                    Err(err) => {
                        warn!("skipping companies[{i}], error({err})");
                        None
                    }
                }
            })
            .collect(),
    };

    trace!("decoded {} company scores", scores.len());
    Ok(scores)
}

/// [decode], with any failure logged and flattened to an empty list.
pub fn parse(body: &str, strictness: Strictness) -> Vec<CompanyScore> {
    match decode(body, strictness) {
        Ok(scores) => scores,
        Err(err) => {
            error!("failed to parse the JSON response, error({err})");
            vec![]
        }
    }
}

fn lenient(element: &Value) -> CompanyScore {
    let name = match element.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(other @ (Value::Number(_) | Value::Bool(_))) => other.to_string(),
        _ => String::new(),
    };

    let esg_score = match element.get("esg_score") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())
            .unwrap_or_default(),
        _ => 0.0,
    };

    CompanyScore { name, esg_score }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
