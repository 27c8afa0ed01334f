// src/lead_search/types.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use thiserror::Error;

use super::seniority::SeniorityLevel;

// ===== Upstream field names =====

pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const SURNAME: &str = "surname";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const LINKEDIN: &str = "linkedin";
    pub const POSITION: &str = "position";
    pub const LEVEL: &str = "level";
    pub const DEPARTMENT: &str = "department";
    pub const SKILLS: &str = "skills";
    pub const HEADLINE: &str = "headline";
    pub const BIO: &str = "bio";
    pub const COMPANY_NAME: &str = "company_name";
    pub const COMPANY_DOMAIN: &str = "company_domain";
    pub const COMPANY_LINKEDIN: &str = "company_linkedin";
    pub const COMPANY_LOCATION: &str = "company_location";
    pub const COMPANY_INDUSTRY: &str = "company_industry";
    pub const COMPANY_SUBINDUSTRY: &str = "company_subindustry";
    pub const COMPANY_HEADCOUNT: &str = "company_headcount";
    pub const COMPANY_FOUNDED: &str = "company_founded";
    pub const COMPANY_REVENUE: &str = "company_revenue";

    /// Upstream `location` holds the country name ("United States").
    pub const UPSTREAM_COUNTRY_FIELD: &str = "location";
    /// Upstream `region` holds the geographic region ("Northern America").
    pub const UPSTREAM_REGION_FIELD: &str = "region";
}

// ===== Errors =====

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("lead record is not a JSON object (got {0})")]
    NotAnObject(&'static str),

    #[error("field '{field}' holds a {found}, expected a scalar")]
    UnexpectedType { field: String, found: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    UpstreamHttpError,
    UpstreamTimeout,
    UpstreamInvalidResponse,
    UpstreamConnectionError,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("API Error {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("API Connection Timeout")]
    Timeout,

    #[error("Invalid JSON response from API: {0}")]
    InvalidResponse(String),

    #[error("API Connection Error: {0}")]
    Connection(String),
}

impl UpstreamError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            UpstreamError::HttpStatus { .. } => FetchErrorKind::UpstreamHttpError,
            UpstreamError::Timeout => FetchErrorKind::UpstreamTimeout,
            UpstreamError::InvalidResponse(_) => FetchErrorKind::UpstreamInvalidResponse,
            UpstreamError::Connection(_) => FetchErrorKind::UpstreamConnectionError,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if e.is_decode() {
            UpstreamError::InvalidResponse(e.to_string())
        } else {
            UpstreamError::Connection(e.to_string())
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ===== Raw upstream record =====

/// One lead exactly as the upstream service returned it: a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawLeadRecord(Map<String, Value>);

impl RawLeadRecord {
    /// Lenient text view of a field: strings as-is, numbers and booleans
    /// rendered, everything else empty. Used by the local filters.
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        match self.0.get(field) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            _ => Cow::Borrowed(""),
        }
    }

    /// Strict text view: absent or null is empty, containers are an error.
    pub fn scalar(&self, field: &str) -> Result<String, ParseError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(other) => Err(ParseError::UnexpectedType {
                field: field.to_string(),
                found: json_type_name(other),
            }),
        }
    }
}

impl TryFrom<Value> for RawLeadRecord {
    type Error = ParseError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ParseError::NotAnObject(json_type_name(&other))),
        }
    }
}

/// Upstream response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamResponse {
    pub results: Vec<Value>,
}

// ===== Parsed lead =====

/// Normalized lead handed to persistence, the API and exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParsedLead {
    pub external_id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub photo_url: Option<String>,

    #[serde(default)]
    pub current_title: String,
    #[serde(default)]
    pub current_company: String,
    #[serde(default)]
    pub company_linkedin_url: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub department: String,

    /// Upstream `location`, i.e. the country name
    #[serde(default)]
    pub location: String,
    /// Upstream `region`, i.e. the geographic region
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub company_domain: String,
    #[serde(default)]
    pub company_location: String,
    #[serde(default)]
    pub company_founded: String,
    #[serde(default)]
    pub company_revenue: String,
    #[serde(default)]
    pub company_subindustry: String,

    #[serde(default)]
    pub seniority_level: Option<SeniorityLevel>,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub bio: String,
}

impl ParsedLead {
    pub fn seniority_label(&self) -> &'static str {
        self.seniority_level
            .map(SeniorityLevel::display_label)
            .unwrap_or("")
    }
}

// ===== Fetch result =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub success: bool,
    pub results: Vec<RawLeadRecord>,
    pub error: Option<String>,
    pub error_kind: Option<FetchErrorKind>,
    pub total: usize,
}

impl FetchResult {
    pub fn ok(results: Vec<RawLeadRecord>) -> Self {
        let total = results.len();
        Self {
            success: true,
            results,
            error: None,
            error_kind: None,
            total,
        }
    }

    pub fn failure(error: &UpstreamError) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_view_is_lenient() {
        let record = RawLeadRecord::try_from(json!({
            "id": 42,
            "name": "John",
            "skills": null,
            "tags": ["a"]
        }))
        .unwrap();

        assert_eq!(record.text("id"), "42");
        assert_eq!(record.text("name"), "John");
        assert_eq!(record.text("skills"), "");
        assert_eq!(record.text("tags"), "");
        assert_eq!(record.text("missing"), "");
    }

    #[test]
    fn scalar_view_rejects_containers() {
        let record = RawLeadRecord::try_from(json!({"position": {"title": "CTO"}})).unwrap();
        let err = record.scalar("position").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedType {
                field: "position".to_string(),
                found: "object"
            }
        );
        assert_eq!(record.scalar("absent").unwrap(), "");
    }

    #[test]
    fn non_objects_are_not_records() {
        assert_eq!(
            RawLeadRecord::try_from(json!("nope")).unwrap_err(),
            ParseError::NotAnObject("string")
        );
    }

    #[test]
    fn failure_result_carries_kind_and_message() {
        let result = FetchResult::failure(&UpstreamError::HttpStatus {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        });
        assert!(!result.success);
        assert!(result.results.is_empty());
        assert_eq!(result.error_kind, Some(FetchErrorKind::UpstreamHttpError));
        assert!(result.error.unwrap().contains("500"));
    }
}
