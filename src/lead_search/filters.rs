// src/lead_search/filters.rs
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::non_empty;

pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 1000;

/// Search constraints for one request. Every field is optional and a blank
/// value means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seniority_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Raw limit as supplied; see [`FilterSet::effective_limit`]
    #[serde(
        default,
        deserialize_with = "deserialize_limit",
        skip_serializing_if = "Option::is_none"
    )]
    pub limit: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn with_title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn with_company(mut self, value: impl Into<String>) -> Self {
        self.company = Some(value.into());
        self
    }

    pub fn with_location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }

    pub fn with_country(mut self, value: impl Into<String>) -> Self {
        self.country = Some(value.into());
        self
    }

    pub fn with_region(mut self, value: impl Into<String>) -> Self {
        self.region = Some(value.into());
        self
    }

    pub fn with_industry(mut self, value: impl Into<String>) -> Self {
        self.industry = Some(value.into());
        self
    }

    pub fn with_seniority_level(mut self, value: impl Into<String>) -> Self {
        self.seniority_level = Some(value.into());
        self
    }

    pub fn with_company_size(mut self, value: impl Into<String>) -> Self {
        self.company_size = Some(value.into());
        self
    }

    pub fn with_keywords(mut self, value: impl Into<String>) -> Self {
        self.keywords = Some(value.into());
        self
    }

    pub fn with_limit(mut self, value: impl ToString) -> Self {
        self.limit = Some(value.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn company(&self) -> Option<&str> {
        non_empty(self.company.as_deref())
    }

    /// Country constraint: `location` wins, `country` fills in when it is blank
    pub fn location(&self) -> Option<&str> {
        non_empty(self.location.as_deref()).or_else(|| non_empty(self.country.as_deref()))
    }

    pub fn region(&self) -> Option<&str> {
        non_empty(self.region.as_deref())
    }

    pub fn industry(&self) -> Option<&str> {
        non_empty(self.industry.as_deref())
    }

    pub fn seniority_level(&self) -> Option<&str> {
        non_empty(self.seniority_level.as_deref())
    }

    pub fn company_size(&self) -> Option<&str> {
        non_empty(self.company_size.as_deref())
    }

    pub fn keywords(&self) -> Option<&str> {
        non_empty(self.keywords.as_deref())
    }

    /// Requested page size: parsed, capped at [`MAX_LIMIT`], and [`DEFAULT_LIMIT`]
    /// when absent, unparsable or not positive.
    pub fn effective_limit(&self) -> u32 {
        match non_empty(self.limit.as_deref()).and_then(|raw| raw.parse::<i64>().ok()) {
            Some(limit) if limit > 0 => limit.min(MAX_LIMIT as i64) as u32,
            _ => DEFAULT_LIMIT,
        }
    }

    /// True when no field constrains the result set (limit does not count)
    pub fn is_unconstrained(&self) -> bool {
        self.name().is_none()
            && self.title().is_none()
            && self.company().is_none()
            && self.location().is_none()
            && self.region().is_none()
            && self.industry().is_none()
            && self.seniority_level().is_none()
            && self.company_size().is_none()
            && self.keywords().is_none()
    }

    /// Trimmed copy with blank values dropped and the limit resolved; used for cache keys
    pub fn normalized(&self) -> FilterSet {
        let keep = |value: &Option<String>| non_empty(value.as_deref()).map(str::to_string);
        FilterSet {
            name: keep(&self.name),
            title: keep(&self.title),
            company: keep(&self.company),
            location: keep(&self.location),
            country: keep(&self.country),
            region: keep(&self.region),
            industry: keep(&self.industry),
            seniority_level: keep(&self.seniority_level),
            company_size: keep(&self.company_size),
            keywords: keep(&self.keywords),
            limit: Some(self.effective_limit().to_string()),
        }
    }
}

/// Accept `"limit": 100`, `"limit": "100"` or `"limit": null`
fn deserialize_limit<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
