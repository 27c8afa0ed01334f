// src/lead_search/request_builder.rs
//! Turns a full filter set into the single-filter payload the upstream accepts.
//!
//! The upstream answers combined structured filters with 500s or timeouts, so at
//! most one filter goes on the wire. The rest are re-applied locally by
//! [`super::local_filter::apply_local_filters`].

use serde::Serialize;
use tracing::debug;

use super::filters::FilterSet;
use super::seniority::upstream_level_for_code;

/// Filters the upstream honours, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityFilter {
    Location,
    Title,
    SeniorityLevel,
    Industry,
}

impl PriorityFilter {
    pub const ORDER: [PriorityFilter; 4] = [
        PriorityFilter::Location,
        PriorityFilter::Title,
        PriorityFilter::SeniorityLevel,
        PriorityFilter::Industry,
    ];

    /// Upstream body key
    pub fn wire_key(self) -> &'static str {
        match self {
            PriorityFilter::Location => "location",
            PriorityFilter::Title => "position",
            PriorityFilter::SeniorityLevel => "level",
            PriorityFilter::Industry => "company_industry",
        }
    }

    fn wire_value(self, filters: &FilterSet) -> Option<String> {
        match self {
            PriorityFilter::Location => filters.location().map(str::to_string),
            PriorityFilter::Title => filters.title().map(str::to_string),
            PriorityFilter::SeniorityLevel => filters.seniority_level().map(upstream_level_for_code),
            PriorityFilter::Industry => filters.industry().map(str::to_string),
        }
    }
}

/// The one filter that will be sent upstream for this filter set, if any
pub fn select_priority_filter(filters: &FilterSet) -> Option<PriorityFilter> {
    PriorityFilter::ORDER
        .into_iter()
        .find(|candidate| candidate.wire_value(filters).is_some())
}

/// JSON body sent to the upstream. Values are always single-element arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpstreamPayload {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_industry: Option<Vec<String>>,
}

pub fn build_request(filters: &FilterSet) -> UpstreamPayload {
    let mut payload = UpstreamPayload {
        limit: filters.effective_limit(),
        ..Default::default()
    };

    let Some(selected) = select_priority_filter(filters) else {
        debug!("No API filters applied - fetching unfiltered results");
        return payload;
    };

    // select_priority_filter only returns filters that have a value
    let value = selected.wire_value(filters).unwrap_or_default();
    debug!("Using API filter: {} = {}", selected.wire_key(), value);

    let slot = match selected {
        PriorityFilter::Location => &mut payload.location,
        PriorityFilter::Title => &mut payload.position,
        PriorityFilter::SeniorityLevel => &mut payload.level,
        PriorityFilter::Industry => &mut payload.company_industry,
    };
    *slot = Some(vec![value]);

    payload
}
