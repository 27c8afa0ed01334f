// src/lead_search/mod.rs
//! Lead search pipeline: filters, upstream request, local filtering and parsing

pub mod client;
pub mod filters;
pub mod local_filter;
pub mod parser;
pub mod request_builder;
pub mod seniority;
pub mod service;
pub mod types;

pub use client::LeadApiClient;
pub use filters::{FilterSet, DEFAULT_LIMIT, MAX_LIMIT};
pub use local_filter::apply_local_filters;
pub use parser::{parse, parse_batch};
pub use request_builder::{build_request, select_priority_filter, PriorityFilter, UpstreamPayload};
pub use seniority::SeniorityLevel;
pub use service::{paginate, PageInfo, SearchOutcome, SearchService, DEFAULT_LEADS_PER_PAGE};
pub use types::{
    FetchErrorKind, FetchResult, ParseError, ParsedLead, RawLeadRecord, UpstreamError,
};
