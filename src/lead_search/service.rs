// src/lead_search/service.rs
//! Search orchestration: cache, upstream fetch, local filtering, parsing, paging

use serde::Serialize;
use tracing::info;

use super::client::LeadApiClient;
use super::filters::FilterSet;
use super::local_filter::apply_local_filters;
use super::parser::parse_batch;
use super::request_builder::build_request;
use super::types::{FetchErrorKind, FetchResult, ParsedLead};
use crate::core::cache::SearchCache;

pub const DEFAULT_LEADS_PER_PAGE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Slice `items` for the requested page.
///
/// Unparsable or non-positive pages fall back to the first page and pages past
/// the end clamp to the last one. An empty collection still has one page.
pub fn paginate<T>(items: Vec<T>, page: Option<&str>, per_page: usize) -> (Vec<T>, PageInfo) {
    let per_page = per_page.max(1);
    let num_pages = items.len().div_ceil(per_page).max(1);

    let requested = page
        .and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);
    let page = usize::try_from(requested).unwrap_or(usize::MAX).min(num_pages);

    let start = (page - 1) * per_page;
    let slice = items.into_iter().skip(start).take(per_page).collect();

    (
        slice,
        PageInfo {
            page,
            num_pages,
            per_page,
            has_next: page < num_pages,
            has_previous: page > 1,
        },
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FetchErrorKind>,
    pub leads: Vec<ParsedLead>,
    pub total_results: usize,
    #[serde(flatten)]
    pub pagination: PageInfo,
    pub from_cache: bool,
}

#[derive(Clone)]
pub struct SearchService {
    client: LeadApiClient,
    cache: Option<SearchCache>,
    per_page: usize,
}

impl SearchService {
    pub fn new(client: LeadApiClient, cache: Option<SearchCache>, per_page: usize) -> Self {
        Self {
            client,
            cache,
            per_page,
        }
    }

    pub fn cache(&self) -> Option<&SearchCache> {
        self.cache.as_ref()
    }

    /// Filtered upstream records for `filters`, served from the cache when possible.
    /// The boolean is true on a cache hit.
    pub async fn fetch_filtered(&self, filters: &FilterSet) -> (FetchResult, bool) {
        let filters = filters.normalized();

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&filters).await {
                info!("Serving {} leads from cache", cached.total);
                return (cached, true);
            }
        }

        let payload = build_request(&filters);
        let fetched = self.client.fetch(&payload).await;
        if !fetched.success {
            return (fetched, false);
        }

        let fetched_count = fetched.results.len();
        let filtered = FetchResult::ok(apply_local_filters(fetched.results, &filters));
        info!(
            "Local filtering kept {} of {} leads",
            filtered.total, fetched_count
        );

        if let Some(cache) = &self.cache {
            cache.set(&filters, &filtered).await;
        }

        (filtered, false)
    }

    pub async fn search(&self, filters: &FilterSet, page: Option<&str>) -> SearchOutcome {
        let (result, from_cache) = self.fetch_filtered(filters).await;

        let leads = if result.success {
            parse_batch(&result.results)
        } else {
            Vec::new()
        };
        let total_results = leads.len();
        let (leads, pagination) = paginate(leads, page, self.per_page);

        SearchOutcome {
            success: result.success,
            error: result.error,
            error_kind: result.error_kind,
            leads,
            total_results,
            pagination,
            from_cache,
        }
    }

    /// Forget cached searches, e.g. after leads were saved
    pub async fn invalidate_cache(&self) -> usize {
        match &self.cache {
            Some(cache) => cache.invalidate_all().await,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn first_page_by_default() {
        let (items, info) = paginate(numbers(60), None, 25);
        assert_eq!(items.len(), 25);
        assert_eq!(items[0], 1);
        assert_eq!(info.page, 1);
        assert_eq!(info.num_pages, 3);
        assert!(info.has_next);
        assert!(!info.has_previous);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let (items, info) = paginate(numbers(60), Some("3"), 25);
        assert_eq!(items, (51..=60).collect::<Vec<_>>());
        assert!(!info.has_next);
        assert!(info.has_previous);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let (_, info) = paginate(numbers(60), Some("99"), 25);
        assert_eq!(info.page, 3);

        let (_, info) = paginate(numbers(60), Some("0"), 25);
        assert_eq!(info.page, 1);

        let (_, info) = paginate(numbers(60), Some("-4"), 25);
        assert_eq!(info.page, 1);
    }

    #[test]
    fn garbage_page_means_first_page() {
        let (items, info) = paginate(numbers(10), Some("two"), 25);
        assert_eq!(items.len(), 10);
        assert_eq!(info.page, 1);
    }

    #[test]
    fn empty_results_have_one_page() {
        let (items, info) = paginate(Vec::<usize>::new(), Some("2"), 25);
        assert!(items.is_empty());
        assert_eq!(info.page, 1);
        assert_eq!(info.num_pages, 1);
    }
}
