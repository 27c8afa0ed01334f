// src/lead_search/local_filter.rs
//! Client-side re-filtering of upstream results.
//!
//! The upstream honours at most one structured filter and ignores several others
//! entirely, so every constraint the user asked for is checked again here. Each
//! active filter walks the working set once; filters compose as a logical AND.

use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::filters::FilterSet;
use super::request_builder::{select_priority_filter, PriorityFilter};
use super::seniority::SeniorityLevel;
use super::types::{fields, RawLeadRecord};

/// Region spellings users type, mapped onto the upstream vocabulary
const REGION_SYNONYMS: &[(&str, &str)] = &[("north america", "northern america")];

fn normalize_region(region: &str) -> String {
    let region = region.trim().to_lowercase();
    REGION_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == region)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(region)
}

fn tokens(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn contains_ci(record: &RawLeadRecord, field: &str, needle: &str) -> bool {
    record.text(field).to_lowercase().contains(needle)
}

fn full_name_haystack(record: &RawLeadRecord) -> String {
    format!(
        "{} {}",
        record.text(fields::NAME),
        record.text(fields::SURNAME)
    )
    .to_lowercase()
}

fn keyword_haystack(record: &RawLeadRecord) -> String {
    [
        fields::SKILLS,
        fields::HEADLINE,
        fields::POSITION,
        fields::BIO,
        fields::COMPANY_INDUSTRY,
        fields::COMPANY_NAME,
    ]
    .iter()
    .map(|field| record.text(field))
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

fn retain_logged<F>(records: Vec<RawLeadRecord>, label: &str, query: &str, keep: F) -> Vec<RawLeadRecord>
where
    F: Fn(&RawLeadRecord) -> bool,
{
    let before = records.len();
    let kept: Vec<RawLeadRecord> = records.into_iter().filter(|r| keep(r)).collect();
    debug!("{} filter '{}': {} -> {} leads", label, query, before, kept.len());
    kept
}

fn sample_values(records: &[RawLeadRecord], field_names: &[&str]) -> BTreeSet<String> {
    records
        .iter()
        .take(10)
        .map(|r| {
            field_names
                .iter()
                .map(|f| r.text(f).into_owned())
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect()
}

pub fn apply_local_filters(records: Vec<RawLeadRecord>, filters: &FilterSet) -> Vec<RawLeadRecord> {
    if filters.is_unconstrained() {
        return records;
    }

    let original_count = records.len();
    let mut filtered = records;

    if let Some(name) = filters.name() {
        let query_tokens = tokens(name);
        filtered = retain_logged(filtered, "Name", name, |lead| {
            let haystack = full_name_haystack(lead);
            query_tokens.iter().all(|token| haystack.contains(token.as_str()))
        });
    }

    if let Some(title) = filters.title() {
        let needle = title.to_lowercase();
        filtered = retain_logged(filtered, "Title", title, |lead| {
            contains_ci(lead, fields::POSITION, &needle)
        });
    }

    if let Some(company) = filters.company() {
        let needle = company.to_lowercase();
        filtered = retain_logged(filtered, "Company", company, |lead| {
            contains_ci(lead, fields::COMPANY_NAME, &needle)
        });
    }

    if let Some(location) = filters.location() {
        let needle = location.to_lowercase();
        let samples = sample_values(&filtered, &[fields::UPSTREAM_COUNTRY_FIELD]);
        filtered = retain_logged(filtered, "Location", location, |lead| {
            contains_ci(lead, fields::UPSTREAM_COUNTRY_FIELD, &needle)
        });
        if filtered.is_empty() && !samples.is_empty() {
            warn!(
                "Location filter '{}' found 0 results. Sample locations in data: {:?}",
                location, samples
            );
        }
    }

    if let Some(region) = filters.region() {
        let needle = normalize_region(region);
        let samples = sample_values(
            &filtered,
            &[fields::UPSTREAM_REGION_FIELD, fields::UPSTREAM_COUNTRY_FIELD],
        );
        filtered = retain_logged(filtered, "Region", &needle, |lead| {
            contains_ci(lead, fields::UPSTREAM_REGION_FIELD, &needle)
                || contains_ci(lead, fields::UPSTREAM_COUNTRY_FIELD, &needle)
        });
        if filtered.is_empty() && !samples.is_empty() {
            warn!(
                "Region filter '{}' found 0 results. Sample region|location in data: {:?}",
                needle, samples
            );
        }
    }

    if let Some(code) = filters.seniority_level() {
        let wanted = code.to_lowercase();
        filtered = retain_logged(filtered, "Seniority", code, |lead| {
            SeniorityLevel::from_api_level(&lead.text(fields::LEVEL))
                .map(|level| level.code() == wanted)
                .unwrap_or(false)
        });
    }

    if let Some(size) = filters.company_size() {
        filtered = retain_logged(filtered, "Company size", size, |lead| {
            lead.text(fields::COMPANY_HEADCOUNT) == size
        });
    }

    // Already applied upstream when it was the one filter on the wire
    if let Some(industry) = filters.industry() {
        if select_priority_filter(filters) != Some(PriorityFilter::Industry) {
            let needle = industry.to_lowercase();
            filtered = retain_logged(filtered, "Industry", industry, |lead| {
                contains_ci(lead, fields::COMPANY_INDUSTRY, &needle)
            });
        }
    }

    if let Some(keywords) = filters.keywords() {
        let keyword_tokens = tokens(keywords);
        filtered = retain_logged(filtered, "Keywords", keywords, |lead| {
            let haystack = keyword_haystack(lead);
            keyword_tokens.iter().all(|token| haystack.contains(token.as_str()))
        });
    }

    info!(
        "Local filtering complete: {} -> {} leads",
        original_count,
        filtered.len()
    );

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawLeadRecord {
        RawLeadRecord::try_from(value).unwrap()
    }

    fn john_doe() -> RawLeadRecord {
        record(json!({
            "name": "John",
            "surname": "Doe",
            "position": "Software Engineer",
            "company_name": "Tech Corp",
            "location": "United States",
            "region": "Northern America",
            "level": "Senior"
        }))
    }

    fn sample() -> Vec<RawLeadRecord> {
        vec![
            john_doe(),
            record(json!({
                "id": 2,
                "name": "Maria",
                "surname": "Garcia",
                "position": "Head of Sales",
                "company_name": "Iberia Build",
                "location": "Spain",
                "region": "Southern Europe",
                "level": "Director",
                "company_industry": "Construction",
                "company_headcount": "51-200 employees",
                "skills": "Negotiation, CRM",
                "headline": "Growing construction sales"
            })),
            record(json!({
                "id": 3,
                "name": "Ana",
                "surname": "Lopez",
                "position": "Data Engineer",
                "company_name": "Tech Corp",
                "location": "Mexico",
                "region": "Latin America",
                "level": "Sr",
                "company_industry": "Software Development",
                "company_headcount": "1-10 employees",
                "skills": "Python, Spark"
            })),
        ]
    }

    fn names(records: &[RawLeadRecord]) -> Vec<String> {
        records.iter().map(|r| r.text("name").into_owned()).collect()
    }

    #[test]
    fn empty_filters_are_identity() {
        let records = sample();
        assert_eq!(apply_local_filters(records.clone(), &FilterSet::new()), records);
    }

    #[test]
    fn blank_values_are_no_ops() {
        let records = sample();
        let filters = FilterSet::new().with_title("  ").with_keywords("");
        assert_eq!(apply_local_filters(records.clone(), &filters), records);
    }

    #[test]
    fn title_matches_position_substring() {
        let result = apply_local_filters(vec![john_doe()], &FilterSet::new().with_title("engineer"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text("surname"), "Doe");
    }

    #[test]
    fn unknown_name_yields_nothing() {
        let result = apply_local_filters(vec![john_doe()], &FilterSet::new().with_name("NonExistent"));
        assert!(result.is_empty());
    }

    #[test]
    fn name_tokens_use_and_semantics_in_any_order() {
        let matched = apply_local_filters(vec![john_doe()], &FilterSet::new().with_name("doe john"));
        assert_eq!(matched.len(), 1);

        let unmatched = apply_local_filters(vec![john_doe()], &FilterSet::new().with_name("doe jane"));
        assert!(unmatched.is_empty());
    }

    #[test]
    fn region_synonym_matches_northern_america() {
        let result = apply_local_filters(sample(), &FilterSet::new().with_region("North America"));
        assert_eq!(names(&result), vec!["John"]);
    }

    #[test]
    fn region_also_checks_the_location_field() {
        let result = apply_local_filters(sample(), &FilterSet::new().with_region("spain"));
        assert_eq!(names(&result), vec!["Maria"]);
    }

    #[test]
    fn seniority_goes_through_the_level_table() {
        let senior = apply_local_filters(sample(), &FilterSet::new().with_seniority_level("senior"));
        assert_eq!(names(&senior), vec!["John", "Ana"]);

        let mid = apply_local_filters(sample(), &FilterSet::new().with_seniority_level("mid"));
        assert!(mid.is_empty());
    }

    #[test]
    fn company_size_is_exact() {
        let exact = apply_local_filters(
            sample(),
            &FilterSet::new().with_company_size("51-200 employees"),
        );
        assert_eq!(names(&exact), vec!["Maria"]);

        let partial = apply_local_filters(sample(), &FilterSet::new().with_company_size("51-200"));
        assert!(partial.is_empty());
    }

    #[test]
    fn industry_is_checked_locally_when_another_filter_went_upstream() {
        let filters = FilterSet::new().with_title("engineer").with_industry("software");
        assert_eq!(names(&apply_local_filters(sample(), &filters)), vec!["Ana"]);
    }

    #[test]
    fn industry_is_trusted_when_it_was_the_upstream_filter() {
        let filters = FilterSet::new().with_industry("software");
        assert_eq!(apply_local_filters(sample(), &filters).len(), 3);
    }

    #[test]
    fn keywords_search_across_profile_fields() {
        let result = apply_local_filters(sample(), &FilterSet::new().with_keywords("crm construction"));
        assert_eq!(names(&result), vec!["Maria"]);

        let result = apply_local_filters(sample(), &FilterSet::new().with_keywords("python tech"));
        assert_eq!(names(&result), vec!["Ana"]);

        let result = apply_local_filters(sample(), &FilterSet::new().with_keywords("python crm"));
        assert!(result.is_empty());
    }

    #[test]
    fn filters_compose_as_and() {
        let filters = FilterSet::new()
            .with_company("tech corp")
            .with_location("united");
        assert_eq!(names(&apply_local_filters(sample(), &filters)), vec!["John"]);
    }

    #[test]
    fn zero_matches_are_not_restored() {
        let filters = FilterSet::new().with_location("Germany").with_company("Tech");
        assert!(apply_local_filters(sample(), &filters).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let filters = FilterSet::new()
            .with_title("engineer")
            .with_seniority_level("senior")
            .with_keywords("spark");
        let once = apply_local_filters(sample(), &filters);
        let twice = apply_local_filters(once.clone(), &filters);
        assert_eq!(once, twice);
        assert_eq!(names(&once), vec!["Ana"]);
    }

    #[test]
    fn numeric_fields_are_matched_as_text() {
        let records = vec![record(json!({"name": "Bo", "company_headcount": 10}))];
        let result = apply_local_filters(records, &FilterSet::new().with_company_size("10"));
        assert_eq!(result.len(), 1);
    }
}
