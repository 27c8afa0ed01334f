// src/lead_search/parser.rs
use tracing::error;

use super::seniority::SeniorityLevel;
use super::types::{fields, ParseError, ParsedLead, RawLeadRecord};
use crate::utils::normalize_url;

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Map one upstream record onto a [`ParsedLead`].
///
/// No field is required. The upstream location/region pair is kept as the
/// upstream names it: upstream `location` (a country name) lands in
/// `location`, upstream `region` lands in both `country` and `region`.
/// Downstream consumers rely on that mapping.
pub fn parse(raw: &RawLeadRecord) -> Result<ParsedLead, ParseError> {
    let first_name = raw.scalar(fields::NAME)?.trim().to_string();
    let last_name = raw.scalar(fields::SURNAME)?.trim().to_string();
    let full_name = format!("{} {}", first_name, last_name).trim().to_string();

    let level = raw.scalar(fields::LEVEL)?;
    let headline = raw.scalar(fields::HEADLINE)?;
    let upstream_region = raw.scalar(fields::UPSTREAM_REGION_FIELD)?;

    Ok(ParsedLead {
        external_id: raw.scalar(fields::ID)?,
        first_name,
        last_name,
        full_name,
        email: optional(raw.scalar(fields::EMAIL)?),
        phone: optional(raw.scalar(fields::PHONE)?),
        linkedin_url: normalize_url(&raw.scalar(fields::LINKEDIN)?),
        photo_url: None,

        current_title: raw.scalar(fields::POSITION)?,
        current_company: raw.scalar(fields::COMPANY_NAME)?,
        company_linkedin_url: raw.scalar(fields::COMPANY_LINKEDIN)?,
        headline: headline.clone(),
        seniority_level: SeniorityLevel::from_api_level(&level),
        level,
        department: raw.scalar(fields::DEPARTMENT)?,

        location: raw.scalar(fields::UPSTREAM_COUNTRY_FIELD)?,
        country: upstream_region.clone(),
        region: upstream_region,

        industry: raw.scalar(fields::COMPANY_INDUSTRY)?,
        company_size: raw.scalar(fields::COMPANY_HEADCOUNT)?,
        company_domain: raw.scalar(fields::COMPANY_DOMAIN)?,
        company_location: raw.scalar(fields::COMPANY_LOCATION)?,
        company_founded: raw.scalar(fields::COMPANY_FOUNDED)?,
        company_revenue: raw.scalar(fields::COMPANY_REVENUE)?,
        company_subindustry: raw.scalar(fields::COMPANY_SUBINDUSTRY)?,

        skills: raw.scalar(fields::SKILLS)?,
        bio: headline,
    })
}

/// Parse every record, logging and dropping the ones that fail
pub fn parse_batch(raw_leads: &[RawLeadRecord]) -> Vec<ParsedLead> {
    raw_leads
        .iter()
        .filter_map(|raw| match parse(raw) {
            Ok(lead) => Some(lead),
            Err(e) => {
                error!(
                    "Error parsing lead {}: {}",
                    raw.text(fields::ID),
                    e
                );
                None
            }
        })
        .collect()
}
