// src/core/export.rs
//! CSV export of lead lists

use anyhow::{Context, Result};
use std::io::Write;

use crate::lead_search::ParsedLead;

pub const EXPORT_HEADER: [&str; 12] = [
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Job Title",
    "Company",
    "LinkedIn URL",
    "Location",
    "Country",
    "Industry",
    "Seniority Level",
    "Company Size",
];

pub fn export_file_name(slug: &str) -> String {
    format!("{}_export.csv", slug)
}

/// Write the header and one row per lead
pub fn export_leads_csv<'a, W, I>(writer: W, leads: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a ParsedLead>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(EXPORT_HEADER)
        .context("Failed to write CSV header")?;

    let mut rows = 0;
    for lead in leads {
        csv_writer
            .write_record([
                lead.first_name.as_str(),
                lead.last_name.as_str(),
                lead.email.as_deref().unwrap_or(""),
                lead.phone.as_deref().unwrap_or(""),
                lead.current_title.as_str(),
                lead.current_company.as_str(),
                lead.linkedin_url.as_str(),
                lead.location.as_str(),
                lead.country.as_str(),
                lead.industry.as_str(),
                lead.seniority_label(),
                lead.company_size.as_str(),
            ])
            .with_context(|| format!("Failed to write CSV row for lead {}", lead.external_id))?;
        rows += 1;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(rows)
}

/// Render leads to an in-memory CSV document
pub fn export_leads_csv_string<'a, I>(leads: I) -> Result<String>
where
    I: IntoIterator<Item = &'a ParsedLead>,
{
    let mut buffer = Vec::new();
    export_leads_csv(&mut buffer, leads)?;
    String::from_utf8(buffer).context("CSV output is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead_search::SeniorityLevel;

    #[test]
    fn writes_header_and_human_labels() {
        let lead = ParsedLead {
            external_id: "1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: Some("ada@example.com".into()),
            current_title: "Chief Engineer, Analytics".into(),
            current_company: "Engines".into(),
            seniority_level: Some(SeniorityLevel::CLevel),
            company_size: "11-50 employees".into(),
            ..Default::default()
        };

        let csv = export_leads_csv_string([&lead]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "First Name,Last Name,Email,Phone,Job Title,Company,LinkedIn URL,Location,Country,Industry,Seniority Level,Company Size"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Ada,Lovelace,ada@example.com,,\"Chief Engineer, Analytics\",Engines,,,,,C-Level,11-50 employees"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_list_still_has_a_header() {
        let csv = export_leads_csv_string(std::iter::empty::<&ParsedLead>()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn file_name_uses_the_slug() {
        assert_eq!(export_file_name("q3-prospects"), "q3-prospects_export.csv");
    }
}
