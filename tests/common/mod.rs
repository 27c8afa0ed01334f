//! Deterministic synthetic upstream records for integration tests
#![allow(dead_code)]

use serde_json::{json, Value};

const FIRST_NAMES: [&str; 6] = ["John", "Maria", "Wei", "Amara", "Lukas", "Sofia"];
const LAST_NAMES: [&str; 5] = ["Doe", "Garcia", "Chen", "Okafor", "Schmidt"];
const POSITIONS: [&str; 4] = [
    "Chief Technology Officer",
    "Head of Sales",
    "Senior Software Engineer",
    "Marketing Manager",
];
const LEVELS: [&str; 4] = ["CTO", "Head", "Senior", "Manager"];
const COUNTRIES: [(&str, &str); 3] = [
    ("United States", "Northern America"),
    ("Germany", "Western Europe"),
    ("Brazil", "South America"),
];
const INDUSTRIES: [&str; 3] = ["Software Development", "Financial Services", "Construction"];
const HEADCOUNTS: [&str; 3] = ["1-10 employees", "11-50 employees", "201-500 employees"];

/// One upstream record; the same index always yields the same record
pub fn lead_record(index: usize) -> Value {
    let (country, region) = COUNTRIES[index % COUNTRIES.len()];
    let first = FIRST_NAMES[index % FIRST_NAMES.len()];
    let last = LAST_NAMES[index % LAST_NAMES.len()];
    json!({
        "id": 1000 + index,
        "name": first,
        "surname": last,
        "linkedin": format!("linkedin.com/in/{}-{}-{}", first.to_lowercase(), last.to_lowercase(), index),
        "location": country,
        "region": region,
        "position": POSITIONS[index % POSITIONS.len()],
        "level": LEVELS[index % LEVELS.len()],
        "department": "Engineering",
        "skills": "Rust, Leadership",
        "headline": format!("{} at Company {}", POSITIONS[index % POSITIONS.len()], index),
        "company_name": format!("Company {}", index),
        "company_domain": format!("company{}.example", index),
        "company_linkedin": format!("https://linkedin.com/company/company-{}", index),
        "company_location": country,
        "company_industry": INDUSTRIES[index % INDUSTRIES.len()],
        "company_subindustry": "",
        "company_headcount": HEADCOUNTS[index % HEADCOUNTS.len()],
        "company_founded": 2000 + (index % 20),
        "company_revenue": "$1M-$10M"
    })
}

pub fn lead_records(count: usize) -> Vec<Value> {
    (0..count).map(lead_record).collect()
}

/// Response body in the upstream envelope
pub fn results_body(records: &[Value]) -> String {
    json!({ "results": records }).to_string()
}
