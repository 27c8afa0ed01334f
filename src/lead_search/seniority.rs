// src/lead_search/seniority.rs
//! Seniority vocabulary shared by the request builder, the local filter and the parser.
//!
//! Three tables meet here: our internal codes (`c_level`), the strings the upstream
//! service accepts as a `level` filter ("C-Level"), and the free-form levels found on
//! upstream records ("CEO", "Sr", "Vice President").

use serde::{Deserialize, Serialize};

use crate::utils::title_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SeniorityLevel {
    Entry,
    Mid,
    Senior,
    Specialist,
    Manager,
    Director,
    Head,
    Vp,
    CLevel,
    Owner,
    Partner,
    Intern,
}

impl SeniorityLevel {
    pub const ALL: [SeniorityLevel; 12] = [
        SeniorityLevel::Entry,
        SeniorityLevel::Mid,
        SeniorityLevel::Senior,
        SeniorityLevel::Specialist,
        SeniorityLevel::Manager,
        SeniorityLevel::Director,
        SeniorityLevel::Head,
        SeniorityLevel::Vp,
        SeniorityLevel::CLevel,
        SeniorityLevel::Owner,
        SeniorityLevel::Partner,
        SeniorityLevel::Intern,
    ];

    pub fn code(self) -> &'static str {
        match self {
            SeniorityLevel::Entry => "entry",
            SeniorityLevel::Mid => "mid",
            SeniorityLevel::Senior => "senior",
            SeniorityLevel::Specialist => "specialist",
            SeniorityLevel::Manager => "manager",
            SeniorityLevel::Director => "director",
            SeniorityLevel::Head => "head",
            SeniorityLevel::Vp => "vp",
            SeniorityLevel::CLevel => "c_level",
            SeniorityLevel::Owner => "owner",
            SeniorityLevel::Partner => "partner",
            SeniorityLevel::Intern => "intern",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(code))
    }

    /// Upstream `level` filter value, for the codes the upstream vocabulary knows
    pub fn upstream_label(self) -> Option<&'static str> {
        match self {
            SeniorityLevel::Entry => Some("Entry Level"),
            SeniorityLevel::Mid => Some("Mid Level"),
            SeniorityLevel::Senior => Some("Senior"),
            SeniorityLevel::Manager => Some("Manager"),
            SeniorityLevel::Director => Some("Director"),
            SeniorityLevel::Vp => Some("VP"),
            SeniorityLevel::CLevel => Some("C-Level"),
            SeniorityLevel::Owner => Some("Owner"),
            SeniorityLevel::Partner => Some("Partner"),
            SeniorityLevel::Specialist | SeniorityLevel::Head | SeniorityLevel::Intern => None,
        }
    }

    /// Human label used in exports
    pub fn display_label(self) -> &'static str {
        match self {
            SeniorityLevel::Entry => "Entry Level",
            SeniorityLevel::Mid => "Mid Level",
            SeniorityLevel::Senior => "Senior",
            SeniorityLevel::Specialist => "Specialist",
            SeniorityLevel::Manager => "Manager",
            SeniorityLevel::Director => "Director",
            SeniorityLevel::Head => "Head",
            SeniorityLevel::Vp => "VP",
            SeniorityLevel::CLevel => "C-Level",
            SeniorityLevel::Owner => "Owner",
            SeniorityLevel::Partner => "Partner",
            SeniorityLevel::Intern => "Intern",
        }
    }

    /// Map a free-form upstream `level` string onto a code.
    ///
    /// Matching is exact after trimming and lowercasing; anything outside the table
    /// yields `None` rather than a guess.
    pub fn from_api_level(api_level: &str) -> Option<Self> {
        let level = api_level.trim().to_lowercase();
        let mapped = match level.as_str() {
            "entry" | "entry level" | "junior" => SeniorityLevel::Entry,
            "intern" => SeniorityLevel::Intern,
            "mid" | "mid level" | "intermediate" => SeniorityLevel::Mid,
            "senior" | "sr" | "senior level" => SeniorityLevel::Senior,
            "specialist" => SeniorityLevel::Specialist,
            "manager" | "mgr" => SeniorityLevel::Manager,
            "head" => SeniorityLevel::Head,
            "director" | "dir" => SeniorityLevel::Director,
            "vp" | "vice president" => SeniorityLevel::Vp,
            "c-level" | "c level" | "executive" | "ceo" | "cto" | "cfo" | "coo" | "cmo" => {
                SeniorityLevel::CLevel
            }
            "owner" | "founder" => SeniorityLevel::Owner,
            "partner" => SeniorityLevel::Partner,
            _ => return None,
        };
        Some(mapped)
    }
}

/// Upstream `level` value for a requested code; unknown codes are title-cased
pub fn upstream_level_for_code(code: &str) -> String {
    SeniorityLevel::from_code(code)
        .and_then(SeniorityLevel::upstream_label)
        .map(str::to_string)
        .unwrap_or_else(|| title_case(code.trim()))
}
