pub mod cli;
pub mod core;
pub mod lead_search;
pub mod utils;
pub mod web;

pub use crate::core::{ConfigManager, Database, LeadService, SearchCache};
pub use crate::lead_search::{FilterSet, ParsedLead, SearchOutcome, SearchService};
pub use crate::web::{build_rocket, start_web_server};
