// src/web/types.rs
use rocket::form::FromForm;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

use crate::core::database::{LeadList, StoredLead};
use crate::core::Database;
use crate::lead_search::{FilterSet, ParsedLead, SearchService};

/// Shared state handed to every route
pub struct AppState {
    pub db: Database,
    pub search: SearchService,
}

pub struct CsvResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl CsvResponse {
    pub fn with_filename(data: Vec<u8>, filename: String) -> Self {
        Self { data, filename }
    }
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

// ===== Requests =====

/// Query string of `GET /leads/search`
#[derive(Debug, Default, FromForm)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub industry: Option<String>,
    pub seniority_level: Option<String>,
    pub company_size: Option<String>,
    pub keywords: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl SearchQuery {
    pub fn filters(&self) -> FilterSet {
        FilterSet {
            name: self.name.clone(),
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            country: self.country.clone(),
            region: self.region.clone(),
            industry: self.industry.clone(),
            seniority_level: self.seniority_level.clone(),
            company_size: self.company_size.clone(),
            keywords: self.keywords.clone(),
            limit: self.limit.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CreateListRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct AddToListRequest {
    pub lead: ParsedLead,
    pub list_name: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct BulkAddRequest {
    pub leads: Vec<ParsedLead>,
    pub list_name: String,
}

// ===== Responses =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct LeadDetail {
    #[serde(flatten)]
    pub lead: StoredLead,
    pub lists: Vec<LeadList>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

/// Error body together with the status it is served with
pub type ApiError = (Status, Json<StandardErrorResponse>);

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: &str) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action: action.to_string(),
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: &str, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code: error_code.to_string(),
            suggestions,
        }
    }
}

pub fn api_error(status: Status, error: String, error_code: &str, suggestions: &[&str]) -> ApiError {
    (
        status,
        Json(StandardErrorResponse::new(
            error,
            error_code,
            suggestions.iter().map(|s| s.to_string()).collect(),
        )),
    )
}

/// Leads are keyed by their upstream id; a blank one cannot be stored
pub fn validate_external_id(lead: &ParsedLead) -> Result<(), ApiError> {
    if lead.external_id.trim().is_empty() {
        return Err(api_error(
            Status::BadRequest,
            "external_id is required".to_string(),
            "VALIDATION_ERROR",
            &["Provide the upstream id of the lead"],
        ));
    }
    Ok(())
}

pub fn database_error(e: anyhow::Error) -> ApiError {
    tracing::error!("Database operation failed: {:#}", e);
    api_error(
        Status::InternalServerError,
        "Database operation failed".to_string(),
        "DATABASE_ERROR",
        &["Try again in a few moments"],
    )
}
