// src/web/handlers/search_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::core::LeadService;
use crate::lead_search::{FetchErrorKind, ParsedLead, SearchOutcome};
use crate::web::types::{
    api_error, database_error, validate_external_id, ApiError, AppState, DataResponse, LeadDetail,
    SearchQuery,
};

fn status_for(kind: Option<FetchErrorKind>) -> Status {
    match kind {
        None => Status::Ok,
        Some(FetchErrorKind::UpstreamTimeout) => Status::GatewayTimeout,
        Some(_) => Status::BadGateway,
    }
}

pub async fn search_leads_handler(
    query: SearchQuery,
    state: &State<AppState>,
) -> (Status, Json<SearchOutcome>) {
    let filters = query.filters();
    info!("Lead search: {:?}", filters.normalized());

    let outcome = state.search.search(&filters, query.page.as_deref()).await;
    (status_for(outcome.error_kind), Json(outcome))
}

pub async fn create_lead_handler(
    lead: Json<ParsedLead>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<crate::core::database::StoredLead>>, ApiError> {
    validate_external_id(&lead)?;

    let service = LeadService::new(state.db.pool());
    let stored = service
        .create_or_update_lead(&lead)
        .await
        .map_err(database_error)?;
    state.search.invalidate_cache().await;

    Ok(Json(DataResponse::success(
        format!("Lead {} saved", stored.lead.full_name),
        stored,
    )))
}

pub async fn get_lead_handler(
    id: i64,
    state: &State<AppState>,
) -> Result<Json<DataResponse<LeadDetail>>, ApiError> {
    let service = LeadService::new(state.db.pool());

    let lead = service
        .leads()
        .find_by_id(id)
        .await
        .map_err(database_error)?
        .ok_or_else(|| {
            api_error(
                Status::NotFound,
                format!("Lead {} not found", id),
                "LEAD_NOT_FOUND",
                &["Save the lead before looking it up"],
            )
        })?;

    let lists = service
        .lists()
        .lists_for_lead(id)
        .await
        .map_err(database_error)?;

    Ok(Json(DataResponse::success(
        "Lead retrieved".to_string(),
        LeadDetail { lead, lists },
    )))
}
