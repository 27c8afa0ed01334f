// src/web/handlers/list_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

use crate::core::database::{BulkAddResult, LeadList, LeadListWithLeads};
use crate::core::export::{export_file_name, export_leads_csv};
use crate::core::LeadService;
use crate::web::types::{
    api_error, database_error, validate_external_id, ActionResponse, AddToListRequest, ApiError,
    AppState, BulkAddRequest, CreateListRequest, CsvResponse, DataResponse,
};

pub async fn get_lists_handler(
    state: &State<AppState>,
) -> Result<Json<DataResponse<Vec<LeadListWithLeads>>>, ApiError> {
    let lists = LeadService::new(state.db.pool())
        .all_lists_with_leads()
        .await
        .map_err(database_error)?;

    Ok(Json(DataResponse::success(
        format!("{} lists", lists.len()),
        lists,
    )))
}

pub async fn create_list_handler(
    request: Json<CreateListRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<LeadList>>, ApiError> {
    let (outcome, list) = LeadService::new(state.db.pool())
        .create_list(&request.name, &request.description)
        .await
        .map_err(database_error)?;

    match list {
        Some(list) => Ok(Json(DataResponse::success(outcome.message, list))),
        None if request.name.trim().is_empty() => Err(api_error(
            Status::BadRequest,
            outcome.message,
            "VALIDATION_ERROR",
            &["Provide a non-empty list name"],
        )),
        None => Err(api_error(
            Status::Conflict,
            outcome.message,
            "LIST_EXISTS",
            &["Choose another name or add leads to the existing list"],
        )),
    }
}

pub async fn delete_list_handler(
    id: i64,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let outcome = LeadService::new(state.db.pool())
        .delete_list(id)
        .await
        .map_err(database_error)?;

    if outcome.success {
        Ok(Json(ActionResponse::success(outcome.message, "list_deleted")))
    } else {
        Err(api_error(
            Status::NotFound,
            outcome.message,
            "LIST_NOT_FOUND",
            &["Check the list id"],
        ))
    }
}

pub async fn add_to_list_handler(
    request: Json<AddToListRequest>,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let request = request.into_inner();
    if request.list_name.trim().is_empty() {
        return Err(api_error(
            Status::BadRequest,
            "List name is required".to_string(),
            "VALIDATION_ERROR",
            &["Provide the name of the target list"],
        ));
    }
    validate_external_id(&request.lead)?;

    let service = LeadService::new(state.db.pool());
    let stored = service
        .create_or_update_lead(&request.lead)
        .await
        .map_err(database_error)?;
    state.search.invalidate_cache().await;

    let outcome = service
        .add_lead_to_list(stored.id, &request.list_name, &request.notes)
        .await
        .map_err(database_error)?;

    if outcome.success {
        Ok(Json(ActionResponse::success(outcome.message, "lead_added")))
    } else {
        Err(api_error(
            Status::Conflict,
            outcome.message,
            "ALREADY_IN_LIST",
            &["The lead is already part of this list"],
        ))
    }
}

pub async fn bulk_add_handler(
    request: Json<BulkAddRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<BulkAddResult>>, ApiError> {
    let request = request.into_inner();
    if request.list_name.trim().is_empty() {
        return Err(api_error(
            Status::BadRequest,
            "List name is required".to_string(),
            "VALIDATION_ERROR",
            &["Provide the name of the target list"],
        ));
    }

    let service = LeadService::new(state.db.pool());
    let mut lead_ids = Vec::with_capacity(request.leads.len());
    let mut rejected = 0;
    for lead in &request.leads {
        if lead.external_id.trim().is_empty() {
            warn!("Skipping lead without external_id: {}", lead.full_name);
            rejected += 1;
            continue;
        }
        match service.create_or_update_lead(lead).await {
            Ok(stored) => lead_ids.push(stored.id),
            Err(e) => {
                tracing::error!("Error saving lead {}: {:#}", lead.external_id, e);
                rejected += 1;
            }
        }
    }
    state.search.invalidate_cache().await;

    let mut result = service
        .bulk_add_leads_to_list(&lead_ids, &request.list_name)
        .await
        .map_err(database_error)?;
    result.errors += rejected;
    result.total += rejected;

    info!(
        "Bulk add to '{}': {} added, {} skipped, {} errors",
        request.list_name, result.added, result.skipped, result.errors
    );

    Ok(Json(DataResponse::success(
        format!("Added {} leads to '{}'", result.added, request.list_name),
        result,
    )))
}

pub async fn remove_from_list_handler(
    list_id: i64,
    lead_id: i64,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let outcome = LeadService::new(state.db.pool())
        .remove_lead_from_list(lead_id, list_id)
        .await
        .map_err(database_error)?;

    if outcome.success {
        Ok(Json(ActionResponse::success(outcome.message, "lead_removed")))
    } else {
        Err(api_error(
            Status::NotFound,
            outcome.message,
            "NOT_IN_LIST",
            &["Check the list and lead ids"],
        ))
    }
}

pub async fn export_list_handler(id: i64, state: &State<AppState>) -> Result<CsvResponse, ApiError> {
    let service = LeadService::new(state.db.pool());
    let list = service
        .lists()
        .find_by_id(id)
        .await
        .map_err(database_error)?
        .ok_or_else(|| {
            api_error(
                Status::NotFound,
                "List not found".to_string(),
                "LIST_NOT_FOUND",
                &["Check the list id"],
            )
        })?;

    let leads = service.leads_in_list(id).await.map_err(database_error)?;

    let mut buffer = Vec::new();
    export_leads_csv(&mut buffer, leads.iter().map(|l| &l.lead.lead)).map_err(|e| {
        tracing::error!("CSV export failed for list {}: {:#}", id, e);
        api_error(
            Status::InternalServerError,
            "CSV export failed".to_string(),
            "EXPORT_ERROR",
            &["Try again in a few moments"],
        )
    })?;

    info!("Exported {} leads from list '{}'", leads.len(), list.name);
    Ok(CsvResponse::with_filename(buffer, export_file_name(&list.slug)))
}
