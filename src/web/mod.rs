// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

use crate::core::database::{BulkAddResult, LeadList, LeadListWithLeads, StoredLead};
use crate::core::{ConfigManager, Database, SearchCache};
use crate::lead_search::{LeadApiClient, ParsedLead, SearchOutcome, SearchService};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Leads

#[get("/leads/search?<query..>")]
pub async fn search_leads(
    query: SearchQuery,
    state: &State<AppState>,
) -> (Status, Json<SearchOutcome>) {
    handlers::search_leads_handler(query, state).await
}

#[post("/leads", data = "<lead>")]
pub async fn create_lead(
    lead: Json<ParsedLead>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<StoredLead>>, ApiError> {
    handlers::create_lead_handler(lead, state).await
}

#[get("/leads/<id>")]
pub async fn get_lead(
    id: i64,
    state: &State<AppState>,
) -> Result<Json<DataResponse<LeadDetail>>, ApiError> {
    handlers::get_lead_handler(id, state).await
}

// Lists

#[get("/lists")]
pub async fn get_lists(
    state: &State<AppState>,
) -> Result<Json<DataResponse<Vec<LeadListWithLeads>>>, ApiError> {
    handlers::get_lists_handler(state).await
}

#[post("/lists", data = "<request>")]
pub async fn create_list(
    request: Json<CreateListRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<LeadList>>, ApiError> {
    handlers::create_list_handler(request, state).await
}

#[delete("/lists/<id>")]
pub async fn delete_list(id: i64, state: &State<AppState>) -> Result<Json<ActionResponse>, ApiError> {
    handlers::delete_list_handler(id, state).await
}

#[post("/lists/add", data = "<request>")]
pub async fn add_to_list(
    request: Json<AddToListRequest>,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::add_to_list_handler(request, state).await
}

#[post("/lists/bulk-add", data = "<request>")]
pub async fn bulk_add(
    request: Json<BulkAddRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<BulkAddResult>>, ApiError> {
    handlers::bulk_add_handler(request, state).await
}

#[delete("/lists/<list_id>/leads/<lead_id>")]
pub async fn remove_from_list(
    list_id: i64,
    lead_id: i64,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::remove_from_list_handler(list_id, lead_id, state).await
}

#[get("/lists/<id>/export")]
pub async fn export_list(id: i64, state: &State<AppState>) -> Result<CsvResponse, ApiError> {
    handlers::export_list_handler(id, state).await
}

#[get("/health")]
pub async fn health(state: &State<AppState>) -> Result<Json<TextResponse>, ApiError> {
    handlers::health_handler(state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST",
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND",
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be understood".to_string(),
        "VALIDATION_ERROR",
        vec!["Verify field names and types".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR",
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Open the database and wire the search pipeline from configuration
pub async fn build_state(config: &ConfigManager) -> Result<AppState> {
    let db = Database::new(&config.environment.database_path)
        .await
        .context("Failed to open lead database")?;

    let client = LeadApiClient::new(&config.upstream)?;
    let cache = config
        .cache
        .enabled
        .then(|| SearchCache::new(config.cache.ttl()));
    let search = SearchService::new(client, cache, config.server.leads_per_page);

    Ok(AppState { db, search })
}

/// Rocket instance with every route, catcher and fairing attached
pub fn build_rocket(state: AppState, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                search_leads,
                create_lead,
                get_lead,
                get_lists,
                create_list,
                delete_list,
                add_to_list,
                bulk_add,
                remove_from_list,
                export_list,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: &ConfigManager) -> Result<()> {
    config.ensure_directories().await?;
    let state = build_state(config).await?;

    info!("Starting Lead Finder API server");
    info!("Environment: {}", config.environment.name);
    info!("Database: {}", config.environment.database_path.display());
    info!("Upstream: {}", config.upstream.api_url);
    info!("Server: http://0.0.0.0:{}", config.server.port);

    let _rocket = build_rocket(state, config.server.port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    Ok(())
}
