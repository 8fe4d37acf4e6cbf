use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{
    dev::Server, get, middleware, web, App, HttpResponse, HttpServer, Responder, ResponseError,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::application::use_cases::dashboard_queries::{
    DEFAULT_HEATMAP_CITIES, DEFAULT_HEATMAP_STATES, DEFAULT_PAGE_LENGTH, DEFAULT_PHONE_STATES,
    DEFAULT_TOP_CITIES, DEFAULT_TOP_STATES,
};
use crate::application::DashboardQueries;
use crate::domain::dataset::DashboardTable;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::dataset::{records_to_csv_bytes, write_csv_file};

const DASHBOARD_HTML: &str = include_str!("../../../assets/dashboard.html");
const DOWNLOAD_NAME: &str = "advocates.csv";

/// Shared, read-only request state
pub struct HttpState {
    pub table: Arc<DashboardTable>,
    pub export_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    pub states: Option<usize>,
    pub cities: Option<usize>,
}

/// DataTables server-side parameters; unknown keys are ignored
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub start: Option<usize>,
    pub length: Option<usize>,
    #[serde(rename = "search[value]")]
    pub search: Option<String>,
    pub draw: Option<u64>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::ParseError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(DASHBOARD_HTML)
}

#[get("/download/csv")]
async fn download_csv(data: web::Data<HttpState>) -> Result<HttpResponse> {
    let shared = data.table.clone();
    let export_path = data.export_path.clone();

    let bytes = web::block(move || -> Result<Vec<u8>> {
        let bytes = records_to_csv_bytes(shared.records())?;
        if let Err(err) = write_csv_file(&export_path, &bytes) {
            warn!(error = %err, "Failed to write export file, serving download anyway");
        }
        Ok(bytes)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Export worker failed: {}", e)))??;

    info!(bytes = bytes.len(), "CSV export served");

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(DOWNLOAD_NAME.to_string())],
        })
        .body(bytes))
}

#[get("/api/summary")]
async fn summary(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(DashboardQueries::new(&data.table).summary())
}

#[get("/api/top-states")]
async fn top_states(data: web::Data<HttpState>, query: web::Query<LimitQuery>) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_STATES);
    HttpResponse::Ok().json(DashboardQueries::new(&data.table).top_states(limit))
}

#[get("/api/top-cities")]
async fn top_cities(data: web::Data<HttpState>, query: web::Query<LimitQuery>) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_CITIES);
    HttpResponse::Ok().json(DashboardQueries::new(&data.table).top_cities(limit))
}

#[get("/api/phones-by-state")]
async fn phones_by_state(
    data: web::Data<HttpState>,
    query: web::Query<LimitQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_PHONE_STATES);
    HttpResponse::Ok().json(DashboardQueries::new(&data.table).phones_by_state(limit))
}

#[get("/api/treemap-states")]
async fn treemap_states(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(DashboardQueries::new(&data.table).state_distribution())
}

#[get("/api/state-city-heatmap")]
async fn state_city_heatmap(
    data: web::Data<HttpState>,
    query: web::Query<HeatmapQuery>,
) -> impl Responder {
    let states = query.states.unwrap_or(DEFAULT_HEATMAP_STATES);
    let cities = query.cities.unwrap_or(DEFAULT_HEATMAP_CITIES);
    HttpResponse::Ok().json(DashboardQueries::new(&data.table).state_city_heatmap(states, cities))
}

#[get("/api/table")]
async fn table(data: web::Data<HttpState>, query: web::Query<TableQuery>) -> impl Responder {
    let search = query.search.as_deref().unwrap_or("");
    let mut page = DashboardQueries::new(&data.table).table_page(
        search,
        query.start.unwrap_or(0),
        query.length.unwrap_or(DEFAULT_PAGE_LENGTH),
    );
    page.draw = query.draw;
    HttpResponse::Ok().json(page)
}

/// Non-numeric or negative numeric parameters are a client error
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        warn!(path = req.path(), error = %err, "Rejected malformed query parameters");
        AppError::ValidationError(err.to_string()).into()
    })
}

/// Register every route; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .service(index)
        .service(download_csv)
        .service(summary)
        .service(top_states)
        .service(top_cities)
        .service(phones_by_state)
        .service(treemap_states)
        .service(state_city_heatmap)
        .service(table);
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
