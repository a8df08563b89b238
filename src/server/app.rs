use anyhow::Result;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{dataset_languages, datasets, health, json_objects, languages};
use crate::services::FileStorage;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub files: FileStorage,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        languages::list_languages,
        languages::create_language,
        languages::get_language,
        languages::delete_language,
        datasets::list_datasets,
        datasets::create_dataset,
        datasets::get_dataset,
        datasets::delete_dataset,
        dataset_languages::list_dataset_languages,
        dataset_languages::create_dataset_language,
        dataset_languages::get_dataset_language,
        dataset_languages::delete_dataset_language,
        dataset_languages::upload_file,
        dataset_languages::import_action,
        dataset_languages::export_action,
        json_objects::list_json_objects,
        json_objects::get_json_object,
        json_objects::update_json_object,
        json_objects::delete_json_object,
    ),
    components(schemas(
        crate::database::entities::languages::Model,
        crate::database::entities::datasets::Model,
        crate::database::entities::dataset_languages::Model,
        crate::database::entities::json_objects::Model,
        languages::CreateLanguageRequest,
        datasets::CreateDatasetRequest,
        dataset_languages::CreateDatasetLanguageRequest,
        dataset_languages::ImportActionRequest,
        dataset_languages::ExportActionRequest,
        json_objects::UpdateJsonObjectRequest,
        json_objects::JsonObjectDetail,
        crate::services::import_service::ImportOutcome,
    ))
)]
struct ApiDoc;

pub async fn create_app(
    db: DatabaseConnection,
    files: FileStorage,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let state = AppState { db, files };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // Swagger UI over the generated OpenAPI document
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Add middleware
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Language reference data
        .route("/languages", get(languages::list_languages))
        .route("/languages", post(languages::create_language))
        .route("/languages/:id", get(languages::get_language))
        .route("/languages/:id", delete(languages::delete_language))
        // Dataset reference data
        .route("/datasets", get(datasets::list_datasets))
        .route("/datasets", post(datasets::create_dataset))
        .route("/datasets/:id", get(datasets::get_dataset))
        .route("/datasets/:id", delete(datasets::delete_dataset))
        // Dataset languages: upload, import and export actions
        .route("/dataset-languages", get(dataset_languages::list_dataset_languages))
        .route("/dataset-languages", post(dataset_languages::create_dataset_language))
        .route("/dataset-languages/:id", get(dataset_languages::get_dataset_language))
        .route("/dataset-languages/:id", delete(dataset_languages::delete_dataset_language))
        .route("/dataset-languages/:id/file", put(dataset_languages::upload_file))
        .route("/dataset-languages/actions/import", post(dataset_languages::import_action))
        .route("/dataset-languages/actions/export", post(dataset_languages::export_action))
        // Imported records: review surface only, no create route
        .route("/json-objects", get(json_objects::list_json_objects))
        .route("/json-objects/:id", get(json_objects::get_json_object))
        .route("/json-objects/:id", put(json_objects::update_json_object))
        .route("/json-objects/:id", delete(json_objects::delete_json_object))
}
