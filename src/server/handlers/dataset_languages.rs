use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::database::entities::{
    dataset_languages, dataset_languages::Entity as DatasetLanguages, datasets::Entity as Datasets,
    languages::Entity as Languages,
};
use crate::server::app::AppState;
use crate::services::{is_json_filename, ExportError, ExportService, ImportOutcome, ImportService};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateDatasetLanguageRequest {
    pub dataset_id: i32,
    pub language_id: i32,
    /// Dataset-language whose record order this one aligns against
    pub source_id: Option<i32>,
}

#[derive(Deserialize, IntoParams)]
pub struct DatasetLanguageFilter {
    pub dataset_id: Option<i32>,
    pub language_id: Option<i32>,
    pub imported: Option<bool>,
}

#[derive(Deserialize, IntoParams)]
pub struct UploadParams {
    /// Original name of the uploaded file; must end in .json
    pub filename: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ImportActionRequest {
    pub ids: Vec<i32>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ExportActionRequest {
    pub ids: Vec<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dataset-languages",
    params(DatasetLanguageFilter),
    responses(
        (status = 200, description = "List dataset languages", body = [crate::database::entities::dataset_languages::Model])
    )
)]
pub async fn list_dataset_languages(
    State(state): State<AppState>,
    Query(filter): Query<DatasetLanguageFilter>,
) -> Result<Json<Vec<dataset_languages::Model>>, StatusCode> {
    let mut query = DatasetLanguages::find();
    if let Some(dataset_id) = filter.dataset_id {
        query = query.filter(dataset_languages::Column::DatasetId.eq(dataset_id));
    }
    if let Some(language_id) = filter.language_id {
        query = query.filter(dataset_languages::Column::LanguageId.eq(language_id));
    }
    if let Some(imported) = filter.imported {
        query = query.filter(dataset_languages::Column::Imported.eq(imported));
    }

    let dataset_languages = query
        .order_by_asc(dataset_languages::Column::Id)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(dataset_languages))
}

#[utoipa::path(
    post,
    path = "/api/v1/dataset-languages",
    request_body = CreateDatasetLanguageRequest,
    responses(
        (status = 200, description = "Dataset language created successfully", body = crate::database::entities::dataset_languages::Model),
        (status = 400, description = "Unknown dataset, language or source"),
        (status = 409, description = "Dataset language already exists for this (dataset, language) pair")
    )
)]
pub async fn create_dataset_language(
    State(state): State<AppState>,
    Json(payload): Json<CreateDatasetLanguageRequest>,
) -> Result<Json<dataset_languages::Model>, StatusCode> {
    // Referenced reference data must exist
    Datasets::find_by_id(payload.dataset_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::BAD_REQUEST)?;
    Languages::find_by_id(payload.language_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::BAD_REQUEST)?;
    if let Some(source_id) = payload.source_id {
        DatasetLanguages::find_by_id(source_id)
            .one(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::BAD_REQUEST)?;
    }

    let now = Utc::now();
    let dataset_language = dataset_languages::ActiveModel {
        dataset_id: Set(payload.dataset_id),
        language_id: Set(payload.language_id),
        file_path: Set(None),
        source_id: Set(payload.source_id),
        imported: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let dataset_language = dataset_language
        .insert(&state.db)
        .await
        .map_err(super::db_error_status)?;

    Ok(Json(dataset_language))
}

#[utoipa::path(
    get,
    path = "/api/v1/dataset-languages/{id}",
    params(
        ("id" = i32, Path, description = "Dataset language ID")
    ),
    responses(
        (status = 200, description = "Dataset language found", body = crate::database::entities::dataset_languages::Model),
        (status = 404, description = "Dataset language not found")
    )
)]
pub async fn get_dataset_language(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<dataset_languages::Model>, StatusCode> {
    let dataset_language = DatasetLanguages::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(dataset_language))
}

#[utoipa::path(
    delete,
    path = "/api/v1/dataset-languages/{id}",
    params(
        ("id" = i32, Path, description = "Dataset language ID")
    ),
    responses(
        (status = 204, description = "Dataset language deleted, backing file released"),
        (status = 404, description = "Dataset language not found")
    )
)]
pub async fn delete_dataset_language(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let dataset_language = DatasetLanguages::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let paths = super::upload_paths_for(&state.db, vec![dataset_language.id])
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    DatasetLanguages::delete_by_id(dataset_language.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    super::remove_upload_files(&state.files, &paths).await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/dataset-languages/{id}/file",
    params(
        ("id" = i32, Path, description = "Dataset language ID"),
        UploadParams
    ),
    request_body(content = Vec<u8>, description = "Raw JSON file contents"),
    responses(
        (status = 200, description = "File stored", body = crate::database::entities::dataset_languages::Model),
        (status = 400, description = "Not a .json file"),
        (status = 404, description = "Dataset language not found")
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<dataset_languages::Model>, StatusCode> {
    let dataset_language = DatasetLanguages::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if !is_json_filename(&params.filename) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let relative = format!("datasets/{}_{}", dataset_language.id, params.filename);
    if let Some(previous) = dataset_language.file_path.as_deref() {
        if previous != relative {
            super::remove_upload_files(&state.files, &[previous.to_string()]).await;
        }
    }
    state.files.save(&relative, &body).await.map_err(|err| {
        error!("Failed to store upload {}: {}", relative, err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut active: dataset_languages::ActiveModel = dataset_language.into();
    active.file_path = Set(Some(relative));
    active.updated_at = Set(Utc::now());

    let dataset_language = active
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(dataset_language))
}

#[utoipa::path(
    post,
    path = "/api/v1/dataset-languages/actions/import",
    request_body = ImportActionRequest,
    responses(
        (status = 200, description = "Per-item import outcomes; failures are reported per file", body = [ImportOutcome])
    )
)]
pub async fn import_action(
    State(state): State<AppState>,
    Json(payload): Json<ImportActionRequest>,
) -> Result<Json<Vec<ImportOutcome>>, StatusCode> {
    let service = ImportService::new(state.db.clone(), state.files.clone());
    let outcomes = service
        .import_dataset_languages(&payload.ids)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(outcomes))
}

#[utoipa::path(
    post,
    path = "/api/v1/dataset-languages/actions/export",
    request_body = ExportActionRequest,
    responses(
        (status = 200, description = "JSON file download named {dataset}_{language_code}.json"),
        (status = 400, description = "Selection must contain exactly one dataset language"),
        (status = 404, description = "Dataset language not found")
    )
)]
pub async fn export_action(
    State(state): State<AppState>,
    Json(payload): Json<ExportActionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = ExportService::new(state.db.clone());
    let export = service.export_selection(&payload.ids).await.map_err(|err| {
        let status = match &err {
            ExportError::Selection(_) => StatusCode::BAD_REQUEST,
            ExportError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, err.to_string())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    ))
}
