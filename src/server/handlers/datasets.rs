use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::database::entities::{dataset_languages, datasets, datasets::Entity as Datasets};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateDatasetRequest {
    pub name: String,
}

#[derive(Deserialize, IntoParams)]
pub struct DatasetSearchParams {
    /// Substring match over the dataset name
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/datasets",
    params(DatasetSearchParams),
    responses(
        (status = 200, description = "List all datasets", body = [crate::database::entities::datasets::Model])
    )
)]
pub async fn list_datasets(
    State(state): State<AppState>,
    Query(params): Query<DatasetSearchParams>,
) -> Result<Json<Vec<datasets::Model>>, StatusCode> {
    let mut query = Datasets::find();
    if let Some(search) = params.search.as_deref() {
        query = query.filter(datasets::Column::Name.contains(search));
    }

    let datasets = query
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(datasets))
}

#[utoipa::path(
    post,
    path = "/api/v1/datasets",
    request_body = CreateDatasetRequest,
    responses(
        (status = 200, description = "Dataset created successfully", body = crate::database::entities::datasets::Model),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_dataset(
    State(state): State<AppState>,
    Json(payload): Json<CreateDatasetRequest>,
) -> Result<Json<datasets::Model>, StatusCode> {
    let dataset = datasets::ActiveModel {
        name: Set(payload.name),
        ..Default::default()
    };

    let dataset = dataset
        .insert(&state.db)
        .await
        .map_err(super::db_error_status)?;

    Ok(Json(dataset))
}

#[utoipa::path(
    get,
    path = "/api/v1/datasets/{id}",
    params(
        ("id" = i32, Path, description = "Dataset ID")
    ),
    responses(
        (status = 200, description = "Dataset found", body = crate::database::entities::datasets::Model),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<datasets::Model>, StatusCode> {
    let dataset = Datasets::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(dataset))
}

#[utoipa::path(
    delete,
    path = "/api/v1/datasets/{id}",
    params(
        ("id" = i32, Path, description = "Dataset ID")
    ),
    responses(
        (status = 204, description = "Dataset deleted successfully"),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let dataset = Datasets::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let members = dataset_languages::Entity::find()
        .filter(dataset_languages::Column::DatasetId.eq(dataset.id))
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let paths = super::upload_paths_for(&state.db, members.iter().map(|m| m.id).collect())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Datasets::delete_by_id(dataset.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    super::remove_upload_files(&state.files, &paths).await;

    Ok(StatusCode::NO_CONTENT)
}
