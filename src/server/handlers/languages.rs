use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::database::entities::{dataset_languages, languages, languages::Entity as Languages};
use crate::server::app::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateLanguageRequest {
    pub code: String,
    pub name: String,
}

#[derive(Deserialize, IntoParams)]
pub struct LanguageSearchParams {
    /// Substring match over code and name
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/languages",
    params(LanguageSearchParams),
    responses(
        (status = 200, description = "List all languages", body = [crate::database::entities::languages::Model])
    )
)]
pub async fn list_languages(
    State(state): State<AppState>,
    Query(params): Query<LanguageSearchParams>,
) -> Result<Json<Vec<languages::Model>>, StatusCode> {
    let mut query = Languages::find();
    if let Some(search) = params.search.as_deref() {
        query = query.filter(
            Condition::any()
                .add(languages::Column::Code.contains(search))
                .add(languages::Column::Name.contains(search)),
        );
    }

    let languages = query
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(languages))
}

#[utoipa::path(
    post,
    path = "/api/v1/languages",
    request_body = CreateLanguageRequest,
    responses(
        (status = 200, description = "Language created successfully", body = crate::database::entities::languages::Model),
        (status = 409, description = "Code or name already exists")
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    Json(payload): Json<CreateLanguageRequest>,
) -> Result<Json<languages::Model>, StatusCode> {
    let language = languages::ActiveModel {
        code: Set(payload.code),
        name: Set(payload.name),
        ..Default::default()
    };

    let language = language
        .insert(&state.db)
        .await
        .map_err(super::db_error_status)?;

    Ok(Json(language))
}

#[utoipa::path(
    get,
    path = "/api/v1/languages/{id}",
    params(
        ("id" = i32, Path, description = "Language ID")
    ),
    responses(
        (status = 200, description = "Language found", body = crate::database::entities::languages::Model),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<languages::Model>, StatusCode> {
    let language = Languages::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(language))
}

#[utoipa::path(
    delete,
    path = "/api/v1/languages/{id}",
    params(
        ("id" = i32, Path, description = "Language ID")
    ),
    responses(
        (status = 204, description = "Language deleted successfully"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let language = Languages::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    // The delete cascades through dataset_languages; release the backing
    // files of every row that goes with it.
    let members = dataset_languages::Entity::find()
        .filter(dataset_languages::Column::LanguageId.eq(language.id))
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let paths = super::upload_paths_for(&state.db, members.iter().map(|m| m.id).collect())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Languages::delete_by_id(language.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    super::remove_upload_files(&state.files, &paths).await;

    Ok(StatusCode::NO_CONTENT)
}
