use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::database::entities::{json_objects, json_objects::Entity as JsonObjects};
use crate::server::app::AppState;

#[derive(Deserialize, IntoParams)]
pub struct JsonObjectFilter {
    pub dataset_language_id: Option<i32>,
    pub is_valid: Option<bool>,
}

/// Only the document and the validation flag are editable; everything
/// else is fixed at import time.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateJsonObjectRequest {
    #[schema(value_type = Object)]
    pub json_object: Option<Value>,
    pub is_valid: Option<bool>,
}

/// A record together with its aligned source document, read-only.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct JsonObjectDetail {
    pub id: i32,
    pub dataset_language_id: i32,
    #[schema(value_type = Object)]
    pub json_object: Value,
    pub source_id: Option<i32>,
    pub order_id: i32,
    pub is_valid: bool,
    #[schema(value_type = Object)]
    pub source_json_object: Option<Value>,
}

#[utoipa::path(
    get,
    path = "/api/v1/json-objects",
    params(JsonObjectFilter),
    responses(
        (status = 200, description = "List JSON objects ordered by position", body = [crate::database::entities::json_objects::Model])
    )
)]
pub async fn list_json_objects(
    State(state): State<AppState>,
    Query(filter): Query<JsonObjectFilter>,
) -> Result<Json<Vec<json_objects::Model>>, StatusCode> {
    let mut query = JsonObjects::find();
    if let Some(dataset_language_id) = filter.dataset_language_id {
        query = query.filter(json_objects::Column::DatasetLanguageId.eq(dataset_language_id));
    }
    if let Some(is_valid) = filter.is_valid {
        query = query.filter(json_objects::Column::IsValid.eq(is_valid));
    }

    let records = query
        .order_by_asc(json_objects::Column::DatasetLanguageId)
        .order_by_asc(json_objects::Column::OrderId)
        .all(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1/json-objects/{id}",
    params(
        ("id" = i32, Path, description = "JSON object ID")
    ),
    responses(
        (status = 200, description = "Record with its aligned source document", body = JsonObjectDetail),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_json_object(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JsonObjectDetail>, StatusCode> {
    let record = JsonObjects::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let source_json_object = match record.source_id {
        Some(source_id) => JsonObjects::find_by_id(source_id)
            .one(&state.db)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .map(|source| source.json_object),
        None => None,
    };

    Ok(Json(JsonObjectDetail {
        id: record.id,
        dataset_language_id: record.dataset_language_id,
        json_object: record.json_object,
        source_id: record.source_id,
        order_id: record.order_id,
        is_valid: record.is_valid,
        source_json_object,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/json-objects/{id}",
    params(
        ("id" = i32, Path, description = "JSON object ID")
    ),
    request_body = UpdateJsonObjectRequest,
    responses(
        (status = 200, description = "Record updated", body = crate::database::entities::json_objects::Model),
        (status = 404, description = "Record not found")
    )
)]
pub async fn update_json_object(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateJsonObjectRequest>,
) -> Result<Json<json_objects::Model>, StatusCode> {
    let record = JsonObjects::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut record: json_objects::ActiveModel = record.into();
    if let Some(json_object) = payload.json_object {
        record.json_object = Set(json_object);
    }
    if let Some(is_valid) = payload.is_valid {
        record.is_valid = Set(is_valid);
    }

    let record = record
        .update(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/api/v1/json-objects/{id}",
    params(
        ("id" = i32, Path, description = "JSON object ID")
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_json_object(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let record = JsonObjects::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    JsonObjects::delete_by_id(record.id)
        .exec(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}
