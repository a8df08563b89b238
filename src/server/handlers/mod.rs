pub mod health;
pub mod languages;
pub mod datasets;
pub mod dataset_languages;
pub mod json_objects;

use std::collections::HashSet;

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tracing::{error, warn};

use crate::database::entities::{dataset_languages as dl, dataset_languages::Entity as DatasetLanguages};
use crate::services::FileStorage;

/// Unique-constraint violations surface as 409, everything else as 500.
pub(crate) fn db_error_status(err: DbErr) -> StatusCode {
    let message = err.to_string();
    if message.contains("UNIQUE constraint failed") {
        StatusCode::CONFLICT
    } else {
        error!("Database error: {}", message);
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Collect the upload file paths of the given dataset-languages and of
/// every dataset-language that aligns against them, transitively. The
/// database cascades those rows on delete; their backing files are
/// removed with `remove_upload_files` afterwards.
pub(crate) async fn upload_paths_for(
    db: &DatabaseConnection,
    seed_ids: Vec<i32>,
) -> Result<Vec<String>, DbErr> {
    let mut visited: HashSet<i32> = HashSet::new();
    let mut paths = Vec::new();
    let mut frontier = seed_ids;

    while !frontier.is_empty() {
        frontier.retain(|id| visited.insert(*id));
        if frontier.is_empty() {
            break;
        }

        let rows = DatasetLanguages::find()
            .filter(dl::Column::Id.is_in(frontier.clone()))
            .all(db)
            .await?;
        for row in &rows {
            if let Some(path) = &row.file_path {
                paths.push(path.clone());
            }
        }

        let dependents = DatasetLanguages::find()
            .filter(dl::Column::SourceId.is_in(frontier))
            .all(db)
            .await?;
        frontier = dependents.into_iter().map(|row| row.id).collect();
    }

    Ok(paths)
}

/// Deleting a dataset-language releases its backing file. A missing file
/// is logged, not fatal.
pub(crate) async fn remove_upload_files(files: &FileStorage, paths: &[String]) {
    for path in paths {
        if let Err(err) = files.delete(path).await {
            warn!("Failed to remove uploaded file {}: {}", path, err);
        }
    }
}
