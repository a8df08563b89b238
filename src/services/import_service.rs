use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::database::entities::{
    dataset_languages, dataset_languages::Entity as DatasetLanguages, json_objects,
    json_objects::Entity as JsonObjects,
};
use crate::services::FileStorage;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON")]
    MalformedJson(#[from] serde_json::Error),
    #[error("the file does not contain a JSON array")]
    NotAnArray,
    #[error("the number of JSON objects does not correspond (source has {source_count}, file has {found})")]
    CountMismatch { source_count: usize, found: usize },
    #[error("the order_id values do not correspond (expected {position}, found {found})")]
    OrderMismatch { position: i32, found: i32 },
    #[error("no file has been uploaded")]
    MissingFile,
    #[error("already imported")]
    AlreadyImported,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// Per-item result of a bulk import action.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportOutcome {
    pub dataset_language_id: i32,
    pub file: String,
    pub records: usize,
    pub error: Option<String>,
}

pub struct ImportService {
    db: DatabaseConnection,
    files: FileStorage,
}

impl ImportService {
    pub fn new(db: DatabaseConnection, files: FileStorage) -> Self {
        Self { db, files }
    }

    /// Import the uploaded files of the selected dataset-languages. Each
    /// item is processed independently; a failure is reported in that
    /// item's outcome and never aborts the rest of the batch.
    pub async fn import_dataset_languages(
        &self,
        ids: &[i32],
    ) -> Result<Vec<ImportOutcome>, sea_orm::DbErr> {
        let mut outcomes = Vec::with_capacity(ids.len());

        for &id in ids {
            let Some(dataset_language) = DatasetLanguages::find_by_id(id).one(&self.db).await?
            else {
                outcomes.push(ImportOutcome {
                    dataset_language_id: id,
                    file: String::new(),
                    records: 0,
                    error: Some(format!("Dataset language {} does not exist", id)),
                });
                continue;
            };

            let file = dataset_language.file_path.clone().unwrap_or_default();
            match self.import_one(&dataset_language).await {
                Ok(records) => {
                    info!("Imported {} JSON objects from {}", records, file);
                    outcomes.push(ImportOutcome {
                        dataset_language_id: id,
                        file,
                        records,
                        error: None,
                    });
                }
                Err(err) => {
                    warn!("Import failed for {}: {}", file, err);
                    let message = match &err {
                        ImportError::MalformedJson(_) => {
                            format!("Invalid JSON in file: {}", file)
                        }
                        _ => format!("Error processing file: {} - {}", file, err),
                    };
                    outcomes.push(ImportOutcome {
                        dataset_language_id: id,
                        file,
                        records: 0,
                        error: Some(message),
                    });
                }
            }
        }

        Ok(outcomes)
    }

    /// Parse one uploaded file and bulk-create its records. Row creation
    /// and the `imported` flag update run in a single transaction, so a
    /// failure leaves no partial rows behind.
    async fn import_one(
        &self,
        dataset_language: &dataset_languages::Model,
    ) -> Result<usize, ImportError> {
        if dataset_language.imported {
            return Err(ImportError::AlreadyImported);
        }
        let path = dataset_language
            .file_path
            .as_deref()
            .ok_or(ImportError::MissingFile)?;

        let raw = self.files.read_to_string(path).await?;
        let parsed: Value = serde_json::from_str(&raw)?;
        let Value::Array(items) = parsed else {
            return Err(ImportError::NotAnArray);
        };

        let rows = match dataset_language.source_id {
            Some(source_id) => self.aligned_rows(dataset_language, source_id, items).await?,
            None => items
                .into_iter()
                .enumerate()
                .map(|(position, item)| json_objects::ActiveModel {
                    dataset_language_id: Set(dataset_language.id),
                    json_object: Set(item),
                    source_id: Set(None),
                    order_id: Set(position as i32),
                    // A primary-language import is considered valid by default
                    is_valid: Set(true),
                    ..Default::default()
                })
                .collect(),
        };

        let created = rows.len();
        let txn = self.db.begin().await?;
        if !rows.is_empty() {
            JsonObjects::insert_many(rows).exec(&txn).await?;
        }
        let mut active: dataset_languages::ActiveModel = dataset_language.clone().into();
        active.imported = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;
        txn.commit().await?;

        Ok(created)
    }

    /// Pair the parsed array positionally against the source language's
    /// records. The source set must have the same length and contiguous
    /// 0-based order_id values.
    async fn aligned_rows(
        &self,
        dataset_language: &dataset_languages::Model,
        source_id: i32,
        items: Vec<Value>,
    ) -> Result<Vec<json_objects::ActiveModel>, ImportError> {
        let sources = JsonObjects::find()
            .filter(json_objects::Column::DatasetLanguageId.eq(source_id))
            .order_by_asc(json_objects::Column::OrderId)
            .all(&self.db)
            .await?;

        if sources.len() != items.len() {
            return Err(ImportError::CountMismatch {
                source_count: sources.len(),
                found: items.len(),
            });
        }

        let mut rows = Vec::with_capacity(items.len());
        for (position, (item, source)) in items.into_iter().zip(sources).enumerate() {
            let position = position as i32;
            if position != source.order_id {
                return Err(ImportError::OrderMismatch {
                    position,
                    found: source.order_id,
                });
            }

            rows.push(json_objects::ActiveModel {
                dataset_language_id: Set(dataset_language.id),
                json_object: Set(item),
                source_id: Set(Some(source.id)),
                order_id: Set(position),
                // Alignment imports always start unvalidated
                is_valid: Set(false),
                ..Default::default()
            });
        }

        Ok(rows)
    }
}
