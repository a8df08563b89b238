use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::database::entities::{
    dataset_languages::Entity as DatasetLanguages, datasets::Entity as Datasets, json_objects,
    json_objects::Entity as JsonObjects, languages::Entity as Languages,
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("please select exactly one dataset language for export (got {0})")]
    Selection(usize),
    #[error("dataset language {0} does not exist")]
    NotFound(i32),
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A rendered export, ready to be served as a download.
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}

pub struct ExportService {
    db: DatabaseConnection,
}

impl ExportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Flatten one dataset-language's records back into a JSON array
    /// file named `{dataset}_{language_code}.json`. The selection must
    /// contain exactly one dataset-language.
    pub async fn export_selection(&self, ids: &[i32]) -> Result<ExportFile, ExportError> {
        if ids.len() != 1 {
            return Err(ExportError::Selection(ids.len()));
        }
        let id = ids[0];

        let dataset_language = DatasetLanguages::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExportError::NotFound(id))?;
        let dataset = Datasets::find_by_id(dataset_language.dataset_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("dataset {}", dataset_language.dataset_id))
            })?;
        let language = Languages::find_by_id(dataset_language.language_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("language {}", dataset_language.language_id))
            })?;

        let records = JsonObjects::find()
            .filter(json_objects::Column::DatasetLanguageId.eq(dataset_language.id))
            .order_by_asc(json_objects::Column::OrderId)
            .all(&self.db)
            .await?;

        // The stored document already is the {field_name: field_value}
        // map for object records; other values pass through unchanged.
        let documents: Vec<Value> = records
            .into_iter()
            .map(|record| record.json_object)
            .collect();

        let filename = format!("{}_{}.json", dataset.name, language.code);
        let content = render_json_array(&documents)?;
        info!("Exported {} JSON objects to {}", documents.len(), filename);

        Ok(ExportFile { filename, content })
    }
}

/// Serialize with 4-space indentation. serde_json emits non-ASCII
/// characters literally, so UTF-8 content survives unescaped.
pub fn render_json_array(documents: &[Value]) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    documents.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|_| serde_json::Error::custom("export produced invalid UTF-8"))
}
