use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One language's instantiation of a dataset: the uploaded file and its
/// import state. `source_id` links to the dataset-language whose record
/// order defines positional alignment for this one.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = DatasetLanguage)]
#[sea_orm(table_name = "dataset_languages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub dataset_id: i32,
    pub language_id: i32,
    pub file_path: Option<String>,
    pub source_id: Option<i32>,
    pub imported: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::datasets::Entity",
        from = "Column::DatasetId",
        to = "super::datasets::Column::Id"
    )]
    Datasets,
    #[sea_orm(
        belongs_to = "super::languages::Entity",
        from = "Column::LanguageId",
        to = "super::languages::Column::Id"
    )]
    Languages,
    #[sea_orm(belongs_to = "Entity", from = "Column::SourceId", to = "Column::Id")]
    Source,
    #[sea_orm(has_many = "super::json_objects::Entity")]
    JsonObjects,
}

impl Related<super::datasets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Datasets.def()
    }
}

impl Related<super::languages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Languages.def()
    }
}

impl Related<super::json_objects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JsonObjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
