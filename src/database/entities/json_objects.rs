use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One imported record: an arbitrary JSON document plus its 0-based
/// position within the originally imported array and its validation
/// state. `source_id` points at the aligned record of the source
/// language sharing the same `order_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = JsonObject)]
#[sea_orm(table_name = "json_objects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub dataset_language_id: i32,
    #[schema(value_type = Object)]
    pub json_object: Json,
    pub source_id: Option<i32>,
    pub order_id: i32,
    pub is_valid: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dataset_languages::Entity",
        from = "Column::DatasetLanguageId",
        to = "super::dataset_languages::Column::Id"
    )]
    DatasetLanguages,
    #[sea_orm(belongs_to = "Entity", from = "Column::SourceId", to = "Column::Id")]
    Source,
}

impl Related<super::dataset_languages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DatasetLanguages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
