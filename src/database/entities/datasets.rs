use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Named dataset grouping one dataset-language per language.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Dataset)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dataset_languages::Entity")]
    DatasetLanguages,
}

impl Related<super::dataset_languages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DatasetLanguages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
