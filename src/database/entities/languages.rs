use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reference language, e.g. `en` / `English`. Immutable once created.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Language)]
#[sea_orm(table_name = "languages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: String,
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

impl Model {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}
