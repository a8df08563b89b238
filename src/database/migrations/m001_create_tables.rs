use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create languages table
        manager
            .create_table(
                Table::create()
                    .table(Languages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Languages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Languages::Code).string().not_null())
                    .col(ColumnDef::new(Languages::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create datasets table
        manager
            .create_table(
                Table::create()
                    .table(Datasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Datasets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Datasets::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create dataset_languages table
        manager
            .create_table(
                Table::create()
                    .table(DatasetLanguages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DatasetLanguages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DatasetLanguages::DatasetId).integer().not_null())
                    .col(ColumnDef::new(DatasetLanguages::LanguageId).integer().not_null())
                    .col(ColumnDef::new(DatasetLanguages::FilePath).string())
                    .col(ColumnDef::new(DatasetLanguages::SourceId).integer())
                    .col(
                        ColumnDef::new(DatasetLanguages::Imported)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DatasetLanguages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DatasetLanguages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dataset_languages-dataset_id")
                            .from(DatasetLanguages::Table, DatasetLanguages::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dataset_languages-language_id")
                            .from(DatasetLanguages::Table, DatasetLanguages::LanguageId)
                            .to(Languages::Table, Languages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dataset_languages-source_id")
                            .from(DatasetLanguages::Table, DatasetLanguages::SourceId)
                            .to(DatasetLanguages::Table, DatasetLanguages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create json_objects table
        manager
            .create_table(
                Table::create()
                    .table(JsonObjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JsonObjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JsonObjects::DatasetLanguageId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JsonObjects::JsonObject).json().not_null())
                    .col(ColumnDef::new(JsonObjects::SourceId).integer())
                    .col(ColumnDef::new(JsonObjects::OrderId).integer().not_null())
                    .col(
                        ColumnDef::new(JsonObjects::IsValid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-json_objects-dataset_language_id")
                            .from(JsonObjects::Table, JsonObjects::DatasetLanguageId)
                            .to(DatasetLanguages::Table, DatasetLanguages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-json_objects-source_id")
                            .from(JsonObjects::Table, JsonObjects::SourceId)
                            .to(JsonObjects::Table, JsonObjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness of reference data
        manager
            .create_index(
                Index::create()
                    .name("idx-languages-code")
                    .table(Languages::Table)
                    .col(Languages::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-languages-name")
                    .table(Languages::Table)
                    .col(Languages::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-datasets-name")
                    .table(Datasets::Table)
                    .col(Datasets::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One dataset-language per (dataset, language) pair
        manager
            .create_index(
                Index::create()
                    .name("idx-dataset_languages-dataset-language")
                    .table(DatasetLanguages::Table)
                    .col(DatasetLanguages::DatasetId)
                    .col(DatasetLanguages::LanguageId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-json_objects-dataset_language_id")
                    .table(JsonObjects::Table)
                    .col(JsonObjects::DatasetLanguageId)
                    .to_owned(),
            )
            .await?;

        // order_id values are exactly the 0-based array positions
        manager
            .create_index(
                Index::create()
                    .name("idx-json_objects-dataset_language-order")
                    .table(JsonObjects::Table)
                    .col(JsonObjects::DatasetLanguageId)
                    .col(JsonObjects::OrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes
        manager
            .drop_index(
                Index::drop()
                    .name("idx-json_objects-dataset_language-order")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx-json_objects-dataset_language_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx-dataset_languages-dataset-language")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx-datasets-name").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx-languages-name").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx-languages-code").to_owned())
            .await?;

        // Drop tables
        manager
            .drop_table(Table::drop().table(JsonObjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DatasetLanguages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Datasets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Languages::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Languages {
    Table,
    Id,
    Code,
    Name,
}

#[derive(Iden)]
enum Datasets {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum DatasetLanguages {
    Table,
    Id,
    DatasetId,
    LanguageId,
    FilePath,
    SourceId,
    Imported,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum JsonObjects {
    Table,
    Id,
    DatasetLanguageId,
    JsonObject,
    SourceId,
    OrderId,
    IsValid,
}
