//! Database functionality tests
//!
//! Tests for database migrations, entity operations, and data integrity

use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde_json::json;
use tempfile::NamedTempFile;
use validata::database::entities::*;
use validata::database::setup_database;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

async fn insert_language(db: &DatabaseConnection, code: &str, name: &str) -> Result<languages::Model> {
    let language = languages::ActiveModel {
        code: Set(code.to_string()),
        name: Set(name.to_string()),
        ..Default::default()
    };
    Ok(language.insert(db).await?)
}

async fn insert_dataset(db: &DatabaseConnection, name: &str) -> Result<datasets::Model> {
    let dataset = datasets::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    Ok(dataset.insert(db).await?)
}

async fn insert_dataset_language(
    db: &DatabaseConnection,
    dataset_id: i32,
    language_id: i32,
    source_id: Option<i32>,
) -> Result<dataset_languages::Model> {
    let now = Utc::now();
    let dataset_language = dataset_languages::ActiveModel {
        dataset_id: Set(dataset_id),
        language_id: Set(language_id),
        file_path: Set(None),
        source_id: Set(source_id),
        imported: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(dataset_language.insert(db).await?)
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    // Verify all tables exist by attempting to query them
    let languages = languages::Entity::find().all(&db).await?;
    assert_eq!(languages.len(), 0);

    let datasets = datasets::Entity::find().all(&db).await?;
    assert_eq!(datasets.len(), 0);

    let dataset_languages = dataset_languages::Entity::find().all(&db).await?;
    assert_eq!(dataset_languages.len(), 0);

    let json_objects = json_objects::Entity::find().all(&db).await?;
    assert_eq!(json_objects.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_language_crud_operations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let language = insert_language(&db, "en", "English").await?;
    assert_eq!(language.code, "en");
    assert_eq!(language.label(), "English (en)");

    let found = languages::Entity::find_by_id(language.id)
        .one(&db)
        .await?
        .expect("Language should exist");
    assert_eq!(found.name, "English");

    languages::Entity::delete_by_id(language.id).exec(&db).await?;
    let deleted = languages::Entity::find_by_id(language.id).one(&db).await?;
    assert!(deleted.is_none());

    Ok(())
}

#[tokio::test]
async fn test_language_uniqueness() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    insert_language(&db, "en", "English").await?;

    // Same code, different name
    assert!(insert_language(&db, "en", "Anglais").await.is_err());
    // Same name, different code
    assert!(insert_language(&db, "en-GB", "English").await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_dataset_language_pair_uniqueness() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let dataset = insert_dataset(&db, "wiki-qa").await?;
    let english = insert_language(&db, "en", "English").await?;
    let german = insert_language(&db, "de", "German").await?;

    insert_dataset_language(&db, dataset.id, english.id, None).await?;
    // Second language of the same dataset is fine
    insert_dataset_language(&db, dataset.id, german.id, None).await?;
    // Duplicate (dataset, language) pair is rejected
    assert!(insert_dataset_language(&db, dataset.id, english.id, None)
        .await
        .is_err());

    Ok(())
}

#[tokio::test]
async fn test_cascade_delete_removes_records() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let dataset = insert_dataset(&db, "wiki-qa").await?;
    let english = insert_language(&db, "en", "English").await?;
    let dataset_language = insert_dataset_language(&db, dataset.id, english.id, None).await?;

    for (order_id, value) in [json!({"a": 1}), json!({"a": 2})].into_iter().enumerate() {
        json_objects::ActiveModel {
            dataset_language_id: Set(dataset_language.id),
            json_object: Set(value),
            source_id: Set(None),
            order_id: Set(order_id as i32),
            is_valid: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }

    let records = json_objects::Entity::find()
        .filter(json_objects::Column::DatasetLanguageId.eq(dataset_language.id))
        .all(&db)
        .await?;
    assert_eq!(records.len(), 2);

    // Deleting the dataset cascades through dataset_languages to records
    datasets::Entity::delete_by_id(dataset.id).exec(&db).await?;

    let remaining_dataset_languages = dataset_languages::Entity::find().all(&db).await?;
    assert_eq!(remaining_dataset_languages.len(), 0);

    let remaining_records = json_objects::Entity::find().all(&db).await?;
    assert_eq!(remaining_records.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_order_id_unique_per_dataset_language() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let dataset = insert_dataset(&db, "wiki-qa").await?;
    let english = insert_language(&db, "en", "English").await?;
    let dataset_language = insert_dataset_language(&db, dataset.id, english.id, None).await?;

    json_objects::ActiveModel {
        dataset_language_id: Set(dataset_language.id),
        json_object: Set(json!({"a": 1})),
        source_id: Set(None),
        order_id: Set(0),
        is_valid: Set(true),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    // A second record at the same position is rejected
    let duplicate = json_objects::ActiveModel {
        dataset_language_id: Set(dataset_language.id),
        json_object: Set(json!({"a": 2})),
        source_id: Set(None),
        order_id: Set(0),
        is_valid: Set(true),
        ..Default::default()
    }
    .insert(&db)
    .await;
    assert!(duplicate.is_err());

    Ok(())
}
