pub mod file_storage;
pub mod import_service;
pub mod export_service;

pub use file_storage::*;
pub use import_service::*;
pub use export_service::*;
