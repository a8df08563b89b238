pub mod languages;
pub mod datasets;
pub mod dataset_languages;
pub mod json_objects;

pub use languages::*;
pub use datasets::*;
pub use dataset_languages::*;
pub use json_objects::*;
