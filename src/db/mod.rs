mod models;
mod schema;

pub use models::{LinkDraft, LinkFields, LinkRecord};
pub use schema::{Database, SCHEMA_VERSION};
