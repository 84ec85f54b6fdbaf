use crate::domain::model::{Blueprint, Entry, Fieldset, Nav, NavTree, SchemaFile};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn all_entries(&self) -> Result<Vec<Entry>>;
}

#[async_trait]
pub trait EntrySink: Send + Sync {
    /// Upsert one entry, using its `last_modified` for both created and
    /// updated timestamps.
    async fn save_entry(&self, entry: &Entry) -> Result<()>;
}

#[async_trait]
pub trait SchemaFiles: Send + Sync {
    async fn files(&self) -> Result<Vec<SchemaFile>>;
}

#[async_trait]
pub trait SchemaSink: Send + Sync {
    async fn save_blueprint(&self, blueprint: &Blueprint) -> Result<()>;
    async fn save_fieldset(&self, fieldset: &Fieldset) -> Result<()>;
}

#[async_trait]
pub trait NavSource: Send + Sync {
    async fn all_navs(&self) -> Result<Vec<Nav>>;
}

#[async_trait]
pub trait NavSink: Send + Sync {
    async fn save_nav(&self, nav: &Nav) -> Result<()>;
    async fn save_tree(&self, tree: &NavTree) -> Result<()>;
}

/// Purely observational; implementations must not affect control flow.
pub trait Progress: Send + Sync {
    fn phase(&self, label: &str, total: u64);
    fn tick(&self);
    fn finish(&self);
}
