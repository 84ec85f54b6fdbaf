use crate::domain::model::{Blueprint, Entry, Fieldset, Nav, NavTree};
use crate::domain::ports::{EntrySink, NavSink, SchemaSink};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, SqlitePool};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS entries (
        id TEXT PRIMARY KEY,
        collection TEXT NOT NULL,
        slug TEXT NOT NULL,
        origin_id TEXT,
        published INTEGER NOT NULL DEFAULT 1,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS blueprints (
        namespace TEXT NOT NULL DEFAULT '',
        handle TEXT NOT NULL,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE(namespace, handle)
    )",
    "CREATE TABLE IF NOT EXISTS fieldsets (
        handle TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS navigations (
        handle TEXT PRIMARY KEY,
        title TEXT,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS nav_trees (
        handle TEXT NOT NULL,
        site TEXT NOT NULL,
        tree TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE(handle, site)
    )",
];

/// SQLite destination store. One writer, so the pool is capped at a single
/// connection; every write is an upsert by natural key, which also makes
/// re-running an interrupted import safe.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// In-memory store for tests.
    pub async fn connect_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn entry(&self, id: &str) -> Result<Option<EntryRow>> {
        let row = sqlx::query_as("SELECT * FROM entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn blueprint(
        &self,
        namespace: Option<&str>,
        handle: &str,
    ) -> Result<Option<SchemaRow>> {
        let row = sqlx::query_as("SELECT handle, data, updated_at FROM blueprints WHERE namespace = ? AND handle = ?")
            .bind(namespace.unwrap_or(""))
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn fieldset(&self, handle: &str) -> Result<Option<SchemaRow>> {
        let row = sqlx::query_as("SELECT handle, data, updated_at FROM fieldsets WHERE handle = ?")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn nav_tree(&self, handle: &str, site: &str) -> Result<Option<SchemaRow>> {
        let row = sqlx::query_as(
            "SELECT handle, tree AS data, updated_at FROM nav_trees WHERE handle = ? AND site = ?",
        )
        .bind(handle)
        .bind(site)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn count(&self, table: Table) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(table.count_sql())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Table {
    Entries,
    Blueprints,
    Fieldsets,
    Navigations,
    NavTrees,
}

impl Table {
    fn count_sql(self) -> &'static str {
        match self {
            Table::Entries => "SELECT COUNT(*) FROM entries",
            Table::Blueprints => "SELECT COUNT(*) FROM blueprints",
            Table::Fieldsets => "SELECT COUNT(*) FROM fieldsets",
            Table::Navigations => "SELECT COUNT(*) FROM navigations",
            Table::NavTrees => "SELECT COUNT(*) FROM nav_trees",
        }
    }
}

#[derive(Debug, FromRow)]
pub struct EntryRow {
    pub id: String,
    pub collection: String,
    pub slug: String,
    pub origin_id: Option<String>,
    pub published: bool,
    pub data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct SchemaRow {
    pub handle: String,
    pub data: String,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
impl EntrySink for SqliteStore {
    async fn save_entry(&self, entry: &Entry) -> Result<()> {
        let data = serde_json::to_string(&entry.data)?;

        sqlx::query(
            "INSERT INTO entries (id, collection, slug, origin_id, published, data, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 collection = excluded.collection,
                 slug = excluded.slug,
                 origin_id = excluded.origin_id,
                 published = excluded.published,
                 data = excluded.data,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
        )
        .bind(&entry.id)
        .bind(&entry.collection)
        .bind(&entry.slug)
        .bind(entry.origin_id())
        .bind(entry.published)
        .bind(data)
        .bind(entry.last_modified)
        .bind(entry.last_modified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SchemaSink for SqliteStore {
    async fn save_blueprint(&self, blueprint: &Blueprint) -> Result<()> {
        let data = serde_json::to_string(&blueprint.data)?;

        sqlx::query(
            "INSERT INTO blueprints (namespace, handle, data, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(namespace, handle) DO UPDATE SET
                 data = excluded.data,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
        )
        .bind(blueprint.namespace.as_deref().unwrap_or(""))
        .bind(&blueprint.handle)
        .bind(data)
        .bind(blueprint.last_modified)
        .bind(blueprint.last_modified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_fieldset(&self, fieldset: &Fieldset) -> Result<()> {
        let data = serde_json::to_string(&fieldset.data)?;

        sqlx::query(
            "INSERT INTO fieldsets (handle, data, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(handle) DO UPDATE SET
                 data = excluded.data,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
        )
        .bind(&fieldset.handle)
        .bind(data)
        .bind(fieldset.last_modified)
        .bind(fieldset.last_modified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl NavSink for SqliteStore {
    async fn save_nav(&self, nav: &Nav) -> Result<()> {
        let data = serde_json::to_string(&nav.data)?;

        sqlx::query(
            "INSERT INTO navigations (handle, title, data, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(handle) DO UPDATE SET
                 title = excluded.title,
                 data = excluded.data,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
        )
        .bind(&nav.handle)
        .bind(nav.title.as_deref())
        .bind(data)
        .bind(nav.last_modified)
        .bind(nav.last_modified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_tree(&self, tree: &NavTree) -> Result<()> {
        let data = serde_json::to_string(&tree.tree)?;

        sqlx::query(
            "INSERT INTO nav_trees (handle, site, tree, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(handle, site) DO UPDATE SET
                 tree = excluded.tree,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
        )
        .bind(&tree.handle)
        .bind(&tree.site)
        .bind(data)
        .bind(tree.last_modified)
        .bind(tree.last_modified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Origin;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn entry(id: &str, title: &str) -> Entry {
        let mut data = HashMap::new();
        data.insert(
            "title".to_string(),
            serde_json::Value::String(title.to_string()),
        );
        Entry {
            id: id.to_string(),
            collection: "pages".to_string(),
            slug: format!("page-{}", id),
            origin: Origin::None,
            published: true,
            last_modified: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            data,
        }
    }

    #[tokio::test]
    async fn test_entry_upsert_is_idempotent() {
        let store = SqliteStore::connect_memory().await.unwrap();

        store.save_entry(&entry("e1", "First")).await.unwrap();
        store.save_entry(&entry("e1", "Updated")).await.unwrap();

        assert_eq!(store.count(Table::Entries).await.unwrap(), 1);
        let row = store.entry("e1").await.unwrap().unwrap();
        assert!(row.data.contains("Updated"));
        assert_eq!(row.collection, "pages");
        assert_eq!(row.origin_id, None);
    }

    #[tokio::test]
    async fn test_entry_write_preserves_file_timestamps() {
        let store = SqliteStore::connect_memory().await.unwrap();
        let entry = entry("e1", "First");

        store.save_entry(&entry).await.unwrap();

        let row = store.entry("e1").await.unwrap().unwrap();
        assert_eq!(row.created_at, entry.last_modified);
        assert_eq!(row.updated_at, entry.last_modified);
    }

    #[tokio::test]
    async fn test_blueprint_upsert_keys_on_namespace_and_handle() {
        let store = SqliteStore::connect_memory().await.unwrap();
        let modified = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let namespaced = Blueprint {
            namespace: Some("articles".to_string()),
            handle: "seo".to_string(),
            hidden: None,
            order: None,
            data: serde_yaml::from_str("title: Seo\n").unwrap(),
            last_modified: modified,
        };
        let bare = Blueprint {
            namespace: None,
            ..namespaced.clone()
        };

        store.save_blueprint(&namespaced).await.unwrap();
        store.save_blueprint(&bare).await.unwrap();
        store.save_blueprint(&bare).await.unwrap();

        assert_eq!(store.count(Table::Blueprints).await.unwrap(), 2);
        assert!(store
            .blueprint(Some("articles"), "seo")
            .await
            .unwrap()
            .is_some());
        assert!(store.blueprint(None, "seo").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_nav_tree_upsert_keys_on_handle_and_site() {
        let store = SqliteStore::connect_memory().await.unwrap();
        let modified = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let tree = NavTree {
            handle: "header".to_string(),
            site: "default".to_string(),
            tree: serde_yaml::from_str("tree: []\n").unwrap(),
            last_modified: modified,
        };
        let translated = NavTree {
            site: "fr".to_string(),
            ..tree.clone()
        };

        store.save_tree(&tree).await.unwrap();
        store.save_tree(&tree).await.unwrap();
        store.save_tree(&translated).await.unwrap();

        assert_eq!(store.count(Table::NavTrees).await.unwrap(), 2);
        assert!(store.nav_tree("header", "fr").await.unwrap().is_some());
    }
}
