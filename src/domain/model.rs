use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single piece of localizable content. An entry keyed off another entry's id
/// is part of a localization chain and must be written after the entry it
/// points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub collection: String,
    pub slug: String,
    pub origin: Origin,
    pub published: bool,
    pub last_modified: DateTime<Utc>,
    pub data: HashMap<String, serde_json::Value>,
}

impl Entry {
    pub fn has_origin(&self) -> bool {
        self.origin.id().is_some()
    }

    /// Identity of the default-locale entry this one was localized from.
    pub fn origin_id(&self) -> Option<&str> {
        self.origin.id()
    }
}

/// An entry's origin as it appears in the source: absent, a raw id, or an
/// already-materialized reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Origin {
    #[default]
    None,
    Id(String),
    Entry(EntryRef),
}

impl Origin {
    pub fn id(&self) -> Option<&str> {
        match self {
            Origin::None => None,
            Origin::Id(id) => Some(id),
            Origin::Entry(reference) => Some(reference.id()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRef {
    id: String,
}

impl EntryRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One schema file read from disk, path already made relative to its root and
/// stripped of the extension.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    pub rel_path: String,
    pub contents: String,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub namespace: Option<String>,
    pub handle: String,
    pub hidden: Option<serde_yaml::Value>,
    pub order: Option<serde_yaml::Value>,
    pub data: serde_yaml::Value,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fieldset {
    pub handle: String,
    pub data: serde_yaml::Value,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nav {
    pub handle: String,
    pub title: Option<String>,
    pub data: serde_yaml::Value,
    pub last_modified: DateTime<Utc>,
    pub trees: Vec<NavTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavTree {
    pub handle: String,
    pub site: String,
    pub tree: serde_yaml::Value,
    pub last_modified: DateTime<Utc>,
}
