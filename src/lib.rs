pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::db::SqliteStore;
pub use crate::adapters::files::{FileEntrySource, FileNavSource, YamlDir};
pub use crate::adapters::progress::{ConsoleProgress, SilentProgress};
pub use crate::config::{Cli, Command, ImportConfig};
pub use crate::core::{blueprints::BlueprintImporter, entries::EntryImporter, navs::NavImporter};
pub use crate::utils::error::{ImportError, Result};
