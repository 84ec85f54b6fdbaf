pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{validate_existing_dir, validate_non_empty_string, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toml_config::TomlConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite:cms.db?mode=rwc";
const DEFAULT_CONTENT_ROOT: &str = "./content";

#[derive(Debug, Parser)]
#[command(name = "cms-import")]
#[command(about = "Imports file based CMS content into a database")]
pub struct Cli {
    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Database connection URL")]
    pub database_url: Option<String>,

    #[arg(long, help = "Root of the file based content tree")]
    pub content_root: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import file based entries into the database
    Entries,
    /// Import file based blueprints and fieldsets into the database
    Blueprints,
    /// Import file based navs into the database
    Navs,
}

/// Fully resolved configuration: CLI flags over config file over defaults.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub database_url: String,
    pub content_root: PathBuf,
}

impl ImportConfig {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let database_url = cli
            .database_url
            .clone()
            .or_else(|| file.database_url().map(String::from))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let content_root = cli
            .content_root
            .clone()
            .or_else(|| file.content_root().map(String::from))
            .unwrap_or_else(|| DEFAULT_CONTENT_ROOT.to_string());

        Ok(Self {
            database_url,
            content_root: PathBuf::from(content_root),
        })
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.content_root.join("collections")
    }

    pub fn blueprints_dir(&self) -> PathBuf {
        self.content_root.join("blueprints")
    }

    pub fn fieldsets_dir(&self) -> PathBuf {
        self.content_root.join("fieldsets")
    }

    pub fn navs_dir(&self) -> PathBuf {
        self.content_root.join("navigation")
    }

    pub fn trees_dir(&self) -> PathBuf {
        self.content_root.join("trees").join("navigation")
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("database_url", &self.database_url)?;
        validate_existing_dir("content_root", &self.content_root.to_string_lossy())?;
        Ok(())
    }
}
