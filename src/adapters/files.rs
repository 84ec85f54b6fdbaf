use crate::domain::model::{Entry, Nav, NavTree, Origin, SchemaFile};
use crate::domain::ports::{EntrySource, NavSource, SchemaFiles};
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn last_modified(path: &Path) -> Result<DateTime<Utc>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(modified.into())
}

fn rel_path_without_extension(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// All `.yaml` files under a root, recursively, paths made relative.
pub struct YamlDir {
    root: PathBuf,
}

impl YamlDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SchemaFiles for YamlDir {
    async fn files(&self) -> Result<Vec<SchemaFile>> {
        if !self.root.is_dir() {
            tracing::warn!("{} does not exist, nothing to import", self.root.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for walked in WalkDir::new(&self.root).sort_by_file_name() {
            let walked = walked.map_err(std::io::Error::from)?;
            if !walked.file_type().is_file() {
                continue;
            }

            let path = walked.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }

            let Some(rel_path) = rel_path_without_extension(&self.root, path) else {
                continue;
            };

            files.push(SchemaFile {
                rel_path,
                contents: fs::read_to_string(path)?,
                last_modified: last_modified(path)?,
            });
        }

        Ok(files)
    }
}

/// Entries read from a collections tree: `<root>/<collection>/<slug>.md` with
/// YAML front matter, or `.yaml` files holding the front matter alone.
pub struct FileEntrySource {
    root: PathBuf,
}

impl FileEntrySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_entry(&self, path: &Path, bare_yaml: bool) -> Result<Entry> {
        let contents = fs::read_to_string(path)?;
        let (front, body) = if bare_yaml {
            (contents.as_str(), "")
        } else {
            split_front_matter(&contents).ok_or_else(|| ImportError::SourceError {
                message: format!("{} has no front matter", path.display()),
            })?
        };

        let mut data: HashMap<String, serde_json::Value> = serde_yaml::from_str(front)?;

        let id = match data.remove("id") {
            Some(serde_json::Value::String(id)) => id,
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => {
                return Err(ImportError::SourceError {
                    message: format!("{} is missing an id", path.display()),
                })
            }
        };

        let origin = match data.remove("origin") {
            Some(serde_json::Value::String(origin)) => Origin::Id(origin),
            Some(serde_json::Value::Number(origin)) => Origin::Id(origin.to_string()),
            _ => Origin::None,
        };

        let published = match data.remove("published") {
            Some(serde_json::Value::Bool(published)) => published,
            _ => true,
        };

        if !body.is_empty() {
            data.insert(
                "content".to_string(),
                serde_json::Value::String(body.to_string()),
            );
        }

        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let mut components = rel.components();
        let first = components.next();
        let collection = if components.next().is_some() {
            first
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            "default".to_string()
        };

        let slug = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Entry {
            id,
            collection,
            slug,
            origin,
            published,
            last_modified: last_modified(path)?,
            data,
        })
    }
}

#[async_trait]
impl EntrySource for FileEntrySource {
    async fn all_entries(&self) -> Result<Vec<Entry>> {
        if !self.root.is_dir() {
            tracing::warn!("{} does not exist, nothing to import", self.root.display());
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for walked in WalkDir::new(&self.root).sort_by_file_name() {
            let walked = walked.map_err(std::io::Error::from)?;
            if !walked.file_type().is_file() {
                continue;
            }

            let path = walked.path();
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("md") => entries.push(self.read_entry(path, false)?),
                Some("yaml") => entries.push(self.read_entry(path, true)?),
                _ => {}
            }
        }

        Ok(entries)
    }
}

fn split_front_matter(contents: &str) -> Option<(&str, &str)> {
    let rest = contents.strip_prefix("---")?;
    let (front, body) = rest.split_once("\n---")?;
    let body = body.strip_prefix('\n').unwrap_or(body);
    Some((front, body))
}

/// Navs from `<navs root>/<handle>.yaml`, trees from
/// `<trees root>/<site>/<handle>.yaml`.
pub struct FileNavSource {
    navs_root: PathBuf,
    trees_root: PathBuf,
}

impl FileNavSource {
    pub fn new(navs_root: impl Into<PathBuf>, trees_root: impl Into<PathBuf>) -> Self {
        Self {
            navs_root: navs_root.into(),
            trees_root: trees_root.into(),
        }
    }

    fn trees_for(&self, handle: &str) -> Result<Vec<NavTree>> {
        let mut trees = Vec::new();
        if !self.trees_root.is_dir() {
            return Ok(trees);
        }

        let mut site_dirs: Vec<PathBuf> = fs::read_dir(&self.trees_root)?
            .filter_map(|dir_entry| dir_entry.ok())
            .map(|dir_entry| dir_entry.path())
            .filter(|path| path.is_dir())
            .collect();
        site_dirs.sort();

        for site_dir in site_dirs {
            let Some(site) = site_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
            else {
                continue;
            };

            let path = site_dir.join(format!("{}.yaml", handle));
            if !path.is_file() {
                continue;
            }

            trees.push(NavTree {
                handle: handle.to_string(),
                site,
                tree: serde_yaml::from_str(&fs::read_to_string(&path)?)?,
                last_modified: last_modified(&path)?,
            });
        }

        Ok(trees)
    }
}

#[async_trait]
impl NavSource for FileNavSource {
    async fn all_navs(&self) -> Result<Vec<Nav>> {
        if !self.navs_root.is_dir() {
            tracing::warn!(
                "{} does not exist, nothing to import",
                self.navs_root.display()
            );
            return Ok(Vec::new());
        }

        let mut nav_paths: Vec<PathBuf> = fs::read_dir(&self.navs_root)?
            .filter_map(|dir_entry| dir_entry.ok())
            .map(|dir_entry| dir_entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("yaml")
            })
            .collect();
        nav_paths.sort();

        let mut navs = Vec::new();
        for path in nav_paths {
            let Some(handle) = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
            else {
                continue;
            };

            let data: serde_yaml::Value = serde_yaml::from_str(&fs::read_to_string(&path)?)?;
            let title = data
                .get("title")
                .and_then(|title| title.as_str())
                .map(String::from);
            let trees = self.trees_for(&handle)?;

            navs.push(Nav {
                handle,
                title,
                data,
                last_modified: last_modified(&path)?,
                trees,
            });
        }

        Ok(navs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_split_front_matter() {
        let (front, body) = split_front_matter("---\nid: abc\n---\nHello\n").unwrap();
        assert_eq!(front.trim(), "id: abc");
        assert_eq!(body, "Hello\n");

        assert!(split_front_matter("no delimiters here").is_none());
    }

    #[tokio::test]
    async fn test_yaml_dir_lists_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "seo.yaml", "title: Seo\n");
        write(dir.path(), "articles/post.yaml", "title: Post\n");
        write(dir.path(), "articles/notes.txt", "not yaml\n");

        let files = YamlDir::new(dir.path()).files().await.unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["articles/post", "seo"]);
    }

    #[tokio::test]
    async fn test_yaml_dir_missing_root_is_empty() {
        let files = YamlDir::new("/nonexistent/nowhere").files().await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_entry_source_parses_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "blog/hello.md",
            "---\nid: abc-1\ntitle: Hello\norigin: abc-0\npublished: false\n---\nBody text\n",
        );

        let entries = FileEntrySource::new(dir.path()).all_entries().await.unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.id, "abc-1");
        assert_eq!(entry.collection, "blog");
        assert_eq!(entry.slug, "hello");
        assert_eq!(entry.origin_id(), Some("abc-0"));
        assert!(!entry.published);
        assert_eq!(
            entry.data.get("title").unwrap(),
            &serde_json::Value::String("Hello".to_string())
        );
        assert_eq!(
            entry.data.get("content").unwrap(),
            &serde_json::Value::String("Body text\n".to_string())
        );
        assert!(!entry.data.contains_key("id"));
        assert!(!entry.data.contains_key("origin"));
    }

    #[tokio::test]
    async fn test_entry_source_accepts_bare_yaml_entries() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blog/hello.yaml", "id: abc-2\ntitle: Hello\n");

        let entries = FileEntrySource::new(dir.path()).all_entries().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "abc-2");
        assert!(entries[0].published);
        assert!(matches!(entries[0].origin, Origin::None));
    }

    #[tokio::test]
    async fn test_entry_without_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blog/broken.md", "---\ntitle: No id\n---\n");

        let result = FileEntrySource::new(dir.path()).all_entries().await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_nav_source_pairs_navs_with_site_trees() {
        let dir = tempfile::tempdir().unwrap();
        let navs_root = dir.path().join("navigation");
        let trees_root = dir.path().join("trees/navigation");
        write(&navs_root, "header.yaml", "title: Header\n");
        write(
            &trees_root,
            "default/header.yaml",
            "tree:\n  - id: abc-1\n",
        );
        write(&trees_root, "fr/header.yaml", "tree:\n  - id: abc-2\n");

        let navs = FileNavSource::new(&navs_root, &trees_root)
            .all_navs()
            .await
            .unwrap();

        assert_eq!(navs.len(), 1);
        assert_eq!(navs[0].handle, "header");
        assert_eq!(navs[0].title.as_deref(), Some("Header"));
        let sites: Vec<&str> = navs[0].trees.iter().map(|t| t.site.as_str()).collect();
        assert_eq!(sites, vec!["default", "fr"]);
    }
}
