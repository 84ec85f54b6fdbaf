use crate::core::{Blueprint, Fieldset, Progress, SchemaFile, SchemaFiles, SchemaSink};
use crate::utils::error::Result;
use serde_yaml::Value;

/// Imports blueprint and fieldset schema files. Identity comes from each
/// file's path relative to its root; the files themselves are independent, so
/// no ordering is involved.
pub struct BlueprintImporter<F, K, P> {
    blueprints: F,
    fieldsets: F,
    sink: K,
    progress: P,
}

impl<F: SchemaFiles, K: SchemaSink, P: Progress> BlueprintImporter<F, K, P> {
    pub fn new(blueprints: F, fieldsets: F, sink: K, progress: P) -> Self {
        Self {
            blueprints,
            fieldsets,
            sink,
            progress,
        }
    }

    pub async fn run(&self) -> Result<()> {
        self.import_blueprints().await?;
        self.import_fieldsets().await?;
        Ok(())
    }

    async fn import_blueprints(&self) -> Result<()> {
        let files = self.blueprints.files().await?;

        self.progress
            .phase("Importing blueprints", files.len() as u64);
        for file in files {
            let blueprint = parse_blueprint(&file)?;
            self.sink.save_blueprint(&blueprint).await?;
            self.progress.tick();
        }
        self.progress.finish();

        tracing::info!("Blueprints imported");
        Ok(())
    }

    async fn import_fieldsets(&self) -> Result<()> {
        let files = self.fieldsets.files().await?;

        self.progress.phase("Importing fieldsets", files.len() as u64);
        for file in files {
            let fieldset = parse_fieldset(&file)?;
            self.sink.save_fieldset(&fieldset).await?;
            self.progress.tick();
        }
        self.progress.finish();

        tracing::info!("Fieldsets imported");
        Ok(())
    }
}

fn parse_blueprint(file: &SchemaFile) -> Result<Blueprint> {
    let (namespace, handle) = namespace_and_handle(&file.rel_path);

    let mut contents: Value = serde_yaml::from_str(&file.contents)?;
    stamp_section_order(&mut contents);

    let (hidden, order) = match contents.as_mapping_mut() {
        Some(mapping) => (mapping.remove("hide"), mapping.remove("order")),
        None => (None, None),
    };

    Ok(Blueprint {
        namespace,
        handle,
        hidden,
        order,
        data: contents,
        last_modified: file.last_modified,
    })
}

fn parse_fieldset(file: &SchemaFile) -> Result<Fieldset> {
    Ok(Fieldset {
        handle: file.rel_path.replace('/', "."),
        data: serde_yaml::from_str(&file.contents)?,
        last_modified: file.last_modified,
    })
}

/// `articles/seo` becomes namespace `articles`, handle `seo`; a file at the
/// root has no namespace. Dots inside path segments count as separators too.
fn namespace_and_handle(rel_path: &str) -> (Option<String>, String) {
    let dotted = rel_path.replace('/', ".");
    let mut parts: Vec<&str> = dotted.split('.').collect();
    let handle = parts.pop().unwrap_or_default().to_string();
    let namespace = parts.join(".");

    if namespace.is_empty() {
        (None, handle)
    } else {
        (Some(namespace), handle)
    }
}

/// The destination representation does not preserve list order on its own, so
/// each section is stamped with its original zero-based position.
fn stamp_section_order(contents: &mut Value) {
    let Some(sections) = contents.get_mut("sections") else {
        return;
    };

    match sections {
        Value::Sequence(items) => {
            for (count, item) in items.iter_mut().enumerate() {
                if let Value::Mapping(section) = item {
                    section.insert(Value::from("__count"), Value::from(count as u64));
                }
            }
        }
        Value::Mapping(items) => {
            for (count, (_, item)) in items.iter_mut().enumerate() {
                if let Value::Mapping(section) = item {
                    section.insert(Value::from("__count"), Value::from(count as u64));
                }
            }
        }
        _ => {}
    }
}
