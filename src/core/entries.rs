use crate::core::{Entry, EntrySink, EntrySource, Progress};
use crate::utils::error::Result;
use std::collections::HashMap;

/// Imports entries in localization-dependency order.
///
/// Origin entries (no origin of their own) go first. After that, each pass
/// writes exactly the entries whose origin was written in the previous pass,
/// so chained localizations unlock one generation at a time. Entries whose
/// origin never shows up are written unordered at the end rather than dropped.
pub struct EntryImporter<S, K, P> {
    source: S,
    sink: K,
    progress: P,
}

impl<S: EntrySource, K: EntrySink, P: Progress> EntryImporter<S, K, P> {
    pub fn new(source: S, sink: K, progress: P) -> Self {
        Self {
            source,
            sink,
            progress,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let mut entries: HashMap<String, Entry> = self
            .source
            .all_entries()
            .await?
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();

        tracing::info!("Importing {} entries", entries.len());

        let root_ids: Vec<String> = entries
            .values()
            .filter(|entry| !entry.has_origin())
            .map(|entry| entry.id.clone())
            .collect();

        let mut processed: HashMap<String, Entry> = HashMap::with_capacity(root_ids.len());

        if !root_ids.is_empty() {
            self.progress
                .phase("Importing origin entries", root_ids.len() as u64);
            for id in root_ids {
                if let Some(entry) = entries.remove(&id) {
                    self.sink.save_entry(&entry).await?;
                    self.progress.tick();
                    processed.insert(id, entry);
                }
            }
            self.progress.finish();
        }

        loop {
            let ready: Vec<String> = entries
                .values()
                .filter(|entry| {
                    entry
                        .origin_id()
                        .is_some_and(|origin| processed.contains_key(origin))
                })
                .map(|entry| entry.id.clone())
                .collect();

            if ready.is_empty() {
                break;
            }

            self.progress
                .phase("Importing localized entries", ready.len() as u64);
            let mut pass: HashMap<String, Entry> = HashMap::with_capacity(ready.len());
            for id in ready {
                if let Some(entry) = entries.remove(&id) {
                    self.sink.save_entry(&entry).await?;
                    self.progress.tick();
                    pass.insert(id, entry);
                }
            }
            self.progress.finish();

            // The next pass resolves origins against this pass only; earlier
            // generations are already persisted and no longer needed for lookup.
            processed = pass;
        }

        if !entries.is_empty() {
            tracing::warn!(
                "{} entries have origins that never resolved, importing unordered",
                entries.len()
            );
            self.progress
                .phase("Importing remaining localized entries", entries.len() as u64);
            for entry in entries.values() {
                self.sink.save_entry(entry).await?;
                self.progress.tick();
            }
            self.progress.finish();
        }

        tracing::info!("Entries imported");
        Ok(())
    }
}
