use crate::core::{NavSink, NavSource, Progress};
use crate::utils::error::Result;

/// Imports navigation definitions and their per-site trees. A tree always
/// follows its owning nav; the nesting is one level, so no convergence loop.
pub struct NavImporter<S, K, P> {
    source: S,
    sink: K,
    progress: P,
}

impl<S: NavSource, K: NavSink, P: Progress> NavImporter<S, K, P> {
    pub fn new(source: S, sink: K, progress: P) -> Self {
        Self {
            source,
            sink,
            progress,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let navs = self.source.all_navs().await?;

        tracing::info!("Importing {} navs", navs.len());

        self.progress.phase("Importing navs", navs.len() as u64);
        for nav in &navs {
            self.sink.save_nav(nav).await?;

            for tree in &nav.trees {
                self.sink.save_tree(tree).await?;
            }

            self.progress.tick();
        }
        self.progress.finish();

        tracing::info!("Navs imported");
        Ok(())
    }
}
