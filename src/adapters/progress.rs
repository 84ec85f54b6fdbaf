use crate::domain::ports::Progress;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Terminal progress: one bar per phase, a banner line between phases.
pub struct ConsoleProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("[{bar:40}] {pos}/{len}")
            .unwrap()
            .progress_chars("=>-")
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ConsoleProgress {
    fn phase(&self, label: &str, total: u64) {
        self.finish();
        println!("{}", label);

        let bar = ProgressBar::new(total);
        bar.set_style(Self::style());
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn tick(&self) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

/// No output; used by tests and anywhere progress rendering is unwanted.
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn phase(&self, _label: &str, _total: u64) {}
    fn tick(&self) {}
    fn finish(&self) {}
}
