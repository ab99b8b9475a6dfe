//! Scene-file hot reload

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::warn;

/// Watches one scene file and hands back its new contents after edits
pub struct SceneWatcher {
    path: PathBuf,
    #[allow(dead_code)] // Kept alive to maintain file watching
    watcher: Option<RecommendedWatcher>,
    receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl SceneWatcher {
    pub fn new(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            // The receiver is gone during shutdown; nothing to do then
            let _ = tx.send(res);
        })
        .map_err(|e| warn!(error = %e, "file watching unavailable"))
        .ok();

        if let Some(w) = watcher.as_mut() {
            if let Err(e) = w.watch(&path, RecursiveMode::NonRecursive) {
                warn!(path = %path.display(), error = %e, "cannot watch scene file");
            }
        }

        Self {
            path,
            watcher,
            receiver: rx,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events. Returns the file's text if it was modified.
    pub fn poll(&self) -> Option<String> {
        let mut modified = false;
        while let Ok(event) = self.receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    if paths.iter().any(|p| p.ends_with(&self.path) || self.path.ends_with(p)) {
                        modified = true;
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "file watcher error"),
            }
        }

        if !modified {
            return None;
        }
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot re-read scene file");
                None
            }
        }
    }
}
