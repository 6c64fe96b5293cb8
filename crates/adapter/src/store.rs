//! Best-score persistence
//!
//! The file holds a single decimal integer. A missing or unreadable file reads
//! as zero. Write failures are logged and otherwise ignored so a read-only disk
//! never interrupts a game.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use hexfill_core::BestScoreStore;

#[derive(Debug, Clone)]
pub struct FileBestScore {
    path: PathBuf,
    cached: u32,
}

impl FileBestScore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = read_score(&path);
        debug!("best score {} loaded from {}", cached, path.display());
        Self { path, cached }
    }
}

fn read_score(path: &Path) -> u32 {
    match fs::read_to_string(path) {
        Ok(text) => match text.trim().parse() {
            Ok(score) => score,
            Err(e) => {
                warn!("ignoring malformed best score in {}: {}", path.display(), e);
                0
            }
        },
        Err(_) => 0,
    }
}

impl BestScoreStore for FileBestScore {
    fn get(&self) -> u32 {
        self.cached
    }

    fn set(&mut self, score: u32) {
        self.cached = score;
        if let Err(e) = fs::write(&self.path, format!("{score}\n")) {
            warn!("failed to persist best score to {}: {}", self.path.display(), e);
        }
    }
}

/// One store shared by every connection
///
/// `set` only ever raises the stored value, so a session that started with an
/// older best cannot lower what another session recorded.
#[derive(Clone)]
pub struct SharedBestScore(Arc<Mutex<Box<dyn BestScoreStore + Send>>>);

impl SharedBestScore {
    pub fn new<S: BestScoreStore + Send + 'static>(store: S) -> Self {
        Self(Arc::new(Mutex::new(Box::new(store))))
    }

    pub fn in_memory() -> Self {
        Self::new(hexfill_core::MemoryBestScore::default())
    }
}

impl std::fmt::Debug for SharedBestScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedBestScore").field(&self.get()).finish()
    }
}

impl BestScoreStore for SharedBestScore {
    fn get(&self) -> u32 {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).get()
    }

    fn set(&mut self, score: u32) {
        let mut inner = self.0.lock().unwrap_or_else(|e| e.into_inner());
        if score > inner.get() {
            inner.set(score);
        }
    }
}
