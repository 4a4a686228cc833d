//! Persistence of composition results between requests.
//!
//! Each saved result lands in its own temporary `.bed` file. The store
//! remembers the most recent file per session token; a path is handed out
//! only while the file still exists.

use std::path::PathBuf;
use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::info;

use crate::collection::IntervalCollection;
use crate::error::{RemusError, Result};

/// Opaque handle identifying one client session.
pub type SessionToken = String;

#[derive(Debug)]
pub struct ResultStore {
    dir: Option<PathBuf>,
    last_results: Mutex<FxHashMap<SessionToken, PathBuf>>,
    rng: Mutex<SmallRng>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ResultStore {
    /// Store writing into `dir`, or the system temp directory when `None`.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            last_results: Mutex::new(FxHashMap::default()),
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// A fresh random session token (32 hex digits).
    pub fn new_token(&self) -> SessionToken {
        let value: u128 = match self.rng.lock() {
            Ok(mut rng) => rng.gen(),
            Err(poisoned) => poisoned.into_inner().gen(),
        };
        format!("{:032x}", value)
    }

    /// Write `collection` to a new temporary BED file and record it as the
    /// session's last result.
    pub fn save(&self, token: &str, collection: &IntervalCollection) -> Result<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("remus-").suffix(".bed");
        let file = match self.dir {
            Some(ref dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        collection.save_as(file.path())?;
        let (_, path) = file.keep().map_err(|e| RemusError::Io(e.error))?;

        info!(path = %path.display(), features = collection.len(), "result saved");
        self.last_results()
            .insert(token.to_string(), path.clone());
        Ok(path)
    }

    /// Path of the session's last saved result, if the file is still there.
    pub fn last_result(&self, token: &str) -> Option<PathBuf> {
        self.last_results()
            .get(token)
            .filter(|path| path.is_file())
            .cloned()
    }

    fn last_results(&self) -> std::sync::MutexGuard<'_, FxHashMap<SessionToken, PathBuf>> {
        self.last_results
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
