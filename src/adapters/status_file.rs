//! Status snapshot file.
//!
//! Writes the latest [`SystemSnapshot`] as pretty JSON for dashboards.
//! The write goes to a sibling temp file that is then renamed over the
//! target, so a reader never sees a partial document.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::app::state::SystemSnapshot;
use crate::error::OutputError;

pub struct StatusFile {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl StatusFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        Self {
            path,
            tmp_path: PathBuf::from(tmp),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, snapshot: &SystemSnapshot) -> Result<(), OutputError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&self.tmp_path, json)?;
        fs::rename(&self.tmp_path, &self.path)?;
        Ok(())
    }

    /// Like [`write`](Self::write) but logs failures instead of returning them.
    pub fn publish(&self, snapshot: &SystemSnapshot) {
        if let Err(e) = self.write(snapshot) {
            warn!("Status file {} not updated: {}", self.path.display(), e);
        }
    }
}
