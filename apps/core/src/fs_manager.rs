use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk layout under the configured data directory.
pub struct PortablePathManager {
    root: PathBuf,
}

impl PortablePathManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory itself (./data by default).
    pub fn data_dir(&self) -> &Path {
        &self.root
    }

    /// Where saved conversations go (./data/transcripts).
    pub fn transcripts_dir(&self) -> PathBuf {
        self.root.join("transcripts")
    }

    /// Create the data and transcripts directories if they don't exist.
    pub fn init(&self) -> Result<(), std::io::Error> {
        let data_path = self.data_dir();
        let transcripts_path = self.transcripts_dir();

        if !data_path.exists() {
            info!("Creating data directory: {:?}", data_path);
            fs::create_dir_all(data_path)?;
        }

        if !transcripts_path.exists() {
            info!("Creating transcripts directory: {:?}", transcripts_path);
            fs::create_dir_all(&transcripts_path)?;
        }

        Ok(())
    }
}
