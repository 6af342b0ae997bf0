//! Filesystem artifact sink.
//!
//! Writes the pipeline's diagnostic artifacts (payload dumps, screenshots)
//! into a caller-chosen directory.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use postrake_fetch::ArtifactSink;

/// Artifact sink writing each blob as one file under a directory.
#[derive(Debug)]
pub struct DirArtifactSink {
    dir: PathBuf,
}

impl DirArtifactSink {
    /// Creates the sink, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Keeps artifact names from escaping the target directory.
    fn sanitize(name: &str) -> String {
        name.chars()
            .map(|c| if c == '/' || c == '\\' || c == ':' { '_' } else { c })
            .collect()
    }
}

#[async_trait]
impl ArtifactSink for DirArtifactSink {
    async fn store(&self, name: &str, _content_type: &str, bytes: &[u8]) -> std::io::Result<()> {
        let path = self.dir.join(Self::sanitize(name));
        debug!(path = %path.display(), size = bytes.len(), "Storing artifact");
        tokio::fs::write(path, bytes).await
    }
}

// ============================================================================
// Tests
// ============================================================================
