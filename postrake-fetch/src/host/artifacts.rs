//! Diagnostic artifact sink.
//!
//! On unparseable payloads the pipeline emits raw payload dumps and
//! screenshots for offline inspection. The core only decides *when* to
//! emit; storage is the caller's concern, injected as an [`ArtifactSink`].

use std::sync::Mutex;

use async_trait::async_trait;

/// Destination for diagnostic artifacts (opaque blobs).
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Stores one artifact under the given name.
    async fn store(&self, name: &str, content_type: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Sink that drops everything. The default when the caller wires nothing.
#[derive(Debug, Default)]
pub struct DiscardSink;

#[async_trait]
impl ArtifactSink for DiscardSink {
    async fn store(&self, _name: &str, _content_type: &str, _bytes: &[u8]) -> std::io::Result<()> {
        Ok(())
    }
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    stored: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all stored artifacts, in order.
    pub fn names(&self) -> Vec<String> {
        self.stored
            .lock()
            .expect("artifact sink lock")
            .iter()
            .map(|(name, _, _)| name.clone())
            .collect()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.stored.lock().expect("artifact sink lock").len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn store(&self, name: &str, content_type: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.stored
            .lock()
            .expect("artifact sink lock")
            .push((name.to_string(), content_type.to_string(), bytes.to_vec()));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.store("a.html", "text/html", b"<html>").await.unwrap();
        sink.store("b.png", "image/png", &[1, 2, 3]).await.unwrap();

        assert_eq!(sink.names(), vec!["a.html", "b.png"]);
        assert_eq!(sink.len(), 2);
    }
}
