use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Cheap fingerprint of the persisted log, compared to spot outside edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    pub stamp: u128,
    pub len: u64,
}

/// Where the transcript log lives.
#[async_trait]
pub trait TranscriptBackend: Send + Sync {
    async fn append(&self, entry: &str) -> io::Result<()>;

    async fn read_all(&self) -> io::Result<String>;

    /// Replaces the whole log.
    async fn rewrite(&self, content: &str) -> io::Result<()>;

    async fn revision(&self) -> io::Result<Revision>;
}

/// Flat text file, one `[<peer>]: <text>` entry per line.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Opens the log, creating an empty file when it does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self { path })
    }
}

#[async_trait]
impl TranscriptBackend for FileBackend {
    async fn append(&self, entry: &str) -> io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }

    async fn read_all(&self) -> io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }

    async fn rewrite(&self, content: &str) -> io::Result<()> {
        tokio::fs::write(&self.path, content).await
    }

    async fn revision(&self) -> io::Result<Revision> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        let stamp = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Ok(Revision {
            stamp,
            len: metadata.len(),
        })
    }
}

#[derive(Default)]
struct MemoryLog {
    content: String,
    generation: u128,
    failing: bool,
}

/// In-process log, shared between clones so a test can play the outside editor.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    log: Arc<Mutex<MemoryLog>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            log: Arc::new(Mutex::new(MemoryLog {
                content: content.into(),
                ..Default::default()
            })),
        }
    }

    /// Overwrites the log the way another process would.
    pub async fn edit_externally(&self, content: impl Into<String>) {
        let mut log = self.log.lock().await;
        log.content = content.into();
        log.generation += 1;
    }

    /// Makes every subsequent operation fail with an I/O error.
    pub async fn set_failing(&self, failing: bool) {
        self.log.lock().await.failing = failing;
    }

    pub async fn content(&self) -> String {
        self.log.lock().await.content.clone()
    }
}

fn unavailable() -> io::Error {
    io::Error::other("transcript backend unavailable")
}

#[async_trait]
impl TranscriptBackend for MemoryBackend {
    async fn append(&self, entry: &str) -> io::Result<()> {
        let mut log = self.log.lock().await;
        if log.failing {
            return Err(unavailable());
        }
        log.content.push_str(entry);
        log.generation += 1;
        Ok(())
    }

    async fn read_all(&self) -> io::Result<String> {
        let log = self.log.lock().await;
        if log.failing {
            return Err(unavailable());
        }
        Ok(log.content.clone())
    }

    async fn rewrite(&self, content: &str) -> io::Result<()> {
        let mut log = self.log.lock().await;
        if log.failing {
            return Err(unavailable());
        }
        log.content = content.to_string();
        log.generation += 1;
        Ok(())
    }

    async fn revision(&self) -> io::Result<Revision> {
        let log = self.log.lock().await;
        if log.failing {
            return Err(unavailable());
        }
        Ok(Revision {
            stamp: log.generation,
            len: log.content.len() as u64,
        })
    }
}
