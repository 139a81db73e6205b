use crate::transcript::backend::{Revision, TranscriptBackend};
use agora_core::{PeerId, TranscriptLine, purge_peer_lines};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Append-only transcript log plus the latest line each peer said.
///
/// The store never talks to channels itself. Every mutating call hands back
/// the full log content so the caller can publish it from one place.
pub struct TranscriptStore {
    backend: Box<dyn TranscriptBackend>,
    cache: String,
    last_revision: Option<Revision>,
    live: BTreeMap<PeerId, String>,
}

impl TranscriptStore {
    /// Loads the current log. A backend that cannot be read starts the store empty.
    pub async fn load(backend: Box<dyn TranscriptBackend>) -> Self {
        let mut store = Self {
            backend,
            cache: String::new(),
            last_revision: None,
            live: BTreeMap::new(),
        };
        store.refresh().await;
        store
    }

    pub fn content(&self) -> &str {
        &self.cache
    }

    pub fn live_lines(&self) -> &BTreeMap<PeerId, String> {
        &self.live
    }

    pub async fn append(&mut self, line: TranscriptLine) -> String {
        let entry = line.to_log_entry();
        self.live.insert(line.peer_id, line.text);

        match self.backend.append(&entry).await {
            Ok(()) => {
                info!("Transcript saved for {}", line.peer_id);
                self.refresh().await;
            }
            Err(e) => {
                error!("Failed to append transcript for {}: {}", line.peer_id, e);
                self.cache.push_str(&entry);
            }
        }

        self.cache.clone()
    }

    /// Removes every line `peer_id` ever said from the persisted log.
    pub async fn purge(&mut self, peer_id: &PeerId) -> String {
        self.live.remove(peer_id);

        let current = match self.backend.read_all().await {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to read transcript log before purge: {}", e);
                self.cache.clone()
            }
        };

        let purged = purge_peer_lines(&current, peer_id);
        if let Err(e) = self.backend.rewrite(&purged).await {
            error!("Failed to rewrite transcript log after {} left: {}", peer_id, e);
        } else {
            info!("Transcripts updated after {} left", peer_id);
        }

        self.cache = purged;
        self.last_revision = self.backend.revision().await.ok();
        self.cache.clone()
    }

    /// Returns the new content when someone else modified the log since we last looked.
    pub async fn poll_external_change(&mut self) -> Option<String> {
        let revision = match self.backend.revision().await {
            Ok(revision) => revision,
            Err(e) => {
                warn!("Cannot stat transcript log: {}", e);
                return None;
            }
        };

        if self.last_revision == Some(revision) {
            return None;
        }

        info!("Transcript log changed outside the coordinator");
        self.refresh().await;
        Some(self.cache.clone())
    }

    async fn refresh(&mut self) {
        match self.backend.read_all().await {
            Ok(content) => self.cache = content,
            Err(e) => error!("Failed to read transcript log: {}", e),
        }
        self.last_revision = self.backend.revision().await.ok();
    }
}
