use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Entries = HashMap<String, (SystemTime, SystemTime)>;

/// Revoked token ids (`jti`) and session ids (`sid`), each kept until expiry.
///
/// Cloning is cheap; clones share the same list.
#[derive(Debug, Clone)]
pub struct RevocationList {
    /// id -> (expiration, revocation time)
    revoked: Arc<Mutex<Entries>>,
    /// Size at which expired entries are pruned eagerly
    max_size: usize,
}

impl Default for RevocationList {
    fn default() -> Self {
        Self::new()
    }
}

impl RevocationList {
    pub fn new() -> Self {
        Self::with_max_size(10_000)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            revoked: Arc::new(Mutex::new(HashMap::new())),
            max_size: max_size.max(1),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        // the map stays consistent even if a holder panicked
        self.revoked.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Revoke `token_id` until `expiration`.
    ///
    /// At capacity, expired entries are dropped first. Live revocations are
    /// never evicted; the list grows past `max_size` and logs a warning.
    pub fn revoke(&self, token_id: &str, expiration: SystemTime) {
        let mut entries = self.entries();

        if entries.len() >= self.max_size && !entries.contains_key(token_id) {
            remove_expired(&mut entries);

            if entries.len() >= self.max_size {
                warn!(
                    "Revocation list holds {} live entries, above the soft limit of {}",
                    entries.len() + 1,
                    self.max_size
                );
            }
        }

        entries.insert(token_id.to_string(), (expiration, SystemTime::now()));
        info!("Token revoked: {}", token_id);
    }

    pub fn is_revoked(&self, token_id: &str) -> bool {
        self.entries().contains_key(token_id)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries whose token has expired anyway; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        remove_expired(&mut self.entries())
    }

    /// Periodically prune expired entries on the tokio runtime
    pub fn spawn_cleanup_task(&self, every: Duration) -> JoinHandle<()> {
        let list = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = list.cleanup_expired();
                debug!("Revocation cleanup removed {}, {} remain", removed, list.len());
            }
        })
    }
}

fn remove_expired(entries: &mut Entries) -> usize {
    let now = SystemTime::now();
    let before = entries.len();
    entries.retain(|_, (expiration, _)| *expiration > now);

    let removed = before - entries.len();
    if removed > 0 {
        debug!("Removed {} expired revocations", removed);
    }
    removed
}
