//! Chain list hot reload.
//!
//! # Responsibilities
//! - Re-read the config file when it changes on disk
//! - Publish the new config only when its `[[chains]]` list differs from the last one published
//!
//! # Design Decisions
//! - An unreadable or invalid file is logged and skipped; the running chain list stays
//! - Edits outside `[[chains]]` (log level, comments) do not trigger a registry swap

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::{ChainConfig, RouterConfig};

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Follows a config file and forwards configs whose chain list changed.
///
/// Feed the receiver to [`ChainRegistry::follow_updates`](crate::chains::ChainRegistry::follow_updates)
/// to keep a registry in sync with the file.
#[derive(Clone)]
pub struct ConfigWatcher {
    path: PathBuf,
    published: Arc<Mutex<Vec<ChainConfig>>>,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// `current` is the config already in use; its chains are the baseline.
    pub fn new(path: &Path, current: &RouterConfig) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            published: Arc::new(Mutex::new(current.chains.clone())),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Events stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let reloader = self.clone();

        let mut handle = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    reloader.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(POLL_INTERVAL),
        )?;
        handle.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Watching config for chain changes");
        Ok(handle)
    }

    /// Re-read the file once. Returns true if a new chain list was published.
    pub fn reload(&self) -> bool {
        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Config reload failed, keeping current chains"
                );
                return false;
            }
        };

        let mut published = match self.published.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *published == config.chains {
            tracing::debug!("Config changed but chain list did not");
            return false;
        }

        let added: Vec<&str> = config
            .chains
            .iter()
            .filter(|c| !published.iter().any(|p| p.name == c.name))
            .map(|c| c.name.as_str())
            .collect();
        let removed: Vec<&str> = published
            .iter()
            .filter(|p| !config.chains.iter().any(|c| c.name == p.name))
            .map(|p| p.name.as_str())
            .collect();
        tracing::info!(?added, ?removed, chains = config.chains.len(), "Chain list changed");

        *published = config.chains.clone();
        self.update_tx.send(config).is_ok()
    }
}
