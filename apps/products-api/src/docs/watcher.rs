//! Background refresh of the served Swagger document.

use axum_helpers::ShutdownCoordinator;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::loader::{DocSource, SwaggerLoader};
use crate::config::DocsConfig;

#[derive(Debug, Error)]
#[error("failed to watch {}: {source}", path.display())]
pub struct WatchError {
    path: PathBuf,
    #[source]
    source: notify::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    /// Must be non-zero.
    pub poll_interval: Duration,
    pub debounce: Duration,
}

impl From<&DocsConfig> for WatchSettings {
    fn from(config: &DocsConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            debounce: config.debounce,
        }
    }
}

/// Filesystem events for the directory holding the watched document.
struct FileEvents {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    file_name: Option<OsString>,
}

impl FileEvents {
    /// Watches the parent directory so replacing the file by rename is still seen.
    fn watch(path: &Path) -> Result<Self, WatchError> {
        let watch_error = |source| WatchError {
            path: path.to_path_buf(),
            source,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            let _ = tx.send(event);
        })
        .map_err(watch_error)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(watch_error)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            file_name: path.file_name().map(OsString::from),
        })
    }
}

/// Writes, creations and renames of `file_name`; metadata-only changes are ignored.
fn touches_file(event: &Event, file_name: Option<&OsString>) -> bool {
    let content_changed = match event.kind {
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Create(_) | EventKind::Modify(_) => true,
        _ => false,
    };

    content_changed
        && event
            .paths
            .iter()
            .any(|p| p.file_name().map(OsString::from).as_ref() == file_name)
}

/// Spawns the refresh task for `loader`: periodic polling for a remote source,
/// debounced filesystem events for a local file. Stops on shutdown.
///
/// The file watch is registered before this returns, so a failure to watch is
/// reported to the caller instead of ending the task.
pub fn spawn_watcher(
    loader: SwaggerLoader,
    settings: WatchSettings,
    coordinator: ShutdownCoordinator,
) -> Result<JoinHandle<()>, WatchError> {
    let file_events = match loader.source() {
        DocSource::File(path) => Some(FileEvents::watch(path)?),
        DocSource::Remote(_) => None,
    };

    Ok(tokio::spawn(async move {
        match file_events {
            Some(events) => watch_file(&loader, events, settings.debounce, &coordinator).await,
            None => poll_remote(&loader, settings.poll_interval, &coordinator).await,
        }
        info!(source = %loader.source(), "Swagger watcher stopped");
    }))
}

async fn reload(loader: &SwaggerLoader) {
    match loader.reload().await {
        Ok(()) => info!(source = %loader.source(), "Reloaded Swagger document"),
        Err(e) => warn!(source = %loader.source(), error = %e, "Swagger reload failed, keeping previous document"),
    }
}

async fn poll_remote(loader: &SwaggerLoader, interval: Duration, coordinator: &ShutdownCoordinator) {
    let shutdown = coordinator.wait_for_shutdown();
    tokio::pin!(shutdown);

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => reload(loader).await,
        }
    }
}

async fn watch_file(
    loader: &SwaggerLoader,
    events: FileEvents,
    debounce: Duration,
    coordinator: &ShutdownCoordinator,
) {
    let FileEvents {
        _watcher,
        mut rx,
        file_name,
    } = events;

    let shutdown = coordinator.wait_for_shutdown();
    tokio::pin!(shutdown);

    let mut reload_at: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            received = rx.recv() => match received {
                Some(Ok(event)) if touches_file(&event, file_name.as_ref()) => {
                    debug!(kind = ?event.kind, "Swagger file changed");
                    // restart the quiet period on every change
                    reload_at = Some(Instant::now() + debounce);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => warn!(error = %e, "Swagger file watcher error"),
                None => {
                    warn!("Swagger file watcher closed");
                    break;
                }
            },
            _ = time::sleep_until(reload_at.unwrap_or_else(Instant::now)), if reload_at.is_some() => {
                reload_at = None;
                reload(loader).await;
            }
        }
    }
}
