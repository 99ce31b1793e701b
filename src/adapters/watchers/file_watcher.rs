// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system watcher for configuration file changes.
//!
//! This module provides a watcher that monitors a configuration file for changes
//! made by other processes and triggers reload callbacks when they happen.

use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ConfigWatcher};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default quiet period before a change is reported.
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Longest wait between two checks of the stop signal.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// File system watcher for a configuration file.
///
/// The watcher observes the file's parent directory (watching files directly is
/// unreliable when editors or atomic saves replace the file) and filters events
/// for the file itself. Notifications are debounced on the trailing edge: the
/// callback runs once the file has seen no events for the debounce delay, so a
/// burst of writes triggers a single callback after the last write.
///
/// The file does not need to exist when the watcher is created, but its parent
/// directory does.
///
/// # Examples
///
/// ```rust,no_run
/// use usercfg::adapters::FileWatcher;
/// use usercfg::ports::ConfigWatcher;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # fn main() -> usercfg::domain::Result<()> {
/// let mut watcher = FileWatcher::new("/path/to/config.json", None)?;
///
/// watcher.watch(Arc::new(|path: &Path| {
///     println!("Configuration changed: {}", path.display());
/// }))?;
///
/// // Later, stop watching
/// watcher.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileWatcher {
    /// Absolute path to the file being watched
    file_path: PathBuf,
    /// Quiet period before a change is reported (default 500ms)
    debounce_delay: Duration,
    /// Internal watcher
    watcher: Option<RecommendedWatcher>,
    /// Thread handle for the watcher thread
    watch_thread: Option<JoinHandle<()>>,
    /// Stop signal sender
    stop_tx: Option<Sender<()>>,
}

impl FileWatcher {
    /// Creates a new file watcher for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file to watch
    /// * `debounce_delay` - Optional debounce delay (default 500ms)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WatcherError` if the file's parent directory does
    /// not exist.
    pub fn new(path: impl AsRef<Path>, debounce_delay: Option<Duration>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| ConfigError::WatcherError {
            message: format!("Not a file path: {}", path.display()),
            source: None,
        })?;

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let parent = parent
            .canonicalize()
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Directory does not exist: {}", parent.display()),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            file_path: parent.join(file_name),
            debounce_delay: debounce_delay.unwrap_or(DEFAULT_DEBOUNCE),
            watcher: None,
            watch_thread: None,
            stop_tx: None,
        })
    }

    /// Returns the absolute path of the watched file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl ConfigWatcher for FileWatcher {
    fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
        if self.watcher.is_some() {
            return Err(ConfigError::WatcherError {
                message: "Watcher is already running".to_string(),
                source: None,
            });
        }

        let (event_tx, event_rx) = channel::<notify::Result<Event>>();
        let (stop_tx, stop_rx) = channel::<()>();

        // Create the notify watcher
        let mut watcher =
            RecommendedWatcher::new(event_tx, notify::Config::default()).map_err(|e| {
                ConfigError::WatcherError {
                    message: format!("Failed to create file watcher: {}", e),
                    source: Some(Box::new(e)),
                }
            })?;

        let watch_dir = self
            .file_path
            .parent()
            .ok_or_else(|| ConfigError::WatcherError {
                message: "Failed to get parent directory".to_string(),
                source: None,
            })?
            .to_path_buf();

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to start watching: {}", e),
                source: Some(Box::new(e)),
            })?;

        self.watcher = Some(watcher);
        self.stop_tx = Some(stop_tx);

        // Spawn a thread to handle file system events
        let file_path = self.file_path.clone();
        let debounce_delay = self.debounce_delay;

        let watch_thread = thread::spawn(move || {
            // Time of the latest event for the file that has not been reported
            let mut pending: Option<Instant> = None;

            loop {
                // Check for stop signal (non-blocking)
                if stop_rx.try_recv().is_ok() {
                    break;
                }

                let timeout = match pending {
                    Some(last) => debounce_delay
                        .saturating_sub(last.elapsed())
                        .min(POLL_INTERVAL),
                    None => POLL_INTERVAL,
                };

                match event_rx.recv_timeout(timeout) {
                    Ok(Ok(event)) => {
                        if event.paths.iter().any(|p| p == &file_path) {
                            pending = Some(Instant::now());
                        }
                    }
                    Ok(Err(e)) => tracing::warn!("File watcher error: {}", e),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }

                // Debounce: report once the file has been quiet for the full delay
                let settled = pending
                    .map(|last| last.elapsed() >= debounce_delay)
                    .unwrap_or(false);
                if settled {
                    pending = None;
                    tracing::debug!("Configuration file changed: {}", file_path.display());
                    callback(&file_path);
                }
            }
        });

        self.watch_thread = Some(watch_thread);

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        // Send stop signal
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        // Wait for the thread to finish
        if let Some(handle) = self.watch_thread.take() {
            handle.join().map_err(|_| ConfigError::WatcherError {
                message: "Failed to join watcher thread".to_string(),
                source: None,
            })?;
        }

        // Drop the watcher
        self.watcher = None;

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
