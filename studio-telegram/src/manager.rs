//! Bot lifecycle (STOPPED / RUNNING) and the long-polling loop.
//!
//! The loop is a single tokio task: poll, then handle each update of the batch in order, awaiting
//! the handler before the next one. The cursor is advanced before each update is handled, so an
//! update whose handling crashes the process is not redelivered within this process lifetime.

use image_edit_client::ImageEditor;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use studio_core::{ChatApi, LogSink, Result, Severity, Update};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::PollSettings;
use crate::dispatch::{Dispatch, Dispatcher};

pub const MSG_BOT_STARTED: &str = "Bot started. Listening for messages...";
pub const MSG_BOT_STOPPED: &str = "Bot stopped.";

/// Owns the cursor, the running flag and the poll task. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct BotManager {
    inner: Arc<Inner>,
}

struct Inner {
    chat: Arc<dyn ChatApi>,
    dispatcher: Dispatcher,
    sink: Arc<dyn LogSink>,
    settings: PollSettings,
    running: AtomicBool,
    /// Bumped on every start; a loop exits once it is no longer the current generation.
    generation: AtomicU64,
    /// Next `update_id` to request. Only ever raised.
    offset: AtomicI64,
    /// Serializes start/stop and keeps the latest loop handle.
    task: Mutex<Option<JoinHandle<()>>>,
}

impl BotManager {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        editor: Arc<dyn ImageEditor>,
        sink: Arc<dyn LogSink>,
        settings: PollSettings,
    ) -> Self {
        let dispatcher = Dispatcher::new(chat.clone(), editor, sink.clone());
        Self {
            inner: Arc::new(Inner {
                chat,
                dispatcher,
                sink,
                settings,
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                offset: AtomicI64::new(0),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Next `update_id` that will be requested.
    pub fn offset(&self) -> i64 {
        self.inner.offset.load(Ordering::SeqCst)
    }

    /// STOPPED → RUNNING and spawns the poll loop. Returns false (and does nothing) when already running.
    /// Must be called within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut task = self.inner.task.lock().unwrap_or_else(|e| e.into_inner());
        if self.is_running() {
            debug!("start ignored: bot already running");
            return false;
        }
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.running.store(true, Ordering::SeqCst);
        self.inner.sink.emit(MSG_BOT_STARTED, Severity::Info);
        info!(generation, offset = self.offset(), "bot started");

        let manager = self.clone();
        *task = Some(tokio::spawn(async move {
            manager.run_loop(generation).await;
        }));
        true
    }

    /// RUNNING → STOPPED. The in-flight poll is not cancelled; the loop exits at its next check.
    /// Returns false when already stopped.
    pub fn stop(&self) -> bool {
        let _task = self.inner.task.lock().unwrap_or_else(|e| e.into_inner());
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            debug!("stop ignored: bot not running");
            return false;
        }
        self.inner.sink.emit(MSG_BOT_STOPPED, Severity::Info);
        info!(offset = self.offset(), "bot stopped");
        true
    }

    /// Stops the bot and waits up to `grace` for the loop to finish; aborts it after that.
    pub async fn shutdown(&self, grace: Duration) {
        self.stop();
        let handle = self
            .inner
            .task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        let Some(mut handle) = handle else {
            return;
        };
        if tokio::time::timeout(grace, &mut handle).await.is_err() {
            warn!("poll loop still busy after grace period, aborting");
            handle.abort();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_running() && self.inner.generation.load(Ordering::SeqCst) == generation
    }

    fn advance_offset(&self, update_id: i64) {
        self.inner
            .offset
            .fetch_max(update_id.saturating_add(1), Ordering::SeqCst);
    }

    async fn fetch(&self) -> Result<Vec<Update>> {
        self.inner
            .chat
            .get_updates(self.offset(), self.inner.settings.timeout_secs)
            .await
    }

    /// One poll: fetch updates at the cursor, then advance and dispatch each in arrival order.
    /// Returns the number of updates handled.
    #[instrument(skip(self), fields(offset = self.offset()))]
    pub async fn poll_once(&self) -> Result<usize> {
        let updates = self.fetch().await?;
        Ok(self.handle_batch(updates, || true).await)
    }

    /// Handles updates in arrival order while `owns_cursor` holds. Updates left over are not
    /// acknowledged, so the loop that now owns the cursor receives them instead.
    async fn handle_batch(&self, updates: Vec<Update>, owns_cursor: impl Fn() -> bool) -> usize {
        let total = updates.len();
        let mut handled = 0;
        for update in updates {
            if !owns_cursor() {
                debug!(dropped = total - handled, "stale loop, leaving rest of batch");
                break;
            }
            self.handle_update(update).await;
            handled += 1;
        }
        handled
    }

    async fn handle_update(&self, update: Update) -> Dispatch {
        self.advance_offset(update.update_id);
        let outcome = self.inner.dispatcher.dispatch(&update).await;
        debug!(update_id = update.update_id, outcome = ?outcome, "update handled");
        outcome
    }

    /// Polls while this generation is current; on failure logs once and waits the fixed retry delay.
    /// A batch that arrives after a stop or restart is dropped unacknowledged.
    async fn run_loop(self, generation: u64) {
        while self.is_current(generation) {
            match self.fetch().await {
                Ok(updates) => {
                    self.handle_batch(updates, || self.is_current(generation))
                        .await;
                }
                Err(e) => {
                    warn!(error = %e, "polling failed");
                    self.inner
                        .sink
                        .emit(&format!("Polling error: {}", e), Severity::Error);
                    if self.is_current(generation) {
                        tokio::time::sleep(self.inner.settings.retry_delay).await;
                    }
                }
            }
        }
        debug!(generation, "poll loop exited");
    }
}
