//! Pager
//!
//! A `Pager` is a handle to a spawned task that exclusively owns one
//! aggregated collection and its two load states. The handle sends
//! commands (read position, refresh, retry, close) over a channel; the task
//! publishes a fresh `PagerSnapshot` through a watch channel after every
//! state change.
//!
//! At most one load runs at a time. Triggers that arrive while a load is
//! in flight are dropped, and the read position is re-checked after each
//! append commits, so nothing is lost. Closing or dropping the handle
//! aborts the task together with its in-flight fetch, which means a late
//! response can never reach a collection that is no longer in use.

use super::source::PagingSource;
use super::types::{
    LoadParams, LoadResult, LoadState, LoadType, PageInfo, PageKey, PagerConfig, PagerSnapshot,
    PagingState,
};
use crate::error::Error;
use futures::future::BoxFuture;
use futures::{FutureExt, Stream};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to a running pager
pub struct Pager<T> {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<PagerSnapshot<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> Pager<T> {
    /// Start a pager over `source` and kick off the first refresh.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new<S>(config: PagerConfig, source: S) -> Self
    where
        S: PagingSource<Item = T>,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(PagerSnapshot::loading());

        let task = PagerTask {
            source: Arc::new(source),
            config,
            commands: command_rx,
            snapshots: snapshot_tx,
            items: Arc::new(Vec::new()),
            pages: Vec::new(),
            refresh: LoadState::NotLoading,
            append: LoadState::NotLoading,
            next_key: None,
            end_reached: false,
            refresh_key: None,
            last_accessed: None,
            in_flight: None,
        };

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            task: tokio::spawn(task.run()),
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> PagerSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    /// Watch receiver; the current snapshot is readable immediately
    pub fn subscribe(&self) -> watch::Receiver<PagerSnapshot<T>> {
        self.snapshots.clone()
    }

    /// Stream of snapshots, starting with the current one
    pub fn updates(&self) -> impl Stream<Item = PagerSnapshot<T>> + Send + 'static {
        let rx = self.snapshots.clone();
        futures::stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let snapshot = rx.borrow_and_update().clone();
            Some((snapshot, (rx, false)))
        })
    }

    /// Report that the consumer read the item at `index`
    pub fn access(&self, index: usize) {
        self.send(Command::Access(index));
    }

    /// Reload from the first page
    pub fn refresh(&self) {
        self.send(Command::Refresh);
    }

    /// Reload around the last read position, using the source's refresh key
    pub fn invalidate(&self) {
        self.send(Command::Invalidate);
    }

    /// Re-issue whichever load failed last
    pub fn retry(&self) {
        self.send(Command::Retry);
    }

    /// Wait until every command sent so far has been handled.
    ///
    /// Returns `false` if the pager is closed.
    pub async fn sync(&self) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.commands.send(Command::Barrier(ack_tx)).is_err() {
            return false;
        }
        ack_rx.await.is_ok()
    }

    /// Wait until queued commands are handled and nothing is loading.
    ///
    /// Returns `None` if the pager closed first.
    pub async fn settled(&self) -> Option<PagerSnapshot<T>> {
        if !self.sync().await {
            return None;
        }
        let mut rx = self.snapshots.clone();
        let snapshot = rx.wait_for(|s| !s.is_loading()).await.ok()?;
        Some(snapshot.clone())
    }

    /// Stop the pager and abandon any in-flight fetch
    pub fn close(&self) {
        self.send(Command::Close);
        self.task.abort();
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("pager closed, command dropped");
        }
    }
}

impl<T> Drop for Pager<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T> std::fmt::Debug for Pager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshots.borrow();
        f.debug_struct("Pager")
            .field("items", &snapshot.items.len())
            .field("refresh", &snapshot.refresh)
            .field("append", &snapshot.append)
            .field("next_key", &snapshot.next_key)
            .finish_non_exhaustive()
    }
}

enum Command {
    Access(usize),
    Refresh,
    Invalidate,
    Retry,
    Barrier(oneshot::Sender<()>),
    Close,
}

enum Event<T> {
    Command(Option<Command>),
    Loaded(LoadParams, LoadResult<T>),
}

struct InFlight<T> {
    params: LoadParams,
    future: BoxFuture<'static, LoadResult<T>>,
}

/// State owned by the pager task
struct PagerTask<S: PagingSource> {
    source: Arc<S>,
    config: PagerConfig,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<PagerSnapshot<S::Item>>,
    items: Arc<Vec<S::Item>>,
    pages: Vec<PageInfo>,
    refresh: LoadState,
    append: LoadState,
    next_key: Option<PageKey>,
    end_reached: bool,
    /// Key of the most recent refresh, reused by `retry`
    refresh_key: Option<PageKey>,
    last_accessed: Option<usize>,
    in_flight: Option<InFlight<S::Item>>,
}

impl<S: PagingSource> PagerTask<S> {
    async fn run(mut self) {
        self.start_load(LoadParams::refresh(None, self.config.initial_load_size));

        loop {
            let event = {
                let commands = &mut self.commands;
                let in_flight = &mut self.in_flight;
                tokio::select! {
                    biased;
                    command = commands.recv() => Event::Command(command),
                    (params, result) = next_completion(in_flight) => Event::Loaded(params, result),
                }
            };

            match event {
                Event::Command(None | Some(Command::Close)) => break,
                Event::Command(Some(command)) => self.handle(command),
                Event::Loaded(params, result) => {
                    self.in_flight = None;
                    self.commit(params, result);
                }
            }
        }

        debug!("pager stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Access(index) => {
                self.last_accessed = Some(index);
                self.maybe_append();
            }
            Command::Refresh => self.request_refresh(None),
            Command::Invalidate => {
                let key = self.source.refresh_key(&self.paging_state());
                self.request_refresh(key);
            }
            Command::Retry => self.retry(),
            Command::Barrier(ack) => {
                let _ = ack.send(());
            }
            Command::Close => {}
        }
    }

    fn request_refresh(&mut self, key: Option<PageKey>) {
        if self.in_flight.is_some() {
            debug!("refresh ignored, load in flight");
            return;
        }
        self.start_load(LoadParams::refresh(key, self.config.initial_load_size));
    }

    fn retry(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        if self.refresh.is_error() {
            self.start_load(LoadParams::refresh(
                self.refresh_key,
                self.config.initial_load_size,
            ));
        } else if self.append.is_error() {
            if let Some(key) = self.next_key {
                self.start_load(LoadParams::append(key, self.config.page_size));
            }
        }
    }

    /// Start an append if the read position is close enough to the end
    fn maybe_append(&mut self) {
        let (Some(index), Some(key)) = (self.last_accessed, self.next_key) else {
            return;
        };
        let remaining = self.items.len().saturating_sub(index.saturating_add(1));
        if remaining > self.config.prefetch_distance {
            return;
        }
        if self.in_flight.is_some() {
            debug!(key, "append coalesced, load in flight");
            return;
        }
        self.start_load(LoadParams::append(key, self.config.page_size));
    }

    fn start_load(&mut self, params: LoadParams) {
        debug!(load_type = ?params.load_type, key = ?params.key, "starting load");
        match params.load_type {
            LoadType::Refresh => self.refresh = LoadState::Loading,
            LoadType::Append => self.append = LoadState::Loading,
        }

        let source = Arc::clone(&self.source);
        let future = async move {
            match AssertUnwindSafe(source.load(params)).catch_unwind().await {
                Ok(result) => result,
                Err(_) => LoadResult::Error(Arc::new(Error::Other(
                    "page load panicked".to_string(),
                ))),
            }
        };
        self.in_flight = Some(InFlight {
            params,
            future: Box::pin(future),
        });
        self.publish();
    }

    fn commit(&mut self, params: LoadParams, result: LoadResult<S::Item>) {
        match (params.load_type, result) {
            (LoadType::Refresh, LoadResult::Page(page)) => {
                info!(key = ?params.key, items = page.data.len(), "refresh committed");
                self.refresh_key = params.key;
                self.pages = vec![PageInfo::of(&page)];
                self.next_key = page.next_key;
                self.end_reached = page.next_key.is_none();
                self.items = Arc::new(page.data);
                self.refresh = LoadState::NotLoading;
                self.append = LoadState::NotLoading;
                self.last_accessed = None;
                self.publish();
            }
            (LoadType::Refresh, LoadResult::Error(err)) => {
                warn!(key = ?params.key, error = %err, "refresh failed");
                self.refresh_key = params.key;
                self.refresh = LoadState::Error(err);
                self.publish();
            }
            (LoadType::Append, LoadResult::Page(page)) => {
                debug!(key = ?params.key, items = page.data.len(), "append committed");
                self.pages.push(PageInfo::of(&page));
                self.next_key = page.next_key;
                self.end_reached = page.next_key.is_none();
                Arc::make_mut(&mut self.items).extend(page.data);
                self.append = LoadState::NotLoading;
                self.publish();
                self.maybe_append();
            }
            (LoadType::Append, LoadResult::Error(err)) => {
                warn!(key = ?params.key, error = %err, "append failed");
                self.append = LoadState::Error(err);
                self.publish();
            }
        }
    }

    fn paging_state(&self) -> PagingState {
        PagingState {
            pages: self.pages.clone(),
            anchor_position: self.last_accessed,
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(PagerSnapshot {
            items: Arc::clone(&self.items),
            refresh: self.refresh.clone(),
            append: self.append.clone(),
            next_key: self.next_key,
            end_of_pagination_reached: self.end_reached,
            pages_loaded: self.pages.len(),
        });
    }
}

/// Resolves when the in-flight load finishes; pending forever when idle
async fn next_completion<T>(slot: &mut Option<InFlight<T>>) -> (LoadParams, LoadResult<T>) {
    match slot {
        Some(in_flight) => {
            let result = in_flight.future.as_mut().await;
            (in_flight.params, result)
        }
        None => std::future::pending().await,
    }
}
