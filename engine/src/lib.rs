//! Core engine for Triad: load cycles, reconciliation and the `App` state.
//!
//! This crate contains the App without TUI dependencies. The TUI reads
//! [`App::view`] and calls the `request_*` methods; the binary drives
//! [`App::tick`] from its frame loop.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use chrono::Local;
use futures_util::future::FutureExt;
use tokio::task::JoinHandle;

mod reconcile;
mod scroll;
mod session;
mod view;

pub use reconcile::{CommentCount, PostRow, ShapeError, UserRow, reconcile};
pub use scroll::{ListScroll, Panel};
pub use session::DashboardSession;
pub use view::{DashboardView, RenderSink, StatusLine};

pub use triad_config::{Settings, TargetResolver};
pub use triad_fetch::{Aggregator, HttpTransport, ResilientFetcher, Transport};
pub use triad_types::{
    AggregateResult, LoadMode, SessionCounters, Status, StatusReport, ui::UiOptions,
};

/// A load cycle running on the runtime. Only produces the result; applying
/// it happens on the driver in [`App::tick`].
#[derive(Debug)]
struct LoadTask {
    mode: LoadMode,
    handle: JoinHandle<AggregateResult>,
}

#[derive(Debug, Default)]
enum LoadState {
    #[default]
    Idle,
    Loading(LoadTask),
}

/// Application state shared between the frame loop and the TUI.
pub struct App<T = HttpTransport> {
    session: DashboardSession,
    view: DashboardView,
    aggregator: Arc<Aggregator<T>>,
    resolver: Arc<TargetResolver>,
    load: LoadState,
    notice: Option<String>,
    focus: Panel,
    users_scroll: ListScroll,
    posts_scroll: ListScroll,
    ui_options: UiOptions,
    should_quit: bool,
    tick: usize,
}

impl App<HttpTransport> {
    /// Build an app that fetches over HTTP using resolved settings.
    #[must_use]
    pub fn from_settings(settings: &Settings, mode: LoadMode) -> Self {
        let fetcher = ResilientFetcher::new(HttpTransport::new(), settings.policy);
        let mut app = Self::new(Aggregator::new(fetcher), settings.resolver.clone(), mode);
        app.ui_options = settings.ui;
        app
    }
}

impl<T: Transport + 'static> App<T> {
    #[must_use]
    pub fn new(aggregator: Aggregator<T>, resolver: TargetResolver, mode: LoadMode) -> Self {
        Self {
            session: DashboardSession::new(mode),
            view: DashboardView::default(),
            aggregator: Arc::new(aggregator),
            resolver: Arc::new(resolver),
            load: LoadState::Idle,
            notice: None,
            focus: Panel::default(),
            users_scroll: ListScroll::default(),
            posts_scroll: ListScroll::default(),
            ui_options: UiOptions::default(),
            should_quit: false,
            tick: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    pub fn set_ui_options(&mut self, options: UiOptions) {
        self.ui_options = options;
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    pub fn mode(&self) -> LoadMode {
        self.session.mode()
    }

    pub fn counters(&self) -> SessionCounters {
        self.session.counters()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading(_))
    }

    pub fn tick_count(&self) -> usize {
        self.tick
    }

    /// The panel that scroll keys move.
    pub fn focus(&self) -> Panel {
        self.focus
    }

    pub fn set_focus(&mut self, panel: Panel) {
        self.focus = panel;
    }

    pub fn focus_next(&mut self) -> Panel {
        self.focus = self.focus.other();
        self.focus
    }

    pub fn scroll(&self, panel: Panel) -> ListScroll {
        match panel {
            Panel::Users => self.users_scroll,
            Panel::Posts => self.posts_scroll,
        }
    }

    fn scroll_mut(&mut self, panel: Panel) -> &mut ListScroll {
        match panel {
            Panel::Users => &mut self.users_scroll,
            Panel::Posts => &mut self.posts_scroll,
        }
    }

    /// Called by the draw pass with the panel's measured limits.
    pub fn update_scroll_viewport(&mut self, panel: Panel, max: u16, visible: u16) {
        self.scroll_mut(panel).update_viewport(max, visible);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_mut(self.focus).scroll_up();
    }

    pub fn scroll_down(&mut self) {
        self.scroll_mut(self.focus).scroll_down();
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_mut(self.focus).scroll_page_up();
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_mut(self.focus).scroll_page_down();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_mut(self.focus).scroll_to_top();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_mut(self.focus).scroll_to_bottom();
    }

    fn push_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Start a load cycle in the current mode.
    ///
    /// Returns `false` (and leaves a notice) when a cycle is already running.
    /// Must be called from within a tokio runtime.
    pub fn request_load(&mut self) -> bool {
        if self.is_loading() {
            self.push_notice("A load is already in progress");
            return false;
        }

        let mode = self.session.mode();
        let aggregator = Arc::clone(&self.aggregator);
        let resolver = Arc::clone(&self.resolver);
        let handle = tokio::spawn(async move {
            aggregator
                .load_all(mode, |key| resolver.resolve(key))
                .await
        });

        tracing::debug!(mode = mode.as_str(), "Load cycle started");
        self.view.begin_load();
        self.notice = None;
        self.load = LoadState::Loading(LoadTask { mode, handle });
        true
    }

    /// Clear both lists, then start a load cycle.
    pub fn request_refresh(&mut self) -> bool {
        if self.is_loading() {
            self.push_notice("A load is already in progress");
            return false;
        }
        self.view.clear();
        self.users_scroll.scroll_to_top();
        self.posts_scroll.scroll_to_top();
        self.request_load()
    }

    /// Switch load mode. Takes effect from the next load cycle.
    pub fn toggle_mode(&mut self) -> LoadMode {
        let mode = self.session.toggle_mode();
        self.push_notice(format!("Mode: {}", mode.display_name()));
        mode
    }

    pub fn tick(&mut self) {
        self.poll_load();
        self.tick = self.tick.wrapping_add(1);
    }

    /// Apply a finished load task's result to the session and view.
    fn poll_load(&mut self) {
        let finished = match &self.load {
            LoadState::Loading(task) => task.handle.is_finished(),
            LoadState::Idle => return,
        };

        if !finished {
            return;
        }

        let LoadState::Loading(LoadTask { mode, mut handle }) = std::mem::take(&mut self.load)
        else {
            return;
        };

        match (&mut handle).now_or_never() {
            Some(Ok(result)) => {
                self.session.apply(&result, &mut self.view, Local::now());
            }
            Some(Err(e)) => {
                tracing::error!(mode = mode.as_str(), "Load task failed: {e}");
                let report = StatusReport {
                    status: Status::Error,
                    error: Some(format!("load task failed: {e}")),
                    at: Local::now(),
                };
                self.view.report_status(&report);
            }
            None => {
                // Edge-case: is_finished() was true but join handle isn't ready yet.
                self.load = LoadState::Loading(LoadTask { mode, handle });
            }
        }
    }
}

impl<T> Drop for App<T> {
    fn drop(&mut self) {
        if let LoadState::Loading(task) = &self.load {
            task.handle.abort();
        }
    }
}
