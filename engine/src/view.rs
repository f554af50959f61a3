//! Render boundary and the in-memory dashboard the TUI draws from.

use triad_types::StatusReport;

use crate::reconcile::{PostRow, UserRow};

/// Receives the results of a load cycle.
///
/// `render_users` and `render_posts` replace whatever was shown before.
pub trait RenderSink {
    /// A load cycle has started.
    fn begin_load(&mut self) {}

    fn render_users(&mut self, rows: Vec<UserRow>);

    fn render_posts(&mut self, rows: Vec<PostRow>);

    fn report_status(&mut self, report: &StatusReport);
}

/// What the status panel's state field shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusLine {
    #[default]
    Idle,
    Loading,
    Reported(StatusReport),
}

impl StatusLine {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Reported(report) => report.status.as_str(),
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&StatusReport> {
        match self {
            Self::Reported(report) => Some(report),
            Self::Idle | Self::Loading => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    users: Vec<UserRow>,
    posts: Vec<PostRow>,
    status: StatusLine,
}

impl DashboardView {
    #[must_use]
    pub fn users(&self) -> &[UserRow] {
        &self.users
    }

    #[must_use]
    pub fn posts(&self) -> &[PostRow] {
        &self.posts
    }

    #[must_use]
    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Empty both lists. The status line is left alone.
    pub fn clear(&mut self) {
        self.users.clear();
        self.posts.clear();
    }
}

impl RenderSink for DashboardView {
    fn begin_load(&mut self) {
        self.status = StatusLine::Loading;
    }

    fn render_users(&mut self, rows: Vec<UserRow>) {
        self.users = rows;
    }

    fn render_posts(&mut self, rows: Vec<PostRow>) {
        self.posts = rows;
    }

    fn report_status(&mut self, report: &StatusReport) {
        self.status = StatusLine::Reported(report.clone());
    }
}
