//! Turning one settled [`AggregateResult`] into view writes and a status.
//!
//! Blocking order is fixed: users gate everything, posts gate the post list,
//! comments only degrade the per-post counts.
//!
//! | users | posts | comments | status  | message            |
//! |-------|-------|----------|---------|--------------------|
//! | ok    | ok    | ok       | success | -                  |
//! | ok    | ok    | failed   | partial | comments error     |
//! | ok    | failed| any      | error   | posts error        |
//! | failed| any   | any      | error   | users error        |
//!
//! A payload that decodes but is not a list of records counts as failed for
//! rendering and status, never for the session counters.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use triad_types::{
    AggregateResult, Comment, FetchOutcome, Post, ResourceKey, Status, StatusReport, User,
    sanitize_display_text,
};

use crate::view::RenderSink;

const UNKNOWN_AUTHOR: &str = "Unknown";

/// One line of the users panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
}

impl UserRow {
    fn from_record(user: &User) -> Self {
        Self {
            name: clean(&user.name),
            email: clean(&user.email),
            company: user
                .company
                .as_ref()
                .map(|company| clean(&company.name))
                .filter(|name| !name.is_empty()),
        }
    }
}

impl fmt::Display for UserRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.company {
            Some(company) => write!(f, "{} ({} - {})", self.name, self.email, company),
            None => write!(f, "{} ({})", self.name, self.email),
        }
    }
}

/// Comments attached to a post, or why they could not be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentCount {
    Count(usize),
    /// Comments failed to load. Distinct from `Count(0)`.
    Unavailable,
}

impl fmt::Display for CommentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Unavailable => f.write_str("N/A"),
        }
    }
}

/// One line of the posts panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
    pub title: String,
    pub author: String,
    pub comments: CommentCount,
}

impl fmt::Display for PostRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} | Comments: {}",
            self.title, self.author, self.comments
        )
    }
}

/// A successful payload that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{0} payload is not a list")]
    NotAList(ResourceKey),
    #[error("{key} payload has a malformed record: {detail}")]
    MalformedRecord { key: ResourceKey, detail: String },
}

fn parse_records<T>(key: ResourceKey, payload: &Value) -> Result<Vec<T>, ShapeError>
where
    T: for<'de> Deserialize<'de>,
{
    if !payload.is_array() {
        return Err(ShapeError::NotAList(key));
    }
    Vec::<T>::deserialize(payload).map_err(|e| ShapeError::MalformedRecord {
        key,
        detail: e.to_string(),
    })
}

/// Records for `key`, or the message that explains why there are none.
fn records<T>(key: ResourceKey, outcome: &FetchOutcome) -> Result<Vec<T>, String>
where
    T: for<'de> Deserialize<'de>,
{
    match outcome {
        FetchOutcome::Success(payload) => parse_records(key, payload).map_err(|e| e.to_string()),
        FetchOutcome::Failure(err) => Err(err.to_string()),
    }
}

fn clean(text: &str) -> String {
    sanitize_display_text(text).into_owned()
}

fn post_rows(posts: &[Post], users: &[User], comments: Option<&[Comment]>) -> Vec<PostRow> {
    posts
        .iter()
        .map(|post| {
            let author = post
                .user_id
                .and_then(|uid| users.iter().find(|user| user.id == Some(uid)))
                .map_or_else(|| UNKNOWN_AUTHOR.to_string(), |user| clean(&user.name));
            let comments = match (comments, post.id) {
                (Some(comments), Some(pid)) => CommentCount::Count(
                    comments
                        .iter()
                        .filter(|comment| comment.post_id == Some(pid))
                        .count(),
                ),
                (Some(_), None) => CommentCount::Count(0),
                (None, _) => CommentCount::Unavailable,
            };
            PostRow {
                title: clean(&post.title),
                author,
                comments,
            }
        })
        .collect()
}

/// Apply `result` to `sink` and produce the status report stamped `at`.
///
/// `report_status` is always the last call made on `sink`.
pub fn reconcile(
    result: &AggregateResult,
    sink: &mut impl RenderSink,
    at: DateTime<Local>,
) -> StatusReport {
    let (status, error) = render(result, sink);
    let report = StatusReport {
        status,
        error: error.map(|message| clean(&message)),
        at,
    };
    sink.report_status(&report);
    report
}

fn render(result: &AggregateResult, sink: &mut impl RenderSink) -> (Status, Option<String>) {
    let users = match records::<User>(ResourceKey::Users, result.users()) {
        Ok(users) => users,
        Err(message) => return (Status::Error, Some(message)),
    };
    sink.render_users(users.iter().map(UserRow::from_record).collect());

    let posts = match records::<Post>(ResourceKey::Posts, result.posts()) {
        Ok(posts) => posts,
        Err(message) => return (Status::Error, Some(message)),
    };

    let comments = records::<Comment>(ResourceKey::Comments, result.comments());
    let rows = post_rows(&posts, &users, comments.as_deref().ok());
    sink.render_posts(rows);

    match comments {
        Ok(_) => (Status::Success, None),
        Err(message) => (Status::Partial, Some(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::DashboardView;
    use chrono::TimeZone;
    use serde_json::json;
    use triad_types::FetchError;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn ok(value: Value) -> FetchOutcome {
        FetchOutcome::Success(value)
    }

    fn failed(err: FetchError) -> FetchOutcome {
        FetchOutcome::Failure(err)
    }

    fn ann_users() -> Value {
        json!([{
            "id": 1,
            "name": "Ann",
            "email": "a@x",
            "company": { "name": "Acme" }
        }])
    }

    fn hi_posts() -> Value {
        json!([{ "id": 10, "userId": 1, "title": "Hi" }])
    }

    fn one_comment() -> Value {
        json!([{ "id": 100, "postId": 10 }])
    }

    /// Records every call so ordering can be asserted.
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<&'static str>,
        users: Vec<UserRow>,
        posts: Vec<PostRow>,
    }

    impl RenderSink for RecordingSink {
        fn render_users(&mut self, rows: Vec<UserRow>) {
            self.calls.push("users");
            self.users = rows;
        }

        fn render_posts(&mut self, rows: Vec<PostRow>) {
            self.calls.push("posts");
            self.posts = rows;
        }

        fn report_status(&mut self, _report: &StatusReport) {
            self.calls.push("status");
        }
    }

    #[test]
    fn ann_hi_scenario_renders_everything() {
        let result = AggregateResult::new(ok(ann_users()), ok(hi_posts()), ok(one_comment()));
        let mut sink = RecordingSink::default();

        let report = reconcile(&result, &mut sink, at());

        assert_eq!(report.status, Status::Success);
        assert_eq!(report.error, None);
        assert_eq!(report.at, at());
        assert_eq!(sink.calls, vec!["users", "posts", "status"]);
        assert_eq!(sink.users[0].to_string(), "Ann (a@x - Acme)");
        assert_eq!(
            sink.posts,
            vec![PostRow {
                title: "Hi".into(),
                author: "Ann".into(),
                comments: CommentCount::Count(1),
            }]
        );
        assert_eq!(sink.posts[0].to_string(), "Hi - Ann | Comments: 1");
    }

    #[test]
    fn comments_failure_is_partial_with_unavailable_counts() {
        let result = AggregateResult::new(
            ok(ann_users()),
            ok(hi_posts()),
            failed(FetchError::HttpStatus(404)),
        );
        let mut sink = RecordingSink::default();

        let report = reconcile(&result, &mut sink, at());

        assert_eq!(report.status, Status::Partial);
        assert_eq!(
            report.error.as_deref(),
            Some(FetchError::HttpStatus(404).to_string().as_str())
        );
        assert_eq!(sink.posts[0].comments, CommentCount::Unavailable);
        assert_eq!(sink.posts[0].to_string(), "Hi - Ann | Comments: N/A");
    }

    #[test]
    fn users_failure_renders_nothing() {
        let result = AggregateResult::new(
            failed(FetchError::HttpStatus(404)),
            ok(hi_posts()),
            ok(one_comment()),
        );
        let mut sink = RecordingSink::default();

        let report = reconcile(&result, &mut sink, at());

        assert_eq!(report.status, Status::Error);
        assert!(report.error.as_deref().unwrap().contains("404"));
        assert_eq!(sink.calls, vec!["status"]);
    }

    #[test]
    fn posts_failure_keeps_users_and_reports_error() {
        let result = AggregateResult::new(
            ok(ann_users()),
            failed(FetchError::Timeout),
            failed(FetchError::MalformedPayload),
        );
        let mut sink = RecordingSink::default();

        let report = reconcile(&result, &mut sink, at());

        assert_eq!(report.status, Status::Error);
        assert_eq!(report.error.as_deref(), Some("request timed out"));
        assert_eq!(sink.calls, vec!["users", "status"]);
    }

    #[test]
    fn status_truth_table() {
        let s = || ok(json!([]));
        let f = || failed(FetchError::Timeout);
        let cases = [
            ((s(), s(), s()), Status::Success),
            ((s(), s(), f()), Status::Partial),
            ((s(), f(), s()), Status::Error),
            ((s(), f(), f()), Status::Error),
            ((f(), s(), s()), Status::Error),
            ((f(), s(), f()), Status::Error),
            ((f(), f(), s()), Status::Error),
            ((f(), f(), f()), Status::Error),
        ];

        for ((users, posts, comments), expected) in cases {
            let result = AggregateResult::new(users, posts, comments);
            let report = reconcile(&result, &mut DashboardView::default(), at());
            assert_eq!(report.status, expected, "{result:?}");
            assert_eq!(report.error.is_some(), expected != Status::Success);
        }
    }

    #[test]
    fn users_message_wins_over_posts_message() {
        let result = AggregateResult::new(
            failed(FetchError::HttpStatus(500)),
            failed(FetchError::Timeout),
            ok(json!([])),
        );
        let report = reconcile(&result, &mut DashboardView::default(), at());
        assert_eq!(report.error.as_deref(), Some("HTTP error: status 500"));
    }

    #[test]
    fn unknown_author_when_no_user_matches() {
        let result = AggregateResult::new(
            ok(ann_users()),
            ok(json!([
                { "id": 10, "userId": 7, "title": "Orphan" },
                { "id": 11, "title": "No author" }
            ])),
            ok(json!([])),
        );
        let mut sink = RecordingSink::default();

        reconcile(&result, &mut sink, at());

        assert_eq!(sink.posts[0].author, "Unknown");
        assert_eq!(sink.posts[1].author, "Unknown");
        assert_eq!(sink.posts[0].comments, CommentCount::Count(0));
    }

    #[test]
    fn missing_ids_never_match_each_other() {
        let result = AggregateResult::new(
            ok(json!([{ "name": "Nobody", "email": "n@x" }])),
            ok(json!([{ "title": "Loose" }])),
            ok(json!([{ "id": 1 }])),
        );
        let mut sink = RecordingSink::default();

        reconcile(&result, &mut sink, at());

        assert_eq!(sink.users[0].to_string(), "Nobody (n@x)");
        assert_eq!(sink.posts[0].author, "Unknown");
        assert_eq!(sink.posts[0].comments, CommentCount::Count(0));
    }

    #[test]
    fn users_payload_that_is_not_a_list_blocks_rendering() {
        let result = AggregateResult::new(
            ok(json!({ "users": [] })),
            ok(hi_posts()),
            ok(one_comment()),
        );
        let mut sink = RecordingSink::default();

        let report = reconcile(&result, &mut sink, at());

        assert_eq!(report.status, Status::Error);
        assert_eq!(report.error.as_deref(), Some("users payload is not a list"));
        assert_eq!(sink.calls, vec!["status"]);
    }

    #[test]
    fn malformed_comments_degrade_to_partial() {
        let result = AggregateResult::new(ok(ann_users()), ok(hi_posts()), ok(json!("nope")));
        let mut sink = RecordingSink::default();

        let report = reconcile(&result, &mut sink, at());

        assert_eq!(report.status, Status::Partial);
        assert_eq!(report.error.as_deref(), Some("comments payload is not a list"));
        assert_eq!(sink.posts[0].comments, CommentCount::Unavailable);
    }

    #[test]
    fn malformed_post_record_is_an_error() {
        let result = AggregateResult::new(
            ok(ann_users()),
            ok(json!([{ "id": 10, "title": "Hi" }, "not a record"])),
            ok(one_comment()),
        );
        let mut sink = RecordingSink::default();

        let report = reconcile(&result, &mut sink, at());

        assert_eq!(report.status, Status::Error);
        assert!(
            report
                .error
                .as_deref()
                .unwrap()
                .starts_with("posts payload has a malformed record")
        );
        assert_eq!(sink.calls, vec!["users", "status"]);
    }

    #[test]
    fn null_fields_still_render_the_list() {
        let result = AggregateResult::new(
            ok(json!([
                { "id": 1, "name": null, "email": null, "company": { "name": null } },
                { "id": 2, "name": "Bo", "email": "b@y", "company": null }
            ])),
            ok(json!([
                { "id": 10, "userId": 2, "title": null },
                { "id": null, "userId": null, "title": "Loose" }
            ])),
            ok(json!([{ "id": 100, "postId": 10 }, { "id": null, "postId": null }])),
        );
        let mut sink = RecordingSink::default();

        let report = reconcile(&result, &mut sink, at());

        assert_eq!(report.status, Status::Success);
        assert_eq!(sink.users.len(), 2);
        assert_eq!(sink.users[0].to_string(), " ()");
        assert_eq!(sink.users[1].to_string(), "Bo (b@y)");
        assert_eq!(sink.posts[0].to_string(), " - Bo | Comments: 1");
        assert_eq!(sink.posts[1].to_string(), "Loose - Unknown | Comments: 0");
    }

    #[test]
    fn remote_text_is_sanitized() {
        let result = AggregateResult::new(
            ok(json!([{ "id": 1, "name": "Ann\u{1b}[31m", "email": "a@x\nb" }])),
            ok(json!([{ "id": 2, "userId": 1, "title": "Hi\u{7}there" }])),
            ok(json!([])),
        );
        let mut sink = RecordingSink::default();

        reconcile(&result, &mut sink, at());

        assert_eq!(sink.users[0].to_string(), "Ann (a@x b)");
        assert_eq!(sink.posts[0].to_string(), "Hithere - Ann | Comments: 0");
    }

    #[test]
    fn transport_detail_is_sanitized_in_report() {
        let result = AggregateResult::new(
            failed(FetchError::TransportFailure("reset\u{1b}]0;pwn\u{7}".into())),
            ok(json!([])),
            ok(json!([])),
        );

        let report = reconcile(&result, &mut DashboardView::default(), at());

        assert_eq!(report.error.as_deref(), Some("transport failure: reset"));
    }
}
