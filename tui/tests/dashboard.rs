//! Rendered-frame tests for the dashboard using a vt100 virtual terminal.


use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;

use triad_config::{Endpoints, FaultPlan};
use triad_engine::{Aggregator, App, LoadMode, Panel, ResilientFetcher, TargetResolver, Transport};
use triad_fetch::{RawResponse, TransportError};
use triad_types::FetchPolicy;
use triad_types::ui::UiOptions;

use vt100_backend::VT100Backend;

const WIDTH: u16 = 110;
const HEIGHT: u16 = 24;

const FEW_POSTS: &str = r#"[{"id":10,"userId":1,"title":"Hi"},{"id":11,"userId":9,"title":"Lost"}]"#;

struct FixtureTransport {
    posts: String,
}

impl Transport for FixtureTransport {
    async fn issue(&self, url: &str) -> Result<RawResponse, TransportError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let body = match url.rsplit('/').next() {
            Some("users") => {
                r#"[{"id":1,"name":"Ann","email":"a@x","company":{"name":"Acme"}},
                    {"id":2,"name":"Bo","email":"b@y"}]"#
            }
            Some("posts") => self.posts.as_str(),
            Some("comments") => r#"[{"id":100,"postId":10}]"#,
            _ => return Ok(RawResponse::new(404, "")),
        };
        Ok(RawResponse::new(200, body))
    }
}

fn app(faults: FaultPlan) -> App<FixtureTransport> {
    app_with_posts(faults, FEW_POSTS.to_string())
}

/// `count` posts titled `Post 1`..`Post {count}`, all by Ann.
fn numbered_posts(count: u64) -> String {
    let posts: Vec<String> = (1..=count)
        .map(|id| format!(r#"{{"id":{id},"userId":1,"title":"Post {id}"}}"#))
        .collect();
    format!("[{}]", posts.join(","))
}

fn app_with_posts(faults: FaultPlan, posts: String) -> App<FixtureTransport> {
    let fetcher = ResilientFetcher::new(
        FixtureTransport { posts },
        FetchPolicy {
            max_retries: 0,
            ..FetchPolicy::default()
        },
    );
    let resolver = TargetResolver::new(
        Endpoints::from_base("http://test.invalid").unwrap(),
        faults,
    );
    App::new(Aggregator::new(fetcher), resolver, LoadMode::Promise)
}

async fn settle(app: &mut App<FixtureTransport>) {
    while app.is_loading() {
        tokio::time::sleep(Duration::from_millis(1)).await;
        app.tick();
    }
}

fn render(app: &mut App<FixtureTransport>) -> String {
    let mut terminal = Terminal::new(VT100Backend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|frame| triad_tui::draw(frame, app)).unwrap();
    terminal.backend().contents()
}

#[test]
fn idle_screen_shows_mode_and_zero_counters() {
    let mut app = app(FaultPlan::default());

    let screen = render(&mut app);

    assert!(screen.contains("Promise"), "{screen}");
    assert!(screen.contains("Users (0)"), "{screen}");
    assert!(screen.contains("Posts (0)"), "{screen}");
    assert!(screen.contains("idle"), "{screen}");
    assert!(screen.contains("Succeeded 0"), "{screen}");
    assert!(screen.contains("Failed    0"), "{screen}");
}

#[tokio::test(start_paused = true)]
async fn loading_state_is_shown_while_in_flight() {
    let mut app = app(FaultPlan::default());
    app.request_load();

    let screen = render(&mut app);

    assert!(screen.contains("loading"), "{screen}");
    settle(&mut app).await;
}

#[tokio::test(start_paused = true)]
async fn successful_load_renders_lists_and_status() {
    let mut app = app(FaultPlan::default());
    app.request_load();
    settle(&mut app).await;

    let screen = render(&mut app);

    assert!(screen.contains("Users (2)"), "{screen}");
    assert!(screen.contains("Ann (a@x - Acme)"), "{screen}");
    assert!(screen.contains("Bo (b@y)"), "{screen}");
    assert!(screen.contains("Hi - Ann | Comments: 1"), "{screen}");
    assert!(screen.contains("Lost - Unknown | Comments: 0"), "{screen}");
    assert!(screen.contains("success"), "{screen}");
    assert!(screen.contains("Succeeded 3"), "{screen}");
}

#[tokio::test(start_paused = true)]
async fn comments_failure_renders_partial() {
    let mut app = app(FaultPlan {
        comments_fail: true,
        ..FaultPlan::default()
    });
    app.request_load();
    settle(&mut app).await;

    let screen = render(&mut app);

    assert!(screen.contains("Hi - Ann | Comments: N/A"), "{screen}");
    assert!(screen.contains("partial"), "{screen}");
    assert!(screen.contains("HTTP error: status 404"), "{screen}");
    assert!(screen.contains("Succeeded 2"), "{screen}");
    assert!(screen.contains("Failed    1"), "{screen}");
}

#[tokio::test(start_paused = true)]
async fn users_failure_renders_error_and_empty_lists() {
    let mut app = app(FaultPlan {
        users_404: true,
        ..FaultPlan::default()
    });
    app.request_load();
    settle(&mut app).await;

    let screen = render(&mut app);

    assert!(screen.contains("Users (0)"), "{screen}");
    assert!(screen.contains("Posts (0)"), "{screen}");
    assert!(screen.contains("error"), "{screen}");
    assert!(screen.contains("404"), "{screen}");
}

#[tokio::test(start_paused = true)]
async fn header_follows_mode_toggle_and_notice() {
    let mut app = app(FaultPlan::default());
    app.toggle_mode();

    let screen = render(&mut app);

    assert!(screen.contains("Async/Await"), "{screen}");
    assert!(screen.contains("Mode: Async/Await"), "{screen}");
}

#[test]
fn ascii_mode_avoids_unicode_glyphs() {
    let mut app = app(FaultPlan::default());
    app.set_ui_options(UiOptions {
        ascii_only: true,
        ..UiOptions::default()
    });

    let screen = render(&mut app);

    assert!(screen.contains("o idle"), "{screen}");
    assert!(!screen.contains('○'), "{screen}");
}

fn press(app: &mut App<FixtureTransport>, code: KeyCode) {
    triad_tui::apply_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

#[tokio::test(start_paused = true)]
async fn long_post_list_scrolls_to_the_last_post() {
    let mut app = app_with_posts(FaultPlan::default(), numbered_posts(100));
    app.request_load();
    settle(&mut app).await;

    let screen = render(&mut app);
    assert!(screen.contains("Posts (100)"), "{screen}");
    assert!(screen.contains("Post 1 - Ann"), "{screen}");
    assert!(!screen.contains("Post 100 - Ann"), "{screen}");

    press(&mut app, KeyCode::Char('j'));
    let screen = render(&mut app);
    assert!(!screen.contains("Post 1 - Ann"), "{screen}");
    assert!(screen.contains("Post 2 - Ann"), "{screen}");

    for _ in 0..20 {
        press(&mut app, KeyCode::PageDown);
        render(&mut app);
    }
    let screen = render(&mut app);
    assert!(screen.contains("Post 100 - Ann"), "{screen}");
    assert!(!screen.contains("Post 2 - Ann"), "{screen}");

    press(&mut app, KeyCode::Home);
    let screen = render(&mut app);
    assert!(screen.contains("Post 1 - Ann"), "{screen}");
}

#[tokio::test(start_paused = true)]
async fn scrolling_posts_leaves_users_in_place() {
    let mut app = app_with_posts(FaultPlan::default(), numbered_posts(100));
    app.request_load();
    settle(&mut app).await;
    render(&mut app);

    press(&mut app, KeyCode::End);
    let screen = render(&mut app);

    assert!(screen.contains("Post 100 - Ann"), "{screen}");
    assert!(screen.contains("Ann (a@x - Acme)"), "{screen}");
    assert_eq!(app.focus(), Panel::Posts);
}
