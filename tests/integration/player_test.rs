//! End-to-end player tests on a paused Tokio clock
//!
//! The runtime auto-advances virtual time whenever every task is idle, so
//! long recordings play out instantly while keeping exact timings.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use castplay::error::{PlayerError, Result};
use castplay::player::{Event, InlineSource, Player, PlayerView, RecordingSource};
use castplay::PlayerOptions;

use crate::helpers::load_fixture;

const WAIT: Duration = Duration::from_secs(3600);

struct FailingSource;

#[async_trait]
impl RecordingSource for FailingSource {
    fn describe(&self) -> String {
        "failing".to_string()
    }

    async fn fetch(&self) -> Result<String> {
        Err(PlayerError::Load("connection refused".to_string()))
    }
}

fn auto_play() -> PlayerOptions {
    PlayerOptions {
        auto_play: true,
        ..PlayerOptions::default()
    }
}

fn player_for(fixture: &str, options: PlayerOptions) -> Player {
    Player::create(Arc::new(InlineSource::new(load_fixture(fixture))), options).unwrap()
}

async fn wait_until<F>(views: &mut watch::Receiver<PlayerView>, mut pred: F) -> PlayerView
where
    F: FnMut(&PlayerView) -> bool,
{
    let view = tokio::time::timeout(WAIT, views.wait_for(|view| pred(view)))
        .await
        .expect("timed out waiting for player view")
        .expect("player stopped publishing");
    view.clone()
}

/// Load, pause, and return a receiver positioned on the paused view.
async fn loaded_and_paused(player: &Player) -> watch::Receiver<PlayerView> {
    let mut views = player.subscribe();
    wait_until(&mut views, |v| v.loaded && v.playing).await;
    player.post(Event::TogglePlay);
    wait_until(&mut views, |v| !v.playing).await;
    views
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test(start_paused = true)]
async fn auto_play_loads_and_starts() {
    let player = player_for("v1.json", auto_play());
    let mut views = player.subscribe();

    let view = wait_until(&mut views, |v| v.loaded && v.playing).await;
    assert_eq!(view.duration, 100.0);
    assert_eq!(view.size, Some((20, 4)));
    assert_eq!(view.title.as_deref(), Some("Century"));
    assert!(!view.loading);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn without_auto_play_nothing_loads_until_toggle() {
    let player = player_for("v1.json", PlayerOptions::default());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!player.view().loaded);
    assert!(!player.view().loading);

    assert!(player.post_named("toggle-play", &[]));
    let mut views = player.subscribe();
    wait_until(&mut views, |v| v.loaded).await;

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn stream_markers_are_published() {
    let player = player_for("sample.cast", auto_play());
    let mut views = player.subscribe();

    let view = wait_until(&mut views, |v| v.loaded).await;
    assert_eq!(view.markers, vec![2.0]);
    assert_eq!(view.duration, 2.5);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_reports_error() {
    let player = Player::create(Arc::new(FailingSource), auto_play()).unwrap();
    let mut views = player.subscribe();

    let view = wait_until(&mut views, |v| v.error.is_some()).await;
    assert!(!view.loading);
    assert!(!view.loaded);
    assert!(view.error.unwrap().contains("connection refused"));

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn out_of_range_line_index_leaves_player_running() {
    let body = r#"[[0, {"lines": {"18446744073709551615": [["x", {}]]}}]]"#;
    let player = Player::create(Arc::new(InlineSource::new(body)), auto_play()).unwrap();
    let mut views = player.subscribe();

    let view = wait_until(&mut views, |v| v.error.is_some()).await;
    assert!(!view.loaded);
    assert!(!view.loading);

    assert!(player.post(Event::Seek(0.5)));
    assert!(player.post(Event::SpeedUp));
    let view = wait_until(&mut views, |v| v.speed == 2.0).await;
    assert!(view.error.is_some());

    let state = player.shutdown().await.expect("dispatch loop should still be alive");
    assert!(!state.is_loaded());
}

#[tokio::test(start_paused = true)]
async fn unsupported_version_reports_error() {
    let player = player_for("unsupported.json", auto_play());
    let mut views = player.subscribe();

    let view = wait_until(&mut views, |v| v.error.is_some()).await;
    assert!(!view.loaded);
    assert!(view.error.unwrap().contains("Unsupported recording version: 5"));

    player.shutdown().await;
}

// ============================================================================
// Seeking and speed
// ============================================================================

#[tokio::test(start_paused = true)]
async fn seek_to_half_while_paused() {
    let player = player_for("v1.json", auto_play());
    let mut views = loaded_and_paused(&player).await;

    player.post(Event::Seek(0.5));
    let view = wait_until(&mut views, |v| v.current_time == 50.0).await;
    assert!(!view.playing);
    assert_eq!(view.progress(), 0.5);
    assert_eq!(view.screen.text_lines()[0], "hello");

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn seek_while_playing_keeps_playing() {
    let player = player_for("v1.json", auto_play());
    let mut views = player.subscribe();
    let before = wait_until(&mut views, |v| v.loaded && v.playing).await;
    assert!(before.current_time < 50.0);

    player.post(Event::Seek(0.5));
    let view = wait_until(&mut views, |v| v.playing && v.current_time >= 50.0).await;
    assert_eq!(view.screen.text_lines()[0], "hello");

    let state = player.shutdown().await.unwrap();
    assert!(state.start_at() >= 50.0);
}

#[tokio::test(start_paused = true)]
async fn rewind_and_fast_forward_step_five_seconds() {
    let player = player_for("v1.json", auto_play());
    let mut views = loaded_and_paused(&player).await;

    player.post(Event::Seek(0.5));
    wait_until(&mut views, |v| v.current_time == 50.0).await;

    player.post(Event::Rewind);
    let back = wait_until(&mut views, |v| v.current_time == 45.0).await;
    assert!(back.screen.text_lines().iter().all(|line| line.is_empty()));

    player.post(Event::FastForward);
    let forward = wait_until(&mut views, |v| v.current_time == 50.0).await;
    assert_eq!(forward.screen.text_lines()[0], "hello");

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn invalid_seek_keeps_player_responsive() {
    let player = player_for("v1.json", auto_play());
    let mut views = loaded_and_paused(&player).await;

    player.post(Event::Seek(f64::NAN));
    player.post(Event::Seek(0.25));
    let view = wait_until(&mut views, |v| v.current_time == 25.0).await;
    assert!(view.error.is_none());

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn speed_doubles_and_halves() {
    let player = player_for("v1.json", auto_play());
    let mut views = loaded_and_paused(&player).await;

    player.post(Event::SpeedUp);
    wait_until(&mut views, |v| v.speed == 2.0).await;
    player.post(Event::SpeedDown);
    player.post(Event::SpeedDown);
    let view = wait_until(&mut views, |v| v.speed == 0.5).await;
    assert!(!view.playing);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn speed_changes_while_playing_never_move_time_backwards() {
    let player = player_for("v1.json", auto_play());
    let mut views = player.subscribe();
    wait_until(&mut views, |v| v.loaded && v.playing).await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    let mut last = player.view().current_time;
    for event in [Event::SpeedUp, Event::SpeedDown, Event::SpeedDown, Event::SpeedUp] {
        player.post(event);
        tokio::time::sleep(Duration::from_secs(1)).await;
        let now = player.view().current_time;
        assert!(now >= last, "time went back from {} to {}", last, now);
        last = now;
    }
    assert!(player.view().playing);
    assert_eq!(player.view().speed, 1.0);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn unknown_named_events_are_dropped() {
    let player = player_for("v1.json", PlayerOptions::default());
    assert!(!player.post_named("explode", &[]));
    assert!(!player.post_named("seek", &[]));
    assert!(player.post_named("seek", &[0.5]));
    player.shutdown().await;
}

// ============================================================================
// Finishing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn playback_stops_at_the_end() {
    let player = player_for("short.json", auto_play());
    let mut views = player.subscribe();

    let view = wait_until(&mut views, |v| v.is_finished()).await;
    assert_eq!(view.current_time, 2.0);
    assert_eq!(view.screen.text_lines()[0], "b");
    assert!(view.screen.cursor.blink_on);

    let state = player.shutdown().await.unwrap();
    assert!(!state.is_playing());
    assert_eq!(state.start_at(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn format_zero_plays_to_the_end() {
    let player = player_for("v0.json", auto_play());
    let mut views = player.subscribe();

    let view = wait_until(&mut views, |v| v.is_finished()).await;
    assert_eq!(view.duration, 1.5);
    assert_eq!(view.screen.text_lines(), vec!["$ ls", "file.txt"]);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn loop_restarts_from_the_beginning() {
    let options = PlayerOptions {
        loop_playback: true,
        ..auto_play()
    };
    let player = player_for("short.json", options);
    let mut views = player.subscribe();

    wait_until(&mut views, |v| v.current_time >= 1.5).await;
    let view = wait_until(&mut views, |v| v.playing && v.current_time < 1.0).await;
    assert!(view.loaded);

    player.shutdown().await;
}

// ============================================================================
// Activity
// ============================================================================

#[tokio::test(start_paused = true)]
async fn activity_goes_quiet_after_idle_period() {
    let player = player_for("v1.json", PlayerOptions::default());
    let mut views = player.subscribe();

    let start = tokio::time::Instant::now();
    player.activity().poke();
    wait_until(&mut views, |v| v.user_active).await;
    wait_until(&mut views, |v| !v.user_active).await;
    assert!(start.elapsed() >= Duration::from_secs(3));

    player.shutdown().await;
}
