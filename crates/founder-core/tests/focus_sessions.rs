//! Focus gating through the [`Game`]: debounce, the minimum session rule,
//! pause and resume, and the daily total.

#![allow(clippy::unwrap_used)]

mod common;

use chrono::{TimeZone, Utc};
use common::{Recorder, close, config, focus, game};
use founder_types::{EventKind, GameEvent};

#[test]
fn focus_shorter_than_debounce_is_ignored() {
    let (mut game, time) = game(config(100.0));
    let recorder = Recorder::attach(game.bus());

    assert!(game.focus_gained().is_some());
    time.advance_secs(0.5);
    game.tick(0.5).unwrap();
    game.focus_lost();
    time.advance_secs(1.0);
    let summary = game.tick(1.0).unwrap();

    assert!(!game.focus().focused());
    assert!(summary.delta.abs() < f64::EPSILON);
    assert_eq!(recorder.count(EventKind::FocusGained), 0);
}

#[test]
fn short_session_is_not_counted() {
    let (mut game, time) = game(config(100.0));
    let recorder = Recorder::attach(game.bus());

    focus(&mut game, &time);
    time.advance_secs(1.5);
    game.tick(1.5).unwrap();
    game.focus_lost();

    assert_eq!(recorder.count(EventKind::FocusGained), 1);
    assert_eq!(recorder.count(EventKind::FocusLost), 1);
    assert_eq!(recorder.count(EventKind::SessionStarted), 0);
    assert_eq!(recorder.count(EventKind::SessionEnded), 0);
    assert!(game.focus().total_focus_today_secs().abs() < f64::EPSILON);
    // The gated clock still granted the time while focused.
    assert!(close(game.clock().simulated_secs(), 1.5));
}

#[test]
fn long_session_counts_toward_daily_total() {
    let (mut game, time) = game(config(100.0));
    let recorder = Recorder::attach(game.bus());

    focus(&mut game, &time);
    time.advance_secs(5.0);
    game.tick(5.0).unwrap();
    assert_eq!(recorder.count(EventKind::SessionStarted), 1);
    game.focus_lost();

    let ended: Vec<f64> = recorder
        .events()
        .iter()
        .filter_map(|event| match event {
            GameEvent::SessionEnded { duration_secs, .. } => Some(*duration_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ended.len(), 1);
    assert!(ended.first().is_some_and(|secs| close(*secs, 5.0)));
    assert!(close(game.focus().total_focus_today_secs(), 5.0));
}

#[test]
fn pause_blocks_focus_until_resume() {
    let (mut game, time) = game(config(100.0));
    focus(&mut game, &time);

    game.pause();
    assert!(!game.focus().focused());
    assert!(game.focus_gained().is_none());
    time.advance_secs(2.0);
    assert!(game.tick(2.0).unwrap().delta.abs() < f64::EPSILON);

    let handle = game.resume().unwrap();
    assert!(game.fire_timer(handle));
    assert!(game.focus().focused());
    assert!(!game.fire_timer(handle));
}

#[test]
fn stale_debounce_handle_does_nothing() {
    let (mut game, time) = game(config(100.0));
    let handle = game.focus_gained().unwrap();
    game.focus_lost();
    time.advance_secs(2.0);

    assert!(!game.fire_timer(handle));
    game.tick(0.0).unwrap();
    assert!(!game.focus().focused());
}

#[test]
fn daily_total_resets_on_a_new_day() {
    let (mut game, time) = game(config(100.0));
    focus(&mut game, &time);
    time.advance_secs(10.0);
    game.focus_lost();
    assert!(close(game.focus().total_focus_today_secs(), 10.0));

    time.set(Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0).unwrap());
    focus(&mut game, &time);
    assert!(game.focus().total_focus_today_secs().abs() < f64::EPSILON);
    assert_eq!(
        game.focus().last_reset_date(),
        Some(chrono::NaiveDate::from_ymd_opt(2026, 3, 3).unwrap())
    );
}
