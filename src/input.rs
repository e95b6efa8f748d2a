//! Terminal input for the command-line player.
//!
//! A background thread polls crossterm and forwards raw events into the
//! async side, where [`map_event`] turns them into player actions.

use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use crate::player::Event;

/// What the command-line player should do with one terminal event.
#[derive(Debug)]
pub enum Action {
    /// Leave the player
    Quit,
    /// Forward to the player's event queue
    Post(Event),
    /// Terminal size changed
    Redraw,
    /// Input that only counts as user activity
    Activity,
}

/// Map a terminal event to a player action.
///
/// Key releases are ignored. Any mouse event counts as activity.
pub fn map_event(event: &TermEvent) -> Option<Action> {
    match event {
        TermEvent::Key(key) if key.kind != KeyEventKind::Release => map_key(key),
        TermEvent::Mouse(_) => Some(Action::Activity),
        TermEvent::Resize(_, _) => Some(Action::Redraw),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') => Action::Post(Event::TogglePlay),
        KeyCode::Left | KeyCode::Char(',') | KeyCode::Char('<') => Action::Post(Event::Rewind),
        KeyCode::Right | KeyCode::Char('.') | KeyCode::Char('>') => Action::Post(Event::FastForward),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Post(Event::SpeedUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Action::Post(Event::SpeedDown),
        KeyCode::Home => Action::Post(Event::Seek(0.0)),
        KeyCode::Char(digit @ '0'..='9') => {
            let tenth = digit.to_digit(10).unwrap_or(0) as f64;
            Action::Post(Event::Seek(tenth / 10.0))
        }
        _ => Action::Activity,
    };
    Some(action)
}

/// Background reader forwarding crossterm events.
///
/// The thread exits once the receiving side is dropped.
pub struct InputReader {
    _handle: thread::JoinHandle<()>,
}

impl InputReader {
    pub fn spawn(tx: mpsc::UnboundedSender<TermEvent>, poll_interval: Duration) -> Self {
        let handle = thread::spawn(move || loop {
            match event::poll(poll_interval) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "Terminal read failed");
                        break;
                    }
                },
                Ok(false) => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(err) => {
                    debug!(error = %err, "Terminal poll failed");
                    break;
                }
            }
        });
        Self { _handle: handle }
    }
}
