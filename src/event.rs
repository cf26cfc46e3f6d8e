use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

use crate::error::{NavError, Result};

/// Host events.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Periodic tick; expires status messages.
    Tick,
    Resize(u16, u16),
    /// Paths changed on disk, reported by the watcher.
    FsChange(Vec<PathBuf>),
}

/// Polls crossterm on a background task and forwards events over a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        // Windows reports releases too.
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                        Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                        _ => continue,
                    }
                } else {
                    Event::Tick
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for other producers, e.g. the filesystem watcher.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| NavError::Terminal("Event channel closed".into()))
    }
}
