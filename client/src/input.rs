//! Client input capture with edge detection
//!
//! The render thread samples the keyboard every frame and forwards only the
//! changes, as press/release events, to the network task. The network task
//! folds those events back into the set of held directions it moves by.

use macroquad::prelude::{is_key_down, KeyCode};
use std::collections::HashSet;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::mpsc::{self, Receiver, Sender};

/// Bound on queued key events between the render thread and the network task
pub const KEY_EVENT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in screen coordinates (y grows downwards)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// WASD and arrow keys
    fn keys(self) -> [KeyCode; 2] {
        match self {
            Direction::Up => [KeyCode::W, KeyCode::Up],
            Direction::Down => [KeyCode::S, KeyCode::Down],
            Direction::Left => [KeyCode::A, KeyCode::Left],
            Direction::Right => [KeyCode::D, KeyCode::Right],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Pressed(Direction),
    Released(Direction),
}

/// Events that turn the `prev` held set into `now`, in `Direction::ALL` order
pub fn diff(prev: &HashSet<Direction>, now: &HashSet<Direction>) -> Vec<KeyEvent> {
    Direction::ALL
        .iter()
        .filter_map(|&dir| match (prev.contains(&dir), now.contains(&dir)) {
            (false, true) => Some(KeyEvent::Pressed(dir)),
            (true, false) => Some(KeyEvent::Released(dir)),
            _ => None,
        })
        .collect()
}

/// Creates the capture side and the held-key side of one input channel
pub fn key_channel() -> (InputCapture, HeldKeys) {
    let (tx, rx) = mpsc::channel(KEY_EVENT_CAPACITY);
    (InputCapture::new(tx), HeldKeys::new(rx))
}

/// Render-thread half: samples the keyboard and reports edges
pub struct InputCapture {
    tx: Sender<KeyEvent>,
    /// Held set as last successfully reported to the network task
    reported: HashSet<Direction>,
}

impl InputCapture {
    pub fn new(tx: Sender<KeyEvent>) -> Self {
        Self {
            tx,
            reported: HashSet::new(),
        }
    }

    /// Samples the keyboard; must run inside the macroquad frame loop
    pub fn poll(&mut self) -> usize {
        let now: HashSet<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|dir| dir.keys().iter().any(|&key| is_key_down(key)))
            .collect();
        self.report(&now)
    }

    /// Sends the events needed to bring the network task up to `now`.
    ///
    /// Returns how many events were delivered. When the channel is full the
    /// rest stay pending and are sent on a later call.
    pub fn report(&mut self, now: &HashSet<Direction>) -> usize {
        let mut sent = 0;
        for event in diff(&self.reported, now) {
            match self.tx.try_send(event) {
                Ok(()) => {
                    match event {
                        KeyEvent::Pressed(dir) => self.reported.insert(dir),
                        KeyEvent::Released(dir) => self.reported.remove(&dir),
                    };
                    sent += 1;
                }
                Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => break,
            }
        }
        sent
    }
}

/// Network-task half: the set of directions currently held
pub struct HeldKeys {
    rx: Receiver<KeyEvent>,
    held: HashSet<Direction>,
}

impl HeldKeys {
    pub fn new(rx: Receiver<KeyEvent>) -> Self {
        Self {
            rx,
            held: HashSet::new(),
        }
    }

    /// Applies every queued event without waiting.
    ///
    /// Returns false once the capture side is gone and nothing is left.
    pub fn drain(&mut self) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(KeyEvent::Pressed(dir)) => {
                    self.held.insert(dir);
                }
                Ok(KeyEvent::Released(dir)) => {
                    self.held.remove(&dir);
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    pub fn held(&self) -> &HashSet<Direction> {
        &self.held
    }
}
