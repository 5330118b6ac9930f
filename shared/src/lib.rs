pub mod codec;

pub use codec::{decode_input, decode_snapshot, encode_input, encode_snapshot, CodecError};

/// Terminates every scalar field on the wire (ASCII unit separator).
pub const FIELD_SEP: u8 = 31;
/// Terminates every group of fields on the wire (ASCII group separator).
pub const GROUP_SEP: u8 = 29;

/// Largest server -> client snapshot, in bytes.
pub const MAX_SNAPSHOT_BYTES: usize = 1024;
/// Largest client -> server input frame; matches the server's receive buffer.
pub const MAX_INPUT_BYTES: usize = 512;

pub const ARENA_WIDTH: i32 = 1000;
pub const ARENA_HEIGHT: i32 = 500;

pub const PLAYER_HALF_WIDTH: i32 = 10;
pub const PLAYER_HALF_HEIGHT: i32 = 25;
/// Pixels moved per held direction key per client tick.
pub const PLAYER_SPEED: i32 = 15;
/// Longest display name, in UTF-8 bytes.
pub const MAX_NAME_BYTES: usize = 16;

pub const SERVER_TICK_RATE: u32 = 100;
pub const CLIENT_TICK_RATE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// What a client reports about itself every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFrame {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
}

/// One player as carried inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
    pub score: u32,
}

/// One live hazard as carried inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardView {
    pub x: i32,
    pub y: i32,
    pub full_radius: i32,
    pub current_radius: i32,
    pub color: Rgb,
}

/// Full game state sent from the server to one client.
///
/// `countdown` is only present before the game starts and `timer` only while it
/// is running, so a snapshot with neither means the game is over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub players: Vec<PlayerView>,
    pub hazards: Vec<HazardView>,
    pub countdown: Option<String>,
    pub timer: Option<String>,
}

/// Trims surrounding whitespace and caps the name at `MAX_NAME_BYTES` bytes.
///
/// The cut always lands on a character boundary, so a name of wide
/// characters may come out a few bytes shorter than the cap.
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut end = trimmed.len().min(MAX_NAME_BYTES);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/// Clamps a token center so its full extent stays inside the arena.
pub fn clamp_token(x: i32, y: i32) -> (i32, i32) {
    (
        x.clamp(PLAYER_HALF_WIDTH, ARENA_WIDTH - PLAYER_HALF_WIDTH),
        y.clamp(PLAYER_HALF_HEIGHT, ARENA_HEIGHT - PLAYER_HALF_HEIGHT),
    )
}
