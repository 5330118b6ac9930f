//! Delimited text encoding shared by client and server
//!
//! Every scalar is written as ASCII text (integers in decimal) followed by one
//! `FIELD_SEP` byte. Snapshots are split into four groups, each closed by one
//! `GROUP_SEP` byte: players, hazards, countdown text and timer text. Input
//! frames are a single flat run of fields with no group terminator.
//!
//! Decoding reads by field count, so anything after the last expected
//! terminator (for example the unused tail of a fixed-size buffer) is ignored.
//! Encoding never truncates: a frame that would outgrow its capacity is an error.

use crate::{
    HazardView, InputFrame, PlayerView, Rgb, Snapshot, FIELD_SEP, GROUP_SEP, MAX_INPUT_BYTES,
    MAX_SNAPSHOT_BYTES,
};
use std::fmt::Display;
use std::str::FromStr;

/// Errors produced while encoding or decoding a frame
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("frame needs at least {needed} bytes but capacity is {capacity}")]
    CapacityExceeded { needed: usize, capacity: usize },
    #[error("frame ended before {0} was terminated")]
    Truncated(&'static str),
    #[error("{field} is not an integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("{field} is not a color channel: {value:?}")]
    InvalidColor { field: &'static str, value: String },
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),
    #[error("{0} contains a separator byte")]
    ReservedByte(&'static str),
    #[error("{0} group has unexpected trailing data")]
    MalformedGroup(&'static str),
}

/// Encodes a client input frame: `name x y r g b`, each field terminated.
pub fn encode_input(frame: &InputFrame) -> Result<Vec<u8>, CodecError> {
    let mut writer = FrameWriter::new(MAX_INPUT_BYTES);
    writer.text("name", &frame.name)?;
    writer.int(frame.x)?;
    writer.int(frame.y)?;
    writer.color(frame.color)?;
    Ok(writer.finish())
}

pub fn decode_input(bytes: &[u8]) -> Result<InputFrame, CodecError> {
    let mut reader = FieldReader::new(bytes);
    Ok(InputFrame {
        name: reader.text("name")?,
        x: reader.int("x")?,
        y: reader.int("y")?,
        color: reader.color()?,
    })
}

/// Encodes a full server snapshot into at most `MAX_SNAPSHOT_BYTES`.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>, CodecError> {
    let mut writer = FrameWriter::new(MAX_SNAPSHOT_BYTES);

    for player in &snapshot.players {
        writer.text("player name", &player.name)?;
        writer.int(player.x)?;
        writer.int(player.y)?;
        writer.color(player.color)?;
        writer.int(player.score)?;
    }
    writer.end_group()?;

    for hazard in &snapshot.hazards {
        writer.int(hazard.x)?;
        writer.int(hazard.y)?;
        writer.int(hazard.full_radius)?;
        writer.int(hazard.current_radius)?;
        writer.color(hazard.color)?;
    }
    writer.end_group()?;

    if let Some(countdown) = &snapshot.countdown {
        writer.text("countdown", countdown)?;
    }
    writer.end_group()?;

    if let Some(timer) = &snapshot.timer {
        writer.text("timer", timer)?;
    }
    writer.end_group()?;

    Ok(writer.finish())
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, CodecError> {
    let mut groups = GroupSplitter { rest: bytes };
    let player_group = groups.next("players")?;
    let hazard_group = groups.next("hazards")?;
    let countdown_group = groups.next("countdown")?;
    let timer_group = groups.next("timer")?;

    let mut players = Vec::new();
    let mut reader = FieldReader::new(player_group);
    while !reader.is_empty() {
        players.push(PlayerView {
            name: reader.text("player name")?,
            x: reader.int("player x")?,
            y: reader.int("player y")?,
            color: reader.color()?,
            score: reader.int("player score")?,
        });
    }

    let mut hazards = Vec::new();
    let mut reader = FieldReader::new(hazard_group);
    while !reader.is_empty() {
        hazards.push(HazardView {
            x: reader.int("hazard x")?,
            y: reader.int("hazard y")?,
            full_radius: reader.int("hazard full radius")?,
            current_radius: reader.int("hazard current radius")?,
            color: reader.color()?,
        });
    }

    Ok(Snapshot {
        players,
        hazards,
        countdown: decode_display(countdown_group, "countdown")?,
        timer: decode_display(timer_group, "timer")?,
    })
}

/// A display group holds either nothing or exactly one text field.
fn decode_display(group: &[u8], name: &'static str) -> Result<Option<String>, CodecError> {
    if group.is_empty() {
        return Ok(None);
    }
    let mut reader = FieldReader::new(group);
    let text = reader.text(name)?;
    if !reader.is_empty() {
        return Err(CodecError::MalformedGroup(name));
    }
    Ok(Some(text))
}

struct FrameWriter {
    buffer: Vec<u8>,
    capacity: usize,
}

impl FrameWriter {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, bytes: &[u8], terminator: u8) -> Result<(), CodecError> {
        let needed = self.buffer.len() + bytes.len() + 1;
        if needed > self.capacity {
            return Err(CodecError::CapacityExceeded {
                needed,
                capacity: self.capacity,
            });
        }
        self.buffer.extend_from_slice(bytes);
        self.buffer.push(terminator);
        Ok(())
    }

    fn text(&mut self, field: &'static str, value: &str) -> Result<(), CodecError> {
        if value.bytes().any(|b| b == FIELD_SEP || b == GROUP_SEP) {
            return Err(CodecError::ReservedByte(field));
        }
        self.push(value.as_bytes(), FIELD_SEP)
    }

    fn int(&mut self, value: impl Display) -> Result<(), CodecError> {
        self.push(value.to_string().as_bytes(), FIELD_SEP)
    }

    fn color(&mut self, color: Rgb) -> Result<(), CodecError> {
        self.int(color.r)?;
        self.int(color.g)?;
        self.int(color.b)
    }

    fn end_group(&mut self) -> Result<(), CodecError> {
        self.push(&[], GROUP_SEP)
    }

    fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

struct GroupSplitter<'a> {
    rest: &'a [u8],
}

impl<'a> GroupSplitter<'a> {
    fn next(&mut self, name: &'static str) -> Result<&'a [u8], CodecError> {
        let end = self
            .rest
            .iter()
            .position(|&b| b == GROUP_SEP)
            .ok_or(CodecError::Truncated(name))?;
        let group = &self.rest[..end];
        self.rest = &self.rest[end + 1..];
        Ok(group)
    }
}

struct FieldReader<'a> {
    rest: &'a [u8],
}

impl<'a> FieldReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn raw(&mut self, field: &'static str) -> Result<&'a [u8], CodecError> {
        let end = self
            .rest
            .iter()
            .position(|&b| b == FIELD_SEP)
            .ok_or(CodecError::Truncated(field))?;
        let value = &self.rest[..end];
        self.rest = &self.rest[end + 1..];
        Ok(value)
    }

    fn text(&mut self, field: &'static str) -> Result<String, CodecError> {
        let raw = self.raw(field)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8(field))
    }

    fn int<T: FromStr>(&mut self, field: &'static str) -> Result<T, CodecError> {
        let value = self.text(field)?;
        value
            .parse()
            .map_err(|_| CodecError::InvalidInteger { field, value })
    }

    fn channel(&mut self, field: &'static str) -> Result<u8, CodecError> {
        let value = self.text(field)?;
        value
            .parse()
            .map_err(|_| CodecError::InvalidColor { field, value })
    }

    fn color(&mut self) -> Result<Rgb, CodecError> {
        Ok(Rgb {
            r: self.channel("red")?,
            g: self.channel("green")?,
            b: self.channel("blue")?,
        })
    }
}
