//! Typed toolpath commands and their G-code text form.

use std::fmt;

/// What a move does, used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Extruding move.
    Print,
    /// Non-extruding lateral move.
    Travel,
    /// Vertical lift or drop around a travel.
    ZHop,
    /// Filament pull-back.
    Retract,
    /// Filament re-prime.
    Unretract,
}

/// A `G1` move. Axes left as `None` are not written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    /// Move purpose.
    pub kind: MoveKind,
    /// Target X.
    pub x: Option<f64>,
    /// Target Y.
    pub y: Option<f64>,
    /// Target Z.
    pub z: Option<f64>,
    /// Extruder value (relative amount or absolute position).
    pub e: Option<f64>,
    /// Feed rate in mm/min.
    pub feed: f64,
}

/// One line of the toolpath program.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `; text`
    Comment(String),
    /// `G1 ...`
    Move(Move),
    /// `M106 S<speed>`
    FanOn(u8),
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("G1")?;
        if let Some(x) = self.x {
            write!(f, " X{x:.3}")?;
        }
        if let Some(y) = self.y {
            write!(f, " Y{y:.3}")?;
        }
        if let Some(z) = self.z {
            write!(f, " Z{z:.3}")?;
        }
        if let Some(e) = self.e {
            write!(f, " E{e:.4}")?;
        }
        write!(f, " F{:.0}", self.feed)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Comment(text) => write!(f, "; {text}"),
            Command::Move(m) => write!(f, "{m}"),
            Command::FanOn(speed) => write!(f, "M106 S{speed}"),
        }
    }
}
