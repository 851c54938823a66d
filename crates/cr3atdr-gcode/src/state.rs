//! Tool state threaded through toolpath generation.

use cr3atdr_slicer::Point3;

/// Filament retraction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retraction {
    /// Filament is primed at the nozzle.
    #[default]
    Extruding,
    /// Filament has been pulled back by the retraction length.
    Retracted,
}

/// Mutable state of one generation run.
///
/// A fresh state is created for every run and passed by `&mut` to every
/// function that emits moves.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    /// Current tool position in printer coordinates.
    pub position: Point3,
    /// Current retraction state.
    pub retraction: Retraction,
    /// Total filament pushed by print moves (mm).
    pub extruded: f64,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolState {
    /// State at the origin, primed, nothing extruded.
    pub fn new() -> Self {
        Self {
            position: Point3::origin(),
            retraction: Retraction::Extruding,
            extruded: 0.0,
        }
    }

    /// True while the filament is retracted.
    pub fn is_retracted(&self) -> bool {
        self.retraction == Retraction::Retracted
    }

    /// Absolute extruder axis position given the configured retraction length.
    pub fn e_axis(&self, retraction_length: f64) -> f64 {
        match self.retraction {
            Retraction::Extruding => self.extruded,
            Retraction::Retracted => self.extruded - retraction_length,
        }
    }

    /// XY distance from the current position to `(x, y)`.
    pub fn xy_distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.position.x).hypot(y - self.position.y)
    }
}
