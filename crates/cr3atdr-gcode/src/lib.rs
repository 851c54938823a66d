#![warn(missing_docs)]

//! G-code generation for the cr3atdr slicer.
//!
//! This crate turns a triangle mesh into a single-extruder toolpath program:
//! a skirt around the model footprint, then every sliced contour printed as a
//! closed loop, with retraction and z-hop around travel moves.
//!
//! # Example
//!
//! ```
//! use cr3atdr_gcode::{GcodeGenerator, PrintSettings};
//! use cr3atdr_slicer::{box_mesh, Point3};
//!
//! let mesh = box_mesh(Point3::origin(), Point3::new(10.0, 10.0, 2.0));
//! let generator = GcodeGenerator::new(PrintSettings::default()).unwrap();
//! let output = generator.generate(&mesh).unwrap();
//!
//! assert_eq!(output.stats.layer_count, 10);
//! assert!(output.gcode.contains("; Layer 9"));
//! ```

pub mod command;
pub mod emitter;
pub mod error;
pub mod settings;
pub mod state;
pub mod stats;
pub mod toolpath;

pub use command::{Command, Move, MoveKind};
pub use emitter::{emit_program, postamble, preamble};
pub use error::{GcodeError, Result};
pub use settings::{ExtrusionMode, PrintSettings};
pub use state::{Retraction, ToolState};
pub use stats::PrintStats;
pub use toolpath::{calculate_extrusion, ToolpathGenerator, FILAMENT_DIAMETER};

use cr3atdr_slicer::{Layer, Slicer, TriangleMesh};
use tracing::{info, warn};

/// File name used when saving a program without an explicit path.
pub const DEFAULT_FILENAME: &str = "print.gcode";

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct GcodeOutput {
    /// Complete program text.
    pub gcode: String,
    /// Sliced layers the program was built from.
    pub layers: Vec<Layer>,
    /// Program statistics.
    pub stats: PrintStats,
}

/// Mesh to G-code pipeline with fixed settings.
///
/// The generator itself is immutable; each [`generate`](Self::generate) call
/// builds its own [`ToolState`], so one generator can serve any number of runs.
#[derive(Debug, Clone)]
pub struct GcodeGenerator {
    settings: PrintSettings,
    slicer: Slicer,
}

impl GcodeGenerator {
    /// Validate `settings` and build a generator.
    pub fn new(settings: PrintSettings) -> Result<Self> {
        settings.validate()?;
        let slicer = Slicer::new(settings.layer_height, settings.slice_axis)?;
        Ok(Self { settings, slicer })
    }

    /// Settings in use.
    pub fn settings(&self) -> &PrintSettings {
        &self.settings
    }

    /// Slice `mesh` and emit the complete program.
    ///
    /// An empty mesh produces only the start and end sequences.
    pub fn generate(&self, mesh: &TriangleMesh) -> Result<GcodeOutput> {
        if self.settings.generate_supports {
            warn!(
                overhang_angle = self.settings.support_overhang_angle,
                "Support generation is not implemented, printing without supports"
            );
        }

        let layers = self.slicer.slice(mesh)?;
        let bounds = if mesh.is_empty() { None } else { mesh.bounds() };

        let mut state = ToolState::new();
        let commands = ToolpathGenerator::new(&self.settings).generate(
            &mut state,
            &layers,
            bounds.as_ref(),
        );
        let stats = PrintStats::from_commands(&commands, &layers, bounds.as_ref(), state.extruded);

        let gcode = emit_program(
            &self.settings,
            &commands,
            self.settings.include_stats.then_some(&stats),
        );

        info!(
            layers = stats.layer_count,
            contours = stats.contour_count,
            filament_mm = stats.filament_mm,
            lines = gcode.lines().count(),
            "G-code generation complete"
        );

        Ok(GcodeOutput {
            gcode,
            layers,
            stats,
        })
    }
}

/// Generate a program for `mesh` with `settings`.
pub fn generate_gcode(mesh: &TriangleMesh, settings: PrintSettings) -> Result<String> {
    Ok(GcodeGenerator::new(settings)?.generate(mesh)?.gcode)
}
