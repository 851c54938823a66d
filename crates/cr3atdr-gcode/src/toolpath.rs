//! Toolpath generation - skirt and contour loops with retraction and z-hop.
//!
//! Every emitting method takes the run's [`ToolState`] explicitly and appends
//! to a command buffer, so moves can be replayed and inspected in isolation.

use std::f64::consts::PI;

use cr3atdr_slicer::{Aabb, Contour, Layer};
use tracing::debug;

use crate::command::{Command, Move, MoveKind};
use crate::settings::{ExtrusionMode, PrintSettings};
use crate::state::{Retraction, ToolState};

/// Filament diameter assumed for volume to length conversion (mm).
pub const FILAMENT_DIAMETER: f64 = 1.75;

/// Filament length (mm) needed to lay a bead of `distance` x `layer_height` x `line_width`.
pub fn calculate_extrusion(distance: f64, layer_height: f64, line_width: f64) -> f64 {
    let volume = distance * layer_height * line_width;
    volume / (PI * (FILAMENT_DIAMETER / 2.0).powi(2))
}

/// mm/s to mm/min.
#[inline]
fn feed(speed: f64) -> f64 {
    speed * 60.0
}

/// Emits motion commands for one generation run.
#[derive(Debug, Clone, Copy)]
pub struct ToolpathGenerator<'a> {
    settings: &'a PrintSettings,
}

impl<'a> ToolpathGenerator<'a> {
    /// Create a generator over validated settings.
    pub fn new(settings: &'a PrintSettings) -> Self {
        Self { settings }
    }

    /// Filament for a print move of `distance` at the configured layer height and nozzle width.
    pub fn extrusion_for(&self, distance: f64) -> f64 {
        calculate_extrusion(
            distance,
            self.settings.layer_height,
            self.settings.nozzle_diameter,
        )
    }

    fn retraction_move(&self, state: &ToolState, kind: MoveKind, delta: f64) -> Command {
        let e = match self.settings.extrusion_mode {
            ExtrusionMode::Relative => delta,
            ExtrusionMode::Absolute => state.e_axis(self.settings.retraction_length),
        };
        Command::Move(Move {
            kind,
            x: None,
            y: None,
            z: None,
            e: Some(e),
            feed: feed(self.settings.retraction_speed),
        })
    }

    /// Pull filament back. No-op when already retracted.
    pub fn retract(&self, state: &mut ToolState, out: &mut Vec<Command>) {
        if state.is_retracted() {
            return;
        }
        state.retraction = Retraction::Retracted;
        out.push(self.retraction_move(
            state,
            MoveKind::Retract,
            -self.settings.retraction_length,
        ));
    }

    /// Re-prime filament. No-op when not retracted.
    pub fn unretract(&self, state: &mut ToolState, out: &mut Vec<Command>) {
        if !state.is_retracted() {
            return;
        }
        state.retraction = Retraction::Extruding;
        out.push(self.retraction_move(
            state,
            MoveKind::Unretract,
            self.settings.retraction_length,
        ));
    }

    fn z_move(&self, z: f64) -> Command {
        Command::Move(Move {
            kind: MoveKind::ZHop,
            x: None,
            y: None,
            z: Some(z),
            e: None,
            feed: feed(self.settings.z_hop_speed),
        })
    }

    /// Move to `(x, y)` at height `z` without extruding.
    ///
    /// With z-hop enabled the lateral move is bracketed by retract, lift,
    /// drop and unretract. Without it the tool moves straight there and the
    /// retraction state is left alone.
    pub fn travel(&self, state: &mut ToolState, out: &mut Vec<Command>, x: f64, y: f64, z: f64) {
        let travel_feed = feed(self.settings.travel_speed);
        if self.settings.use_z_hop {
            self.retract(state, out);
            out.push(self.z_move(z + self.settings.z_hop_height));
            out.push(Command::Move(Move {
                kind: MoveKind::Travel,
                x: Some(x),
                y: Some(y),
                z: None,
                e: None,
                feed: travel_feed,
            }));
            out.push(self.z_move(z));
            self.unretract(state, out);
        } else {
            out.push(Command::Move(Move {
                kind: MoveKind::Travel,
                x: Some(x),
                y: Some(y),
                z: Some(z),
                e: None,
                feed: travel_feed,
            }));
        }
        state.position.x = x;
        state.position.y = y;
        state.position.z = z;
    }

    /// Extruding move at print speed.
    ///
    /// `extrusion` overrides the filament amount; otherwise it is derived from
    /// the XY distance to the target.
    pub fn print_move(
        &self,
        state: &mut ToolState,
        out: &mut Vec<Command>,
        x: f64,
        y: f64,
        z: f64,
        extrusion: Option<f64>,
    ) {
        self.print_move_at(state, out, x, y, z, extrusion, self.settings.print_speed);
    }

    #[allow(clippy::too_many_arguments)]
    fn print_move_at(
        &self,
        state: &mut ToolState,
        out: &mut Vec<Command>,
        x: f64,
        y: f64,
        z: f64,
        extrusion: Option<f64>,
        speed: f64,
    ) {
        let amount = extrusion.unwrap_or_else(|| self.extrusion_for(state.xy_distance_to(x, y)));
        state.extruded += amount;
        let e = match self.settings.extrusion_mode {
            ExtrusionMode::Relative => amount,
            ExtrusionMode::Absolute => state.e_axis(self.settings.retraction_length),
        };
        out.push(Command::Move(Move {
            kind: MoveKind::Print,
            x: Some(x),
            y: Some(y),
            z: Some(z),
            e: Some(e),
            feed: feed(speed),
        }));
        state.position.x = x;
        state.position.y = y;
        state.position.z = z;
    }

    /// Rectangular priming loops around the mesh footprint at the initial layer height.
    pub fn skirt(&self, state: &mut ToolState, out: &mut Vec<Command>, bounds: &Aabb) {
        let s = self.settings;
        let z = s.initial_layer_height;
        let (lo, hi) = bounds.plane_rect(s.slice_axis);

        for i in 0..s.skirt_line_count {
            let offset = s.skirt_distance + i as f64 * s.nozzle_diameter;
            let corners = [
                (lo[0] - offset, lo[1] - offset),
                (hi[0] + offset, lo[1] - offset),
                (hi[0] + offset, hi[1] + offset),
                (lo[0] - offset, hi[1] + offset),
            ];

            self.travel(state, out, corners[0].0, corners[0].1, z);
            self.unretract(state, out);
            for &(x, y) in &corners {
                self.print_move_at(state, out, x, y, z, None, s.initial_layer_speed);
            }
            self.print_move_at(
                state,
                out,
                corners[0].0,
                corners[0].1,
                z,
                None,
                s.initial_layer_speed,
            );
        }
    }

    /// Print one closed contour at height `z`, returning to its first point.
    pub fn contour(&self, state: &mut ToolState, out: &mut Vec<Command>, contour: &Contour, z: f64) {
        let Some(start) = contour.start() else {
            return;
        };
        self.travel(state, out, start.x, start.y, z);
        self.unretract(state, out);
        for p in &contour.points[1..] {
            self.print_move(state, out, p.x, p.y, z, None);
        }
        self.print_move(state, out, start.x, start.y, z, None);
    }

    /// Print every contour of a layer in order.
    pub fn layer(&self, state: &mut ToolState, out: &mut Vec<Command>, layer: &Layer) {
        out.push(Command::Comment(format!("Layer {}", layer.index)));
        if layer.index == 1 && self.settings.fan_speed > 0 {
            out.push(Command::FanOn(self.settings.fan_speed));
        }
        for (i, contour) in layer.contours.iter().enumerate() {
            out.push(Command::Comment(format!("Contour {i}")));
            self.contour(state, out, contour, layer.z);
        }
        debug!(
            layer = layer.index,
            z = layer.z,
            contours = layer.contours.len(),
            extruded = state.extruded,
            "Generated layer toolpath"
        );
    }

    /// Skirt (when the mesh has bounds) followed by all layers, bottom to top.
    pub fn generate(
        &self,
        state: &mut ToolState,
        layers: &[Layer],
        bounds: Option<&Aabb>,
    ) -> Vec<Command> {
        let mut out = Vec::new();
        if let Some(bounds) = bounds {
            if self.settings.skirt_line_count > 0 {
                out.push(Command::Comment("Skirt".into()));
                self.skirt(state, &mut out, bounds);
            }
        }
        for layer in layers {
            self.layer(state, &mut out, layer);
        }
        out
    }
}
