//! Print statistics derived from a command stream.

use std::f64::consts::PI;

use cr3atdr_slicer::{Aabb, Layer};
use serde::{Deserialize, Serialize};

use crate::command::{Command, MoveKind};
use crate::toolpath::FILAMENT_DIAMETER;

/// PLA density (g/cm³).
const PLA_DENSITY: f64 = 1.24;

/// Statistics about one generated program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintStats {
    /// Number of emitted layers.
    pub layer_count: usize,
    /// Number of contours over all layers.
    pub contour_count: usize,
    /// Length of extruding moves (mm).
    pub print_distance_mm: f64,
    /// Length of non-extruding moves, including z-hops (mm).
    pub travel_distance_mm: f64,
    /// Filament consumed (mm).
    pub filament_mm: f64,
    /// Filament weight assuming PLA (g).
    pub filament_grams: f64,
    /// Estimated motion time, ignoring acceleration (s).
    pub print_time_seconds: f64,
    /// Mesh bounding box min corner.
    pub bounds_min: Option<[f64; 3]>,
    /// Mesh bounding box max corner.
    pub bounds_max: Option<[f64; 3]>,
}

impl PrintStats {
    /// Replay `commands` from the origin, summing distances and feed-rate time.
    pub fn from_commands(
        commands: &[Command],
        layers: &[Layer],
        bounds: Option<&Aabb>,
        filament_mm: f64,
    ) -> Self {
        let mut pos = [0.0f64; 3];
        let mut print_distance = 0.0;
        let mut travel_distance = 0.0;
        let mut time = 0.0;

        for command in commands {
            let Command::Move(m) = command else {
                continue;
            };
            let target = [
                m.x.unwrap_or(pos[0]),
                m.y.unwrap_or(pos[1]),
                m.z.unwrap_or(pos[2]),
            ];
            let distance = ((target[0] - pos[0]).powi(2)
                + (target[1] - pos[1]).powi(2)
                + (target[2] - pos[2]).powi(2))
            .sqrt();
            pos = target;

            // Retractions move only the extruder.
            let path = match m.kind {
                MoveKind::Print => {
                    print_distance += distance;
                    distance
                }
                MoveKind::Travel | MoveKind::ZHop => {
                    travel_distance += distance;
                    distance
                }
                MoveKind::Retract | MoveKind::Unretract => m.e.map_or(0.0, f64::abs),
            };
            if m.feed > 0.0 {
                time += path / (m.feed / 60.0);
            }
        }

        let filament_area = PI * (FILAMENT_DIAMETER / 2.0).powi(2);
        let filament_cm3 = filament_area * filament_mm / 1000.0;

        Self {
            layer_count: layers.len(),
            contour_count: layers.iter().map(|l| l.contours.len()).sum(),
            print_distance_mm: print_distance,
            travel_distance_mm: travel_distance,
            filament_mm,
            filament_grams: filament_cm3 * PLA_DENSITY,
            print_time_seconds: time,
            bounds_min: bounds.map(|b| [b.min.x, b.min.y, b.min.z]),
            bounds_max: bounds.map(|b| [b.max.x, b.max.y, b.max.z]),
        }
    }

    /// Comment lines summarising the run.
    pub fn comment_lines(&self) -> Vec<String> {
        vec![
            "; Stats".to_string(),
            format!("; layers: {}", self.layer_count),
            format!("; contours: {}", self.contour_count),
            format!("; filament: {:.1} mm ({:.2} g)", self.filament_mm, self.filament_grams),
            format!("; print distance: {:.1} mm", self.print_distance_mm),
            format!("; travel distance: {:.1} mm", self.travel_distance_mm),
            format!("; estimated time: {:.0} s", self.print_time_seconds),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Move;
    use approx::assert_relative_eq;

    fn mv(kind: MoveKind, x: Option<f64>, z: Option<f64>, e: Option<f64>, feed: f64) -> Command {
        Command::Move(Move {
            kind,
            x,
            y: None,
            z,
            e,
            feed,
        })
    }

    #[test]
    fn test_distances_and_time() {
        let commands = vec![
            Command::Comment("Layer 0".into()),
            mv(MoveKind::Retract, None, None, Some(-5.0), 2700.0),
            mv(MoveKind::ZHop, None, Some(0.5), None, 3000.0),
            mv(MoveKind::Travel, Some(60.0), None, None, 7200.0),
            mv(MoveKind::ZHop, None, Some(0.3), None, 3000.0),
            mv(MoveKind::Unretract, None, None, Some(5.0), 2700.0),
            mv(MoveKind::Print, Some(120.0), None, Some(1.0), 3600.0),
        ];
        let stats = PrintStats::from_commands(&commands, &[], None, 1.0);

        assert_relative_eq!(stats.print_distance_mm, 60.0);
        assert_relative_eq!(stats.travel_distance_mm, 60.7, epsilon = 1e-9);
        // 5/45 + 0.5/50 + 60/120 + 0.2/50 + 5/45 + 60/60
        let expected = 10.0 / 45.0 + 0.7 / 50.0 + 0.5 + 1.0;
        assert_relative_eq!(stats.print_time_seconds, expected, epsilon = 1e-9);
        assert!(stats.bounds_min.is_none());
    }

    #[test]
    fn test_filament_weight() {
        let stats = PrintStats::from_commands(&[], &[], None, 1000.0);
        // 1 m of 1.75 mm filament is about 2.4 cm³.
        assert_relative_eq!(stats.filament_grams, 2.405 * 1.24, epsilon = 1e-2);
        assert_eq!(stats.comment_lines().len(), 7);
    }
}
