//! Print settings.

use cr3atdr_slicer::SliceAxis;
use serde::{Deserialize, Serialize};

use crate::error::{GcodeError, Result};

/// How E values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtrusionMode {
    /// `M83`: each move carries the filament it pushes.
    #[default]
    Relative,
    /// `M82`: each move carries the absolute extruder position.
    Absolute,
}

/// Printer and process settings for one generation run.
///
/// Lengths are in mm, speeds in mm/s, temperatures in °C. Every field has a
/// default, so partial TOML or JSON documents deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSettings {
    /// Nozzle diameter, also used as the extrusion line width.
    pub nozzle_diameter: f64,
    /// Layer height.
    pub layer_height: f64,
    /// Print move speed.
    pub print_speed: f64,
    /// Travel move speed.
    pub travel_speed: f64,
    /// Retraction length.
    pub retraction_length: f64,
    /// Retraction speed.
    pub retraction_speed: f64,
    /// Bed temperature.
    pub bed_temp: u32,
    /// Nozzle temperature.
    pub nozzle_temp: u32,
    /// Part cooling fan PWM (0-255), switched on after the first layer.
    pub fan_speed: u8,
    /// Height of the skirt.
    pub initial_layer_height: f64,
    /// Print speed for the skirt.
    pub initial_layer_speed: f64,
    /// Z lift during travel moves.
    pub z_hop_height: f64,
    /// Lift and retract during travel moves.
    pub use_z_hop: bool,
    /// Speed of vertical z-hop moves.
    pub z_hop_speed: f64,
    /// Number of skirt loops.
    pub skirt_line_count: u32,
    /// Gap between the model footprint and the innermost skirt loop.
    pub skirt_distance: f64,
    /// Mesh axis used as print height.
    pub slice_axis: SliceAxis,
    /// E value convention.
    pub extrusion_mode: ExtrusionMode,
    /// Support generation request. Accepted but not generated.
    pub generate_supports: bool,
    /// Overhang angle for support detection (degrees).
    pub support_overhang_angle: f64,
    /// Append a statistics comment block before the end sequence.
    pub include_stats: bool,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            nozzle_diameter: 0.4,
            layer_height: 0.2,
            print_speed: 60.0,
            travel_speed: 120.0,
            retraction_length: 5.0,
            retraction_speed: 45.0,
            bed_temp: 60,
            nozzle_temp: 200,
            fan_speed: 255,
            initial_layer_height: 0.3,
            initial_layer_speed: 30.0,
            z_hop_height: 0.2,
            use_z_hop: true,
            z_hop_speed: 50.0,
            skirt_line_count: 2,
            skirt_distance: 4.0,
            slice_axis: SliceAxis::Z,
            extrusion_mode: ExtrusionMode::Relative,
            generate_supports: false,
            support_overhang_angle: 45.0,
            include_stats: false,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GcodeError::InvalidSettings(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GcodeError::InvalidSettings(format!(
            "{name} must not be negative, got {value}"
        )))
    }
}

impl PrintSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        positive("nozzle_diameter", self.nozzle_diameter)?;
        positive("layer_height", self.layer_height)?;
        positive("initial_layer_height", self.initial_layer_height)?;
        positive("print_speed", self.print_speed)?;
        positive("travel_speed", self.travel_speed)?;
        positive("initial_layer_speed", self.initial_layer_speed)?;
        positive("retraction_speed", self.retraction_speed)?;
        positive("z_hop_speed", self.z_hop_speed)?;
        non_negative("retraction_length", self.retraction_length)?;
        non_negative("z_hop_height", self.z_hop_height)?;
        non_negative("skirt_distance", self.skirt_distance)?;
        if !(0.0..=90.0).contains(&self.support_overhang_angle) {
            return Err(GcodeError::InvalidSettings(
                "support_overhang_angle must be between 0 and 90 degrees".into(),
            ));
        }
        Ok(())
    }

    /// Parse settings from TOML, filling unspecified fields with defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let s = PrintSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.skirt_line_count, 2);
        assert!(s.use_z_hop);
    }

    #[test]
    fn test_invalid_settings() {
        let s = PrintSettings {
            layer_height: -0.1,
            ..Default::default()
        };
        assert!(s.validate().is_err());

        let s = PrintSettings {
            travel_speed: f64::NAN,
            ..Default::default()
        };
        assert!(s.validate().is_err());

        let s = PrintSettings {
            retraction_length: -1.0,
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let s = PrintSettings::from_toml_str(
            "layer_height = 0.5\nuse_z_hop = false\nslice_axis = \"y\"\nextrusion_mode = \"absolute\"\n",
        )
        .unwrap();
        assert_eq!(s.layer_height, 0.5);
        assert!(!s.use_z_hop);
        assert_eq!(s.slice_axis, SliceAxis::Y);
        assert_eq!(s.extrusion_mode, ExtrusionMode::Absolute);
        assert_eq!(s.nozzle_temp, 200);
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        assert!(PrintSettings::from_toml_str("nozzle_diameter = 0.0").is_err());
        assert!(PrintSettings::from_toml_str("layer_height = \"thin\"").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let s = PrintSettings {
            fan_speed: 128,
            ..Default::default()
        };
        let text = s.to_toml_string().unwrap();
        assert_eq!(PrintSettings::from_toml_str(&text).unwrap(), s);
    }

    #[test]
    fn test_json_overrides() {
        let s: PrintSettings = serde_json::from_str(r#"{"skirt_line_count": 0}"#).unwrap();
        assert_eq!(s.skirt_line_count, 0);
        assert_eq!(s.print_speed, 60.0);
    }
}
