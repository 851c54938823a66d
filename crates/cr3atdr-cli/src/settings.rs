//! Print settings from a TOML file plus command-line overrides.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cr3atdr_gcode::{ExtrusionMode, PrintSettings};
use cr3atdr_slicer::SliceAxis;
use tracing::debug;

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// TOML settings file; missing keys keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Layer height (mm)
    #[arg(long)]
    pub layer_height: Option<f64>,

    /// Nozzle diameter (mm)
    #[arg(long)]
    pub nozzle_diameter: Option<f64>,

    /// Print speed (mm/s)
    #[arg(long)]
    pub print_speed: Option<f64>,

    /// Travel speed (mm/s)
    #[arg(long)]
    pub travel_speed: Option<f64>,

    /// Nozzle temperature (°C)
    #[arg(long)]
    pub nozzle_temp: Option<u32>,

    /// Bed temperature (°C)
    #[arg(long)]
    pub bed_temp: Option<u32>,

    /// Mesh axis used as the slicing height (x, y or z)
    #[arg(long)]
    pub axis: Option<SliceAxis>,

    /// Number of skirt loops (0 disables the skirt)
    #[arg(long)]
    pub skirt_lines: Option<u32>,

    /// Write absolute E values (M82) instead of relative ones
    #[arg(long)]
    pub absolute_e: bool,

    /// Travel without lifting or retracting
    #[arg(long)]
    pub no_z_hop: bool,

    /// Append a statistics comment block
    #[arg(long)]
    pub stats: bool,
}

impl SettingsArgs {
    /// Defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<PrintSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                PrintSettings::from_toml_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => PrintSettings::default(),
        };

        if let Some(v) = self.layer_height {
            settings.layer_height = v;
        }
        if let Some(v) = self.nozzle_diameter {
            settings.nozzle_diameter = v;
        }
        if let Some(v) = self.print_speed {
            settings.print_speed = v;
        }
        if let Some(v) = self.travel_speed {
            settings.travel_speed = v;
        }
        if let Some(v) = self.nozzle_temp {
            settings.nozzle_temp = v;
        }
        if let Some(v) = self.bed_temp {
            settings.bed_temp = v;
        }
        if let Some(v) = self.axis {
            settings.slice_axis = v;
        }
        if let Some(v) = self.skirt_lines {
            settings.skirt_line_count = v;
        }
        if self.absolute_e {
            settings.extrusion_mode = ExtrusionMode::Absolute;
        }
        if self.no_z_hop {
            settings.use_z_hop = false;
        }
        if self.stats {
            settings.include_stats = true;
        }

        settings.validate().context("invalid print settings")?;
        debug!(?settings, "Resolved print settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let settings = SettingsArgs::default().resolve().unwrap();
        assert_eq!(settings, PrintSettings::default());
    }

    #[test]
    fn test_flags_override() {
        let args = SettingsArgs {
            layer_height: Some(0.1),
            axis: Some(SliceAxis::Y),
            no_z_hop: true,
            absolute_e: true,
            ..Default::default()
        };
        let settings = args.resolve().unwrap();
        assert_eq!(settings.layer_height, 0.1);
        assert_eq!(settings.slice_axis, SliceAxis::Y);
        assert!(!settings.use_z_hop);
        assert_eq!(settings.extrusion_mode, ExtrusionMode::Absolute);
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = std::env::temp_dir().join(format!("cr3atdr-cli-{}.toml", std::process::id()));
        fs::write(&path, "layer_height = 0.3\nnozzle_temp = 215\n").unwrap();

        let args = SettingsArgs {
            config: Some(path.clone()),
            nozzle_temp: Some(230),
            ..Default::default()
        };
        let settings = args.resolve().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.layer_height, 0.3);
        assert_eq!(settings.nozzle_temp, 230);
        assert_eq!(settings.print_speed, PrintSettings::default().print_speed);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = SettingsArgs {
            layer_height: Some(0.0),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}
