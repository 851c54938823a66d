//! Program text - fixed start and end sequences around the command stream.

use crate::command::Command;
use crate::settings::{ExtrusionMode, PrintSettings};
use crate::stats::PrintStats;

/// Heat, home and prime sequence.
pub fn preamble(settings: &PrintSettings) -> String {
    let extrusion_mode = match settings.extrusion_mode {
        ExtrusionMode::Relative => "M83 ; Relative extrusion",
        ExtrusionMode::Absolute => "M82 ; Absolute extrusion",
    };
    format!(
        "; Generated by cr3atdr {version}\n\
         M140 S{bed} ; Set bed temperature\n\
         M105 ; Report temperatures\n\
         M190 S{bed} ; Wait for bed temperature\n\
         M104 S{nozzle} ; Set nozzle temperature\n\
         M105 ; Report temperatures\n\
         M109 S{nozzle} ; Wait for nozzle temperature\n\
         {extrusion_mode}\n\
         G90 ; Absolute positioning\n\
         G28 ; Home all axes\n\
         G1 Z5 F3000 ; Lift Z\n\
         G21 ; Set units to millimeters\n\
         G92 E0 ; Reset extrusion distance\n\
         M107 ; Fan off\n",
        version = env!("CARGO_PKG_VERSION"),
        bed = settings.bed_temp,
        nozzle = settings.nozzle_temp,
    )
}

/// Retract, wipe, present the part and shut everything down.
pub fn postamble() -> &'static str {
    "; End GCode\n\
     G91 ; Relative positioning\n\
     G1 E-2 F2700 ; Retract a bit\n\
     G1 E-2 Z0.2 F2400 ; Retract and raise Z\n\
     G1 X5 Y5 F3000 ; Wipe out\n\
     G1 Z10 ; Raise Z more\n\
     G90 ; Absolute positioning\n\
     G1 X0 Y220 ; Present print\n\
     M106 S0 ; Turn-off fan\n\
     M104 S0 ; Turn-off hotend\n\
     M140 S0 ; Turn-off bed\n\
     M84 X Y E ; Disable all steppers but Z\n"
}

/// Serialize a full program: preamble, one line per command, optional stats, postamble.
pub fn emit_program(
    settings: &PrintSettings,
    commands: &[Command],
    stats: Option<&PrintStats>,
) -> String {
    let mut out = preamble(settings);
    out.reserve(commands.len() * 40 + 512);
    for command in commands {
        out.push_str(&command.to_string());
        out.push('\n');
    }
    if let Some(stats) = stats {
        for line in stats.comment_lines() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push_str(postamble());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_uses_settings() {
        let settings = PrintSettings {
            bed_temp: 70,
            nozzle_temp: 215,
            ..Default::default()
        };
        let text = preamble(&settings);
        assert!(text.contains("M190 S70"));
        assert!(text.contains("M109 S215"));
        assert!(text.contains("M83"));
        assert!(text.contains("G28"));
        assert!(text.lines().last().unwrap().starts_with("M107"));

        let absolute = PrintSettings {
            extrusion_mode: ExtrusionMode::Absolute,
            ..Default::default()
        };
        assert!(preamble(&absolute).contains("M82"));
        assert!(!preamble(&absolute).contains("M83"));
    }

    #[test]
    fn test_empty_program() {
        let settings = PrintSettings::default();
        let text = emit_program(&settings, &[], None);
        assert_eq!(text, format!("{}{}", preamble(&settings), postamble()));
    }

    #[test]
    fn test_every_line_is_command_or_comment() {
        let settings = PrintSettings::default();
        let commands = vec![Command::Comment("Layer 0".into()), Command::FanOn(255)];
        let text = emit_program(&settings, &commands, Some(&PrintStats::default()));
        for line in text.lines() {
            let first = line.chars().next().unwrap();
            assert!(matches!(first, ';' | 'G' | 'M'), "unexpected line {line:?}");
        }
        assert!(text.contains("; Layer 0\nM106 S255\n; Stats\n"));
    }
}
