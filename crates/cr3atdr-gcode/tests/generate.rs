//! Full mesh to G-code runs.

use approx::assert_relative_eq;
use cr3atdr_gcode::{
    calculate_extrusion, generate_gcode, postamble, preamble, ExtrusionMode, GcodeError,
    GcodeGenerator, PrintSettings,
};
use cr3atdr_slicer::{box_mesh, Point3, SliceAxis, TriangleMesh};

fn cube_settings() -> PrintSettings {
    PrintSettings {
        layer_height: 0.5,
        ..Default::default()
    }
}

fn cube() -> TriangleMesh {
    box_mesh(Point3::origin(), Point3::new(2.0, 2.0, 2.0))
}

fn print_lines(gcode: &str) -> Vec<&str> {
    gcode
        .lines()
        .filter(|l| l.starts_with("G1 X") && l.contains(" E"))
        .collect()
}

#[test]
fn empty_mesh_yields_preamble_and_postamble_only() {
    let settings = PrintSettings::default();
    let generator = GcodeGenerator::new(settings.clone()).unwrap();
    let output = generator.generate(&TriangleMesh::new()).unwrap();

    assert!(output.layers.is_empty());
    assert_eq!(output.stats.layer_count, 0);
    assert_eq!(output.gcode, format!("{}{}", preamble(&settings), postamble()));
}

#[test]
fn cube_program_structure() {
    let output = GcodeGenerator::new(cube_settings())
        .unwrap()
        .generate(&cube())
        .unwrap();

    assert_eq!(output.layers.len(), 4);
    for layer in &output.layers {
        assert_eq!(layer.contours.len(), 1);
        assert_eq!(layer.contours[0].len(), 4);
    }

    let gcode = &output.gcode;
    assert!(gcode.starts_with("; Generated by cr3atdr"));
    assert!(gcode.ends_with("M84 X Y E ; Disable all steppers but Z\n"));
    assert!(gcode.contains("; Skirt\n"));
    assert!(gcode.contains("; Layer 3\n"));
    assert!(!gcode.contains("; Layer 4\n"));

    // Skirt: 2 loops of 5 moves. Layers: 4 corners each, closing move included.
    assert_eq!(print_lines(gcode).len(), 10 + 4 * 4);

    // Fan comes on at the start of the second layer.
    let layer1 = gcode.find("; Layer 1\n").unwrap();
    assert!(gcode[layer1..].starts_with("; Layer 1\nM106 S255\n; Contour 0\n"));
    assert_eq!(gcode.matches("M106 S255").count(), 1);
}

#[test]
fn cube_extrusion_matches_path_length() {
    let settings = cube_settings();
    let output = GcodeGenerator::new(settings.clone())
        .unwrap()
        .generate(&cube())
        .unwrap();

    // Skirt loops are 10 x 10 and 10.8 x 10.8, each layer a 2 x 2 square.
    let path = 40.0 + 43.2 + 4.0 * 8.0;
    let expected = calculate_extrusion(path, settings.layer_height, settings.nozzle_diameter);
    assert_relative_eq!(output.stats.filament_mm, expected, epsilon = 1e-6);
    assert_relative_eq!(output.stats.print_distance_mm, path, epsilon = 1e-6);
    assert!(output.stats.print_time_seconds > 0.0);
}

#[test]
fn coordinates_and_extrusion_are_fixed_precision() {
    let gcode = generate_gcode(&cube(), cube_settings()).unwrap();
    for line in print_lines(&gcode) {
        for token in line.split_whitespace().skip(1) {
            let (axis, value) = token.split_at(1);
            let decimals = value.split('.').nth(1).map_or(0, str::len);
            match axis {
                "X" | "Y" | "Z" => assert_eq!(decimals, 3, "{line}"),
                "E" => assert_eq!(decimals, 4, "{line}"),
                "F" => assert_eq!(decimals, 0, "{line}"),
                other => panic!("unexpected axis {other} in {line}"),
            }
        }
    }
}

#[test]
fn z_hop_brackets_every_travel() {
    let gcode = generate_gcode(&cube(), cube_settings()).unwrap();
    let lines: Vec<&str> = gcode.lines().collect();
    let travels: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("G1 X") && l.ends_with("F7200"))
        .map(|(i, _)| i)
        .collect();

    // 2 skirt loops + 4 contours.
    assert_eq!(travels.len(), 6);
    for &i in &travels {
        assert!(lines[i - 1].starts_with("G1 Z"), "{}", lines[i - 1]);
        assert!(lines[i + 1].starts_with("G1 Z"), "{}", lines[i + 1]);
    }

    let mut retracted = false;
    for line in &lines {
        if line.starts_with("G1 E-5.0000") {
            assert!(!retracted, "double retraction");
            retracted = true;
        } else if line.starts_with("G1 E5.0000") {
            assert!(retracted);
            retracted = false;
        }
    }
    assert!(!retracted);
}

#[test]
fn without_z_hop_there_is_no_retraction() {
    let settings = PrintSettings {
        use_z_hop: false,
        ..cube_settings()
    };
    let gcode = generate_gcode(&cube(), settings).unwrap();
    let body = &gcode[gcode.find("; Skirt").unwrap()..gcode.find("; End GCode").unwrap()];
    assert!(!body.lines().any(|l| l.starts_with("G1 E") || l.starts_with("G1 Z")));
    assert!(gcode.contains("G1 X-4.000 Y-4.000 Z0.300 F7200"));
}

#[test]
fn absolute_extrusion_is_monotonic_while_printing() {
    let settings = PrintSettings {
        extrusion_mode: ExtrusionMode::Absolute,
        ..cube_settings()
    };
    let gcode = generate_gcode(&cube(), settings).unwrap();
    assert!(gcode.contains("M82 ; Absolute extrusion"));

    let mut last = 0.0f64;
    for line in print_lines(&gcode) {
        let e: f64 = line
            .split_whitespace()
            .find_map(|t| t.strip_prefix('E'))
            .unwrap()
            .parse()
            .unwrap();
        assert!(e >= last - 1e-4, "{line}");
        last = e;
    }
}

#[test]
fn repeated_runs_are_identical() {
    let generator = GcodeGenerator::new(cube_settings()).unwrap();
    let first = generator.generate(&cube()).unwrap();
    let second = generator.generate(&cube()).unwrap();
    assert_eq!(first.gcode, second.gcode);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn slicing_along_y_uses_xz_frame() {
    let settings = PrintSettings {
        slice_axis: SliceAxis::Y,
        layer_height: 1.0,
        skirt_line_count: 1,
        include_stats: true,
        ..Default::default()
    };
    let mesh = box_mesh(Point3::origin(), Point3::new(6.0, 3.0, 4.0));
    let output = GcodeGenerator::new(settings).unwrap().generate(&mesh).unwrap();

    assert_eq!(output.layers.len(), 3);
    // Skirt around the x/z footprint 6 x 4.
    assert!(output.gcode.contains("G1 X10.000 Y-4.000 Z0.300"));
    assert!(output.gcode.contains("G1 X10.000 Y8.000 Z0.300"));
    assert!(output.gcode.contains("; Stats\n; layers: 3\n"));
}

#[test]
fn supports_request_is_accepted() {
    let settings = PrintSettings {
        generate_supports: true,
        ..cube_settings()
    };
    let with = generate_gcode(&cube(), settings).unwrap();
    let without = generate_gcode(&cube(), cube_settings()).unwrap();
    assert_eq!(with, without);
}

#[test]
fn invalid_settings_are_rejected() {
    let settings = PrintSettings {
        nozzle_diameter: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        GcodeGenerator::new(settings),
        Err(GcodeError::InvalidSettings(_))
    ));
}

#[test]
fn malformed_mesh_is_an_error() {
    let mesh = TriangleMesh {
        vertices: vec![0.0; 9],
        indices: Some(vec![0, 1, 7]),
    };
    assert!(matches!(
        generate_gcode(&mesh, PrintSettings::default()),
        Err(GcodeError::Slice(_))
    ));
}
