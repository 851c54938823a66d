//! cr3atdr CLI - slice STL meshes into G-code
//!
//! Loads an STL, slices it along the chosen axis and writes a printer-ready
//! program.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cr3atdr_gcode::{GcodeGenerator, PrintSettings, DEFAULT_FILENAME};
use cr3atdr_slicer::{load_stl, Slicer, TriangleMesh};
use nalgebra::Matrix4;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod settings;

use settings::SettingsArgs;

#[derive(Parser)]
#[command(name = "cr3atdr")]
#[command(about = "Slice STL meshes into FDM G-code", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice an STL file and write G-code
    Slice {
        /// Input STL file (binary or ASCII)
        input: PathBuf,
        /// Output file, `-` for stdout
        #[arg(short, long, default_value = DEFAULT_FILENAME)]
        output: PathBuf,
        /// Uniform scale applied to the mesh before slicing
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Display mesh bounds and the layer count it would slice into
    Info {
        /// Input STL file
        input: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Print the default settings as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Slice {
            input,
            output,
            scale,
            settings,
        } => {
            slice_file(&input, &output, scale, &settings)?;
        }
        Commands::Info {
            input,
            json,
            settings,
        } => {
            show_info(&input, json, &settings)?;
        }
        Commands::Config => {
            print!("{}", PrintSettings::default().to_toml_string()?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let default_filter =
        format!("cr3atdr={level},cr3atdr_slicer={level},cr3atdr_gcode={level}");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_mesh(input: &Path, scale: f64) -> Result<TriangleMesh> {
    let mut mesh = load_stl(input).with_context(|| format!("loading {}", input.display()))?;
    if scale != 1.0 {
        if !(scale.is_finite() && scale > 0.0) {
            anyhow::bail!("scale must be positive, got {scale}");
        }
        mesh.transform(&Matrix4::new_scaling(scale));
    }
    info!(
        path = %input.display(),
        triangles = mesh.triangle_count(),
        "Loaded mesh"
    );
    Ok(mesh)
}

fn slice_file(input: &Path, output: &Path, scale: f64, args: &SettingsArgs) -> Result<()> {
    let settings = args.resolve()?;
    let mesh = load_mesh(input, scale)?;

    let generator = GcodeGenerator::new(settings)?;
    let result = generator
        .generate(&mesh)
        .with_context(|| format!("slicing {}", input.display()))?;

    if output == Path::new("-") {
        io::stdout().lock().write_all(result.gcode.as_bytes())?;
        return Ok(());
    }

    fs::write(output, &result.gcode)
        .with_context(|| format!("writing {}", output.display()))?;

    let stats = &result.stats;
    println!("Wrote {}", output.display());
    println!("  Layers: {}", stats.layer_count);
    println!("  Contours: {}", stats.contour_count);
    println!(
        "  Filament: {:.1} mm ({:.2} g)",
        stats.filament_mm, stats.filament_grams
    );
    println!("  Estimated time: {}", format_duration(stats.print_time_seconds));
    Ok(())
}

#[derive(Serialize)]
struct MeshInfo {
    path: String,
    triangles: usize,
    vertices: usize,
    bounds_min: Option<[f64; 3]>,
    bounds_max: Option<[f64; 3]>,
    size: Option<[f64; 3]>,
    layer_height: f64,
    layers: usize,
}

fn mesh_info(input: &Path, mesh: &TriangleMesh, settings: &PrintSettings) -> Result<MeshInfo> {
    let bounds = mesh.bounds();
    let slicer = Slicer::new(settings.layer_height, settings.slice_axis)?;
    let layers = slicer.slice(mesh)?;

    Ok(MeshInfo {
        path: input.display().to_string(),
        triangles: mesh.triangle_count(),
        vertices: mesh.vertex_count(),
        bounds_min: bounds.map(|b| [b.min.x, b.min.y, b.min.z]),
        bounds_max: bounds.map(|b| [b.max.x, b.max.y, b.max.z]),
        size: bounds.map(|b| b.size()),
        layer_height: settings.layer_height,
        layers: layers.len(),
    })
}

fn show_info(input: &Path, json: bool, args: &SettingsArgs) -> Result<()> {
    let settings = args.resolve()?;
    let mesh = load_mesh(input, 1.0)?;
    let info = mesh_info(input, &mesh, &settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("STL mesh: {}", info.path);
    println!("  Triangles: {}", info.triangles);
    println!("  Vertices: {}", info.vertices);
    if let (Some(min), Some(max), Some(size)) = (info.bounds_min, info.bounds_max, info.size) {
        println!(
            "  Bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            min[0], min[1], min[2], max[0], max[1], max[2]
        );
        println!("  Size: {:.3} x {:.3} x {:.3}", size[0], size[1], size[2]);
    }
    println!(
        "  Layers at {} mm along {:?}: {}",
        info.layer_height, settings.slice_axis, info.layers
    );
    Ok(())
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else {
        format!("{m}m {s:02}s")
    }
}
