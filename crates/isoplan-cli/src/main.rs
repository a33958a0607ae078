use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use isoplan_algo::{Camera, Scene, SceneConfig};
use isoplan_core::geom::Vec2;
use isoplan_core::model::{FloorPlan, RenderMode};
use isoplan_core::normalize::{normalize_in_place, NormalizeConfig, NormalizeStats};
use isoplan_core::report::{PlanReport, Warning};
use isoplan_import_svg::{import_svg, ImportConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "isoplan")]
#[command(about = "Isometric rendering of 2D floor plans with painter's-algorithm wall ordering.")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one frame and emit its draw list as JSON.
    Render {
        input: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
        #[arg(long, default_value_t = -90.0, allow_negative_numbers = true)]
        rotation: f64,
        #[arg(long, default_value_t = 33.75)]
        tilt: f64,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        #[arg(long, default_value_t = 0.25)]
        height: f64,
        /// Skip wall ordering and outline extrusion.
        #[arg(long)]
        fast: bool,
        #[arg(long, default_value_t = 100.0)]
        wall_height: f64,
        #[arg(long, default_value_t = 1000.0)]
        canvas_width: f64,
        #[arg(long, default_value_t = 800.0)]
        canvas_height: f64,
        /// Disable the y-range shortcut in the pairwise ordering test.
        #[arg(long)]
        no_y_shortcut: bool,
        #[arg(long, default_value_t = 1.25)]
        px_per_unit: f64,
    },
    /// Summarize an imported plan.
    Inspect {
        input: PathBuf,
        #[arg(long)]
        dump_plan: Option<PathBuf>,
        #[arg(long, default_value_t = 1.25)]
        px_per_unit: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render {
            input,
            report,
            rotation,
            tilt,
            scale,
            height,
            fast,
            wall_height,
            canvas_width,
            canvas_height,
            no_y_shortcut,
            px_per_unit,
        } => {
            let scene_cfg = SceneConfig {
                canvas: Vec2::new(canvas_width, canvas_height),
                wall_height,
                y_range_shortcut: !no_y_shortcut,
                ..SceneConfig::default()
            };
            let camera = Camera {
                rotation_deg: rotation,
                tilt_deg: tilt,
                scale,
                height,
                mode: if fast {
                    RenderMode::Fast
                } else {
                    RenderMode::Quality
                },
            };
            render(&input, report.as_deref(), px_per_unit, scene_cfg, camera)
        }
        Command::Inspect {
            input,
            dump_plan,
            px_per_unit,
        } => inspect(&input, dump_plan.as_deref(), px_per_unit),
    }
}

fn load_plan(input: &Path, px_per_unit: f64) -> Result<(FloorPlan, NormalizeStats)> {
    ensure_input_file(input)?;

    let ext = input
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "svg" {
        bail!("Unsupported input extension: .{ext}");
    }
    if !(px_per_unit.is_finite() && px_per_unit > 0.0) {
        bail!("--px-per-unit must be a positive number, got {px_per_unit}");
    }

    let cfg = ImportConfig {
        px_per_unit,
        ..ImportConfig::default()
    };
    let mut plan = import_svg(input, &cfg)?;
    let stats = normalize_in_place(&mut plan, &NormalizeConfig::default());
    Ok((plan, stats))
}

fn render(
    input: &Path,
    report: Option<&Path>,
    px_per_unit: f64,
    scene_cfg: SceneConfig,
    camera: Camera,
) -> Result<()> {
    let (plan, _) = load_plan(input, px_per_unit)?;
    let mut scene = Scene::from_plan(&plan, scene_cfg).context("lay out scene")?;
    let summary = scene.summary();
    tracing::info!(
        surfaces = summary.surfaces,
        doors = summary.doors,
        door_links = summary.door_links,
        rooms = summary.rooms,
        "scene ready"
    );

    let frame = scene.render_frame(&camera).context("render frame")?;
    let json = serde_json::to_string_pretty(&frame.to_report()).context("serialize frame")?;
    emit(report, &json, "frame report")
}

fn inspect(input: &Path, dump_plan: Option<&Path>, px_per_unit: f64) -> Result<()> {
    let (plan, normalize) = load_plan(input, px_per_unit)?;

    if let Some(path) = dump_plan {
        let json = serde_json::to_string_pretty(&plan).context("serialize plan")?;
        write_file(path, &json, "plan")?;
    }

    let mut warnings = Vec::new();
    if plan.outline.is_none() {
        warnings.push(Warning::new("missing_outline", "plan has no outline"));
    }
    if plan.rooms.is_empty() {
        warnings.push(Warning::new("no_rooms", "plan has no rooms"));
    }

    let report = PlanReport {
        input_format: "svg".to_string(),
        rooms: plan.rooms.len(),
        door_markers: plan.door_markers.len(),
        outline_points: plan.outline.as_ref().map_or(0, Vec::len),
        wall_segments: plan
            .wall_rings()
            .iter()
            .map(|(_, ring)| ring.len().saturating_sub(1))
            .sum(),
        extents: plan.extents(),
        normalize,
        warnings,
    };
    let json = serde_json::to_string_pretty(&report).context("serialize plan report")?;
    println!("{json}");
    Ok(())
}

fn emit(path: Option<&Path>, json: &str, what: &str) -> Result<()> {
    match path {
        Some(path) => write_file(path, json, what),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn write_file(path: &Path, contents: &str, what: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    std::fs::write(path, contents).with_context(|| format!("write {what}: {path:?}"))
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}
