use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::DVec2;
use std::path::PathBuf;

use fieldscope_core::{
    read_npy, AxisSystem, CameraPose, CanvasSize, Domain, FractalField, FrameResolver, FrameView,
    GridLayout, GridShape, ScalarField,
};
use fieldscope_render::{render_frame, save_png, HeatmapStyle};

#[derive(Parser)]
#[command(name = "fieldscope")]
#[command(about = "Fieldscope - pan/zoomable heatmap views of large scalar fields")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the viewport for a camera pose to a PNG image
    Snapshot {
        #[command(flatten)]
        view: ViewArgs,

        /// Output PNG file
        #[arg(short, long)]
        out: PathBuf,

        /// Colormap (viridis, inferno, gray)
        #[arg(long, default_value = "viridis")]
        colormap: String,

        /// Color scale (linear, log)
        #[arg(long, default_value = "linear")]
        scale: String,

        /// Invert the colormap
        #[arg(long)]
        invert: bool,
    },

    /// Print the resolved visible extent and index window for a camera pose
    Probe {
        #[command(flatten)]
        view: ViewArgs,

        /// Emit the resolved frame as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Data source: "random", "fractal", or a path to a 2D .npy file
    #[arg(short, long, default_value = "random")]
    source: String,

    /// Grid rows for synthetic sources
    #[arg(long, default_value = "2048")]
    rows: usize,

    /// Grid columns for synthetic sources
    #[arg(long, default_value = "2048")]
    cols: usize,

    /// Seed for the random source
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Iteration budget for the fractal source
    #[arg(long, default_value = "100")]
    max_iterations: u32,

    /// Canvas width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Camera zoom factor
    #[arg(short, long, default_value = "1.0")]
    zoom: f64,

    /// Camera x position in world units
    #[arg(long, default_value = "0.0")]
    center_x: f64,

    /// Camera y position in world units
    #[arg(long, default_value = "0.0")]
    center_y: f64,

    /// Flip the ordinate axis
    #[arg(long)]
    flip_y: bool,

    /// JSON file with a camera pose, overriding --zoom/--center-*
    #[arg(long)]
    pose_file: Option<PathBuf>,
}

/// A loaded or procedural data source plus its declared layout.
enum FieldSource {
    Stored(ScalarField),
    Procedural(FractalField),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Snapshot {
            view,
            out,
            colormap,
            scale,
            invert,
        } => cmd_snapshot(view, out, colormap, scale, invert),
        Commands::Probe { view, json } => cmd_probe(view, json),
    }
}

fn cmd_snapshot(
    args: ViewArgs,
    out: PathBuf,
    colormap: String,
    scale: String,
    invert: bool,
) -> Result<()> {
    let style = HeatmapStyle {
        color_map: colormap.parse().map_err(|e: String| anyhow!(e))?,
        scale_type: parse_scale(&scale)?,
        invert_color_map: invert,
        ..Default::default()
    };

    let (source, layout) = load_source(&args)?;
    let canvas = CanvasSize::new(args.width, args.height);
    let pose = camera_pose(&args)?;
    let mut resolver = resolver_for(&layout, canvas, args.flip_y);

    let view = resolver.frame(&pose, canvas);
    let image = match &view {
        None => {
            log::info!("viewport has no intersection with the dataset; rendering background");
            render_frame(&pose, canvas, None, None, Domain::new(0.0, 1.0), &style)
        }
        Some(view) => {
            let (window, value_domain) = materialize(&source, view);
            log::info!(
                "lod {} window {}x{} covering x=[{:.4}, {:.4}] y=[{:.4}, {:.4}]",
                view.slice.level_of_detail,
                window.rows,
                window.cols,
                view.slice.x_data.min,
                view.slice.x_data.max,
                view.slice.y_data.min,
                view.slice.y_data.max,
            );
            render_frame(&pose, canvas, Some(view), Some(&window), value_domain, &style)
        }
    };

    save_png(&image, &out)?;
    log::info!("Wrote {}", out.display());
    Ok(())
}

fn cmd_probe(args: ViewArgs, json: bool) -> Result<()> {
    let (_, layout) = load_source(&args)?;
    let canvas = CanvasSize::new(args.width, args.height);
    let pose = camera_pose(&args)?;
    let mut resolver = resolver_for(&layout, canvas, args.flip_y);

    match resolver.frame(&pose, canvas) {
        None => {
            if json {
                println!("null");
            } else {
                println!("nothing visible");
            }
        }
        Some(view) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view);
            }
        }
    }
    Ok(())
}

fn print_view(view: &FrameView) {
    println!(
        "visible x: [{:.6}, {:.6}]  y: [{:.6}, {:.6}]",
        view.extent.x_domain.min,
        view.extent.x_domain.max,
        view.extent.y_domain.min,
        view.extent.y_domain.max,
    );
    println!("level of detail: {}", view.slice.level_of_detail);
    println!(
        "raw slice x: [{}, {})  y: [{}, {})",
        view.slice.x_slice.begin, view.slice.x_slice.end, view.slice.y_slice.begin,
        view.slice.y_slice.end,
    );
    println!(
        "lod slice x: [{}, {})  y: [{}, {})",
        view.slice.x_lod_slice.begin, view.slice.x_lod_slice.end,
        view.slice.y_lod_slice.begin, view.slice.y_lod_slice.end,
    );
    println!(
        "quad at ({:.2}, {:.2}) size {:.2}x{:.2} flip_y={}",
        view.quad.position[0],
        view.quad.position[1],
        view.quad.width(),
        view.quad.height(),
        view.quad.flip_y,
    );
}

fn load_source(args: &ViewArgs) -> Result<(FieldSource, GridLayout)> {
    match args.source.as_str() {
        "random" => {
            let shape = GridShape::new(args.rows, args.cols);
            log::info!("generating random {}x{} field, seed {}", args.rows, args.cols, args.seed);
            let field = ScalarField::random(shape, args.seed);
            let layout = GridLayout::index_aligned(shape);
            Ok((FieldSource::Stored(field), layout))
        }
        "fractal" => {
            let (x_domain, y_domain) = FractalField::canonical_domains();
            let shape = GridShape::new(args.rows, args.cols);
            let layout = GridLayout::new(x_domain, y_domain, shape);
            Ok((
                FieldSource::Procedural(FractalField::new(args.max_iterations)),
                layout,
            ))
        }
        path => {
            log::info!("loading {path}");
            let field = read_npy(std::path::Path::new(path))?;
            let layout = GridLayout::index_aligned(field.shape());
            log::info!(
                "loaded {}x{} field",
                field.shape().rows,
                field.shape().cols
            );
            Ok((FieldSource::Stored(field), layout))
        }
    }
}

/// Fetch or compute exactly the samples the resolved window names.
fn materialize(
    source: &FieldSource,
    view: &FrameView,
) -> (fieldscope_core::FieldWindow, Domain) {
    match source {
        FieldSource::Stored(field) => (field.window(&view.slice), field.value_domain()),
        FieldSource::Procedural(fractal) => {
            let shape = GridShape::new(
                view.slice.x_lod_slice.len().max(1),
                view.slice.y_lod_slice.len().max(1),
            );
            let window = fractal.sample(&view.slice.x_data, &view.slice.y_data, shape);
            // Escape values are already normalized.
            (window, Domain::new(0.0, 1.0))
        }
    }
}

fn resolver_for(layout: &GridLayout, canvas: CanvasSize, flip_y: bool) -> FrameResolver {
    let axes = AxisSystem::fitting_canvas(
        layout.x_domain,
        layout.y_domain,
        canvas.width,
        canvas.height,
        flip_y,
    );
    FrameResolver::new(*layout, axes)
}

fn camera_pose(args: &ViewArgs) -> Result<CameraPose> {
    if let Some(path) = &args.pose_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading pose file {}", path.display()))?;
        let pose: CameraPose = serde_json::from_str(&text)
            .with_context(|| format!("parsing pose file {}", path.display()))?;
        return Ok(pose);
    }
    if !(args.zoom.is_finite() && args.zoom > 0.0) {
        return Err(anyhow!("--zoom must be a positive number, got {}", args.zoom));
    }
    Ok(CameraPose::new(
        DVec2::new(args.center_x, args.center_y),
        args.zoom,
    ))
}

fn parse_scale(s: &str) -> Result<fieldscope_render::ScaleType> {
    match s.to_ascii_lowercase().as_str() {
        "linear" => Ok(fieldscope_render::ScaleType::Linear),
        "log" => Ok(fieldscope_render::ScaleType::Log),
        other => Err(anyhow!("unknown scale '{other}', expected linear or log")),
    }
}
