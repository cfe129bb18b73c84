use clap::Parser;
use heat_sim_core::domain::{reference_polygon, Carpet, EscapeTime};
use heat_sim_core::{
    BoundaryCondition, FieldRepresentation, FrameReport, GridPreset, HeatSimulation, Shape,
    SimulationConfig,
};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Heat equation animation without a renderer
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "heat-headless")]
#[command(about = "Runs the masked heat-equation pipeline and reports per-frame statistics", long_about = None)]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid preset (ultra, high, medium, low)
    #[arg(short, long)]
    preset: Option<String>,

    /// Number of frames to produce
    #[arg(short, long)]
    frames: Option<u64>,

    /// Stencil steps per frame
    #[arg(short, long)]
    substeps: Option<u32>,

    /// Domain shape (julia, julia-interior, mandelbrot, mandelbrot-circle, rectangle,
    /// ellipse, stadium, sinai, diamond, polygon, annulus, annulus-heated, menger, menger-heated)
    #[arg(long)]
    shape: Option<String>,

    /// Boundary condition (dirichlet, periodic, absorbing)
    #[arg(short, long)]
    boundary: Option<String>,

    /// Skip field-line tracing
    #[arg(long)]
    no_field_lines: bool,

    /// Renormalise the field by its variance every frame
    #[arg(short, long)]
    adaptive_scaling: bool,

    /// Colour the gradient norm instead of the field
    #[arg(long)]
    gradient_norm: bool,

    /// Print one JSON object per frame instead of a table
    #[arg(long)]
    json: bool,

    /// Report every n-th frame
    #[arg(short, long, default_value_t = 10)]
    report_interval: u64,
}

fn parse_preset(name: &str) -> Result<GridPreset, String> {
    match name.to_lowercase().as_str() {
        "ultra" => Ok(GridPreset::Ultra),
        "high" => Ok(GridPreset::High),
        "medium" => Ok(GridPreset::Medium),
        "low" => Ok(GridPreset::Low),
        other => Err(format!("unknown grid preset '{other}'")),
    }
}

fn parse_boundary(name: &str) -> Result<BoundaryCondition, String> {
    match name.to_lowercase().as_str() {
        "dirichlet" => Ok(BoundaryCondition::Dirichlet),
        "periodic" => Ok(BoundaryCondition::Periodic),
        "absorbing" => Ok(BoundaryCondition::Absorbing),
        other => Err(format!("unknown boundary condition '{other}'")),
    }
}

/// Shapes of the catalogue with their reference parameters
fn parse_shape(name: &str) -> Result<Shape, String> {
    let shape = match name.to_lowercase().as_str() {
        "julia" => Shape::default(),
        "julia-interior" => Shape::JuliaInterior {
            escape: EscapeTime::julia_default(),
        },
        "mandelbrot" => Shape::Mandelbrot {
            escape: EscapeTime::default(),
        },
        "mandelbrot-circle" => Shape::MandelbrotCircle {
            escape: EscapeTime::default(),
            radius: 1.0,
        },
        "rectangle" => Shape::Rectangle {
            half_width: 1.5,
            half_height: 0.8,
        },
        "ellipse" => Shape::Ellipse {
            semi_x: 1.8,
            semi_y: 1.0,
        },
        "stadium" => Shape::Stadium {
            half_length: 0.8,
            radius: 0.8,
        },
        "sinai" => Shape::Sinai { radius: 0.5 },
        "diamond" => Shape::Diamond { half_diagonal: 1.0 },
        "polygon" => reference_polygon(),
        "annulus" => Shape::Annulus {
            outer_radius: 1.0,
            inner_radius: 0.3,
            inner_offset: 0.2,
        },
        "annulus-heated" => Shape::AnnulusHeated {
            outer_radius: 1.0,
            inner_radius: 0.3,
            inner_offset: 0.2,
        },
        "menger" => Shape::Menger {
            carpet: Carpet::default(),
        },
        "menger-heated" => Shape::MengerHeated {
            carpet: Carpet::default(),
            open: false,
        },
        other => return Err(format!("unknown shape '{other}'")),
    };
    Ok(shape)
}

fn build_config(args: &Args) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            info!("Loaded configuration from {}", path.display());
            serde_json::from_str(&text)?
        }
        None => SimulationConfig::from_preset(GridPreset::recommended()),
    };

    if let Some(name) = &args.preset {
        config.grid = parse_preset(name)?.geometry();
    }
    if let Some(frames) = args.frames {
        config.frames.frames = frames;
    }
    if let Some(substeps) = args.substeps {
        config.frames.substeps = substeps;
    }
    if let Some(name) = &args.shape {
        config.shape = parse_shape(name)?;
    }
    if let Some(name) = &args.boundary {
        config.boundary = parse_boundary(name)?;
    }
    if args.no_field_lines {
        config.field_lines = None;
    }
    if args.adaptive_scaling {
        config.display.adaptive_scaling = true;
    }
    if args.gradient_norm {
        config.display.representation = FieldRepresentation::GradientNorm;
    }
    Ok(config)
}

fn print_row(report: &FrameReport) {
    println!(
        "{:6} | {:>9.5} {:>9.5} | {:12.5e} | {:7.4} | {:5} | {:8} | {:8.1}",
        report.frame,
        report.julia[0],
        report.julia[1],
        report.variance,
        report.display_scale,
        report.field_lines,
        report.reclassified_cells,
        report.elapsed_ms
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let frames = config.frames.frames;
    let interval = args.report_interval.max(1);

    let mut sim = HeatSimulation::new(config)?;

    if !args.json {
        println!("=== Heat Equation Demo ===\n");
        println!(
            "Grid: {}x{}, shape: {}, boundary: {:?}",
            sim.geometry().nx(),
            sim.geometry().ny(),
            sim.config().shape.name(),
            sim.config().boundary
        );
        let ((x_min, x_max), (y_min, y_max)) = sim.geometry().window();
        println!("Window: [{x_min}, {x_max}] x [{y_min}, {y_max}]");
        println!(
            "Lattice step: {:.5} (stability number {:.4})\n",
            sim.diffusion_params().rate_x,
            sim.diffusion_params().stability_number()
        );
        println!(" Frame |     cx        cy    |   Variance   |  Scale  | Lines | Changed  |   ms");
        println!("-------|---------------------|--------------|---------|-------|----------|---------");
    }

    let mut next_report = 0;
    for _ in 0..frames {
        let report = sim.advance_frame();
        if report.frame < next_report && report.frame + 1 != frames {
            continue;
        }
        next_report = report.frame + interval;
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_row(&report);
        }
    }

    if !args.json {
        println!("\n=== Simulation Complete ===");
        println!("Frames: {}", sim.timer().frames());
        println!("Mean frame time: {:.2} ms", sim.timer().mean_frame_time_ms());
        println!("Final variance: {:.5e}", sim.variance());
    }
    Ok(())
}
