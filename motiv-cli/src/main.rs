use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use motiv_core::{ChaosGame, NewtonBasinSolver, NewtonParams, Point, Triangle};
use motiv_render::{
    colorize_basins, colorize_convergence, export_png, rasterize_scatter, BasinPalette,
    ExportMetadata,
};

#[derive(Parser)]
#[command(name = "motiv", version, about = "Generative-art motive renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the chaos game and save the Sierpinski scatter as a PNG.
    Sierpinski(SierpinskiArgs),
    /// Compute Newton basins of attraction and save them as PNGs.
    Newton(NewtonArgs),
}

#[derive(Args)]
struct SierpinskiArgs {
    /// Triangle corners as six numbers: x1 y1 x2 y2 x3 y3.
    #[arg(long, num_args = 6, value_names = ["X1", "Y1", "X2", "Y2", "X3", "Y3"],
          allow_negative_numbers = true,
          default_values_t = [1.0, 1.0, 2.0, 1.732_050_807_568_877_2, 3.0, 1.0])]
    corners: Vec<f64>,

    /// Number of chaos-game steps.
    #[arg(long, short = 'n', default_value_t = 1_000_000)]
    iterations: usize,

    /// RNG seed; omit for a fresh image every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Output image is size × size pixels.
    #[arg(long, default_value_t = 1024)]
    size: u32,

    /// Output file.
    #[arg(long, short = 'o', default_value = "sierpinski.png")]
    output: PathBuf,
}

#[derive(Args)]
struct NewtonArgs {
    /// Degree of the polynomial z^d - 1.
    #[arg(long, short = 'd', default_value_t = 4)]
    degree: u32,

    /// Real-axis bounds: min max.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"],
          allow_negative_numbers = true, default_values_t = [-2.0, 2.0])]
    x_bounds: Vec<f64>,

    /// Imaginary-axis bounds: min max.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"],
          allow_negative_numbers = true, default_values_t = [-2.0, 2.0])]
    y_bounds: Vec<f64>,

    /// Samples per axis; the image is resolution × resolution pixels.
    #[arg(long, short = 'r', default_value_t = 1000)]
    resolution: u32,

    /// Maximum Newton sweeps.
    #[arg(long, default_value_t = 50)]
    max_iter: u32,

    /// Convergence tolerance.
    #[arg(long, default_value_t = 1e-6)]
    tolerance: f64,

    /// Use the grayscale palette instead of the spectrum one.
    #[arg(long)]
    grayscale: bool,

    /// Output file for the basin image.
    #[arg(long, short = 'o', default_value = "basins.png")]
    output: PathBuf,

    /// Also write the convergence-rate image to this file.
    #[arg(long)]
    convergence_rate: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Sierpinski(args) => run_sierpinski(args),
        Command::Newton(args) => run_newton(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_sierpinski(args: SierpinskiArgs) -> Result<(), Box<dyn std::error::Error>> {
    let c = &args.corners;
    let triangle = Triangle::new(
        Point::new(c[0], c[1])?,
        Point::new(c[2], c[3])?,
        Point::new(c[4], c[5])?,
    );

    let mut game = match args.seed {
        Some(seed) => ChaosGame::seeded(triangle, seed),
        None => ChaosGame::from_entropy(triangle),
    };
    game.run(args.iterations)?;
    info!(points = game.points().len(), "chaos game finished");

    let image = rasterize_scatter(game.points(), triangle.bounding_box(), args.size)?;
    let corners = [
        triangle.corner(0).coordinates(),
        triangle.corner(1).coordinates(),
        triangle.corner(2).coordinates(),
    ];
    export_png(
        &image,
        &args.output,
        &ExportMetadata::ChaosGame {
            corners,
            iterations: args.iterations,
            seed: args.seed,
        },
    )?;
    info!(path = %args.output.display(), "wrote scatter image");
    Ok(())
}

fn run_newton(args: NewtonArgs) -> Result<(), Box<dyn std::error::Error>> {
    let params = NewtonParams::new(
        args.degree,
        (args.x_bounds[0], args.x_bounds[1]),
        (args.y_bounds[0], args.y_bounds[1]),
        args.resolution,
        args.max_iter,
        args.tolerance,
    )?;
    let mut solver = NewtonBasinSolver::new(params)?;
    solver.compute();

    let palette = if args.grayscale {
        BasinPalette::grayscale(args.degree as usize)
    } else {
        BasinPalette::spectrum(args.degree as usize)
    };

    let metadata = |layer: &'static str| ExportMetadata::NewtonBasins {
        degree: args.degree,
        x_bounds: (args.x_bounds[0], args.x_bounds[1]),
        y_bounds: (args.y_bounds[0], args.y_bounds[1]),
        resolution: args.resolution,
        max_iterations: args.max_iter,
        tolerance: args.tolerance,
        layer,
    };

    let basins = colorize_basins(solver.basin()?, &palette)?;
    export_png(&basins, &args.output, &metadata("basins"))?;
    info!(path = %args.output.display(), "wrote basin image");

    if let Some(path) = &args.convergence_rate {
        let rate = colorize_convergence(solver.iteration_counts()?)?;
        export_png(&rate, path, &metadata("convergence-rate"))?;
        info!(path = %path.display(), "wrote convergence-rate image");
    }
    Ok(())
}
