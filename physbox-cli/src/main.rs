mod app;
mod forms;
mod view;
mod watch;

use clap::{Parser, Subcommand};
use eframe::egui;
use physbox_core::{build_simulation_context, get_body_states, step_simulation};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "physbox")]
#[command(version, about = "physbox - a 2D point-mass physics sandbox", long_about = None)]
struct Cli {
    /// Logging verbosity: trace, debug, info, warn or error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive sandbox (default if no subcommand)
    View {
        /// Scene file to load and watch for changes
        file: Option<PathBuf>,

        /// Fixed step size in seconds, overriding the scene
        #[arg(long)]
        dt: Option<f64>,

        /// Window width
        #[arg(long, default_value = "1200")]
        width: f32,

        /// Window height
        #[arg(long, default_value = "800")]
        height: f32,
    },

    /// Run a scene headless and print the final state
    Run {
        /// Path to the scene file
        file: PathBuf,

        /// Number of steps, overriding the scene
        #[arg(long)]
        steps: Option<usize>,

        /// Fixed step size in seconds, overriding the scene
        #[arg(long)]
        dt: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: cannot install logger: {}", e);
    }

    info!("physbox v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        None => run_view(None, None, 1200.0, 800.0),
        Some(Commands::View {
            file,
            dt,
            width,
            height,
        }) => run_view(file, dt, width, height),
        Some(Commands::Run { file, steps, dt }) => run_file(&file, steps, dt),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run_view(
    scene: Option<PathBuf>,
    dt: Option<f64>,
    width: f32,
    height: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dt) = dt {
        if !(dt > 0.0) {
            return Err(format!("--dt must be positive, got {}", dt).into());
        }
    }
    info!(scene = ?scene, "starting sandbox");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_title("physbox"),
        ..Default::default()
    };
    let options = app::ViewOptions { scene, dt };

    eframe::run_native(
        "physbox",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::SandboxApp::new(options, cc)))),
    )?;
    Ok(())
}

fn run_file(
    file: &Path,
    steps: Option<usize>,
    dt: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let mut ctx = build_simulation_context(&source)?;
    for diagnostic in ctx.diagnostics.iter() {
        warn!("{}: {}", file.display(), diagnostic);
    }

    if let Some(steps) = steps {
        ctx.simulate.steps = steps;
    }
    if let Some(dt) = dt {
        if !(dt > 0.0) {
            return Err(format!("--dt must be positive, got {}", dt).into());
        }
        ctx.simulate.dt = dt;
    }
    info!(
        steps = ctx.simulate.steps,
        dt = ctx.simulate.dt,
        "running {}",
        file.display()
    );

    while !step_simulation(&mut ctx) {}
    let collisions = ctx.collisions;

    println!("t = {:.4} s after {} steps", ctx.world.time(), ctx.current_step);
    for state in get_body_states(&ctx.world) {
        println!(
            "{} {:<8} pos = ({:.4}, {:.4}) vel = ({:.4}, {:.4}) ke = {:.4} work = {:.4}",
            state.id,
            state.shape.name(),
            state.position.x,
            state.position.y,
            state.velocity.x,
            state.velocity.y,
            state.kinetic_energy,
            state.work_done,
        );
    }
    let momentum = ctx.world.total_momentum();
    println!("total ke = {:.4}", ctx.world.total_kinetic_energy());
    println!("total momentum = ({:.4}, {:.4})", momentum.x, momentum.y);
    println!(
        "collisions: ground = {} pairs = {} obstacles = {} skipped = {}",
        collisions.ground_contacts,
        collisions.pair_collisions,
        collisions.obstacle_collisions,
        collisions.degenerate_pairs,
    );

    Ok(())
}
