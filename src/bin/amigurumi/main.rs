//! Amigurumi CLI - compile patterns and relax them into meshes.
//!
//! Usage: amigurumi <COMMAND> [OPTIONS] <DOCUMENT> [OUTPUT]
//!
//! Run `amigurumi --help` for available commands.

use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::info;

use amigurumi::graph::PatternGraph;
use amigurumi::io::{self, Amigurumi};
use amigurumi::sim::{Anchor, MeshSolver, Progress, SolverOptions};

#[derive(Parser)]
#[command(name = "amigurumi")]
#[command(author, version, about = "Crochet pattern compiler and shape relaxer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the parts of a document
    Info {
        /// Input document (JSON)
        input: PathBuf,
    },

    /// Compile a document and report errors
    Check {
        /// Input document (JSON)
        input: PathBuf,
    },

    /// Relax a part and export the mesh
    Relax {
        /// Input document (JSON)
        input: PathBuf,

        /// Output mesh file (.stl or .ply)
        output: PathBuf,

        /// Part to relax (default: the last part built)
        #[arg(short, long)]
        part: Option<u32>,

        /// Number of solver ticks
        #[arg(short, long, default_value = "500")]
        ticks: usize,

        /// Tick length in seconds (default: from the solver options)
        #[arg(long)]
        dt: Option<f64>,

        /// Constraint passes per tick
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Stuffing stiffness
        #[arg(short, long)]
        stiffness: Option<f64>,

        /// Velocity damping (0.0 to 1.0)
        #[arg(short, long)]
        damping: Option<f64>,

        /// Stitch spacing
        #[arg(long)]
        spacing: Option<f64>,

        /// Solver options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Anchor file (JSON)
        #[arg(long)]
        anchors: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,

        Commands::Check { input } => cmd_check(&input)?,

        Commands::Relax {
            input,
            output,
            part,
            ticks,
            dt,
            iterations,
            stiffness,
            damping,
            spacing,
            config,
            anchors,
        } => {
            let mut options = match config {
                Some(path) => io::load_options(path)?,
                None => SolverOptions::default(),
            };
            if let Some(iterations) = iterations {
                options = options.with_iterations(iterations);
            }
            if let Some(stiffness) = stiffness {
                options = options.with_stiffness(stiffness);
            }
            if let Some(damping) = damping {
                options = options.with_damping(damping);
            }
            if let Some(spacing) = spacing {
                options = options.with_point_distance(spacing);
            }
            if let Some(dt) = dt {
                options = options.with_time_step(dt);
            }
            let anchors = match anchors {
                Some(path) => io::load_anchors(path)?,
                None => Vec::new(),
            };
            cmd_relax(&input, &output, part, ticks, options, &anchors)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar.
fn create_progress() -> Progress {
    let max_percent = Cell::new(0usize);

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only redraw when the percentage moves
        if percent <= max_percent.get() && percent != 100 {
            return;
        }
        max_percent.set(percent);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn load(input: &Path) -> Result<Amigurumi, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let doll = Amigurumi::load(input)?;
    info!(
        "compiled {} ({} parts) in {:.2?}",
        input.display(),
        doll.parts().len(),
        start.elapsed()
    );
    Ok(doll)
}

fn print_part(id: u32, graph: &PatternGraph, current: bool) {
    let stats = graph.stats();
    println!(
        "Part {}{}:",
        id,
        if current { " (current)" } else { "" }
    );
    println!("  Nodes: {}", stats.nodes);
    println!("  Edges: {}", stats.edges);
    println!("  Faces: {}", stats.faces);
    println!("  Joints: {}", stats.joints);
    println!("  Live stitches: {}", stats.outline);
    println!("  Stitches worked: {}", graph.stitches_consumed());
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = io::Document::from_json(&std::fs::read_to_string(input)?)?;
    let doll = Amigurumi::from_document(&document)?;

    println!("File: {}", input.display());
    println!("Commands: {}", document.commands.len());
    println!("Parts: {}", doll.parts().len());

    for (&id, graph) in doll.parts() {
        print_part(id, graph, doll.current_id() == Some(id));
    }

    // Stitch-count consistency of each pattern command, advisory only
    for (index, command) in document.commands.iter().enumerate() {
        if let io::Command::Pattern { id, rounds } = command {
            let def = io::build_pattern(rounds)?;
            let verdict = if def.check_valid() { "consistent" } else { "INCONSISTENT" };
            println!(
                "Command {} (part {}): {} rounds, stitch counts {}",
                index,
                id.map_or_else(|| "?".to_string(), |id| id.to_string()),
                def.num_rounds(),
                verdict
            );
        }
    }

    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doll = load(input)?;
    println!("OK: {} parts", doll.parts().len());
    Ok(())
}

fn cmd_relax(
    input: &Path,
    output: &Path,
    part: Option<u32>,
    ticks: usize,
    options: SolverOptions,
    anchors: &[Anchor],
) -> Result<(), Box<dyn std::error::Error>> {
    let doll = load(input)?;
    let graph = match part {
        Some(id) => doll
            .part(id)
            .ok_or(amigurumi::error::PatternError::UnknownPart { id })?,
        None => doll.current().ok_or("document builds no parts")?,
    };

    println!(
        "Loaded: {} nodes, {} edges, {} faces, {} joints",
        graph.num_nodes(),
        graph.num_edges(),
        graph.num_faces(),
        graph.num_joints()
    );

    let dt = options.time_step;
    println!(
        "Relaxing ({} ticks, dt={}, iterations={}, stiffness={}, damping={})...",
        ticks, dt, options.iterations, options.stiffness, options.damping
    );

    let mut solver = MeshSolver::new(graph, anchors, options)?;
    let progress = create_progress().with_interval(10);

    let start = Instant::now();
    solver.run_with_progress(ticks, dt, &progress);
    let elapsed = start.elapsed();

    let stats = solver.edge_length_stats();
    println!(
        "Edge length / rest: mean {:.4}, std dev {:.4}, max error {:.4} ({} edges)",
        stats.mean, stats.std_dev, stats.max_error, stats.count
    );

    io::export(&solver, output)?;

    println!("Completed in {:.2?}", elapsed);
    println!("Saved to: {}", output.display());

    Ok(())
}
