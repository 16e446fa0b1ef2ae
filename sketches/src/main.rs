use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use knob::prelude::*;

mod sketches;
use sketches::generative::circles;
use sketches::shapes::{ellipse, polygon, square, triangle};

#[derive(Parser, Debug)]
#[command(name = "sketches", about = "Render knob sketches to SVG")]
struct Cli {
    /// Where to write `<sketch>.svg`. Defaults to ~/Pictures/Knob
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Also keep a timestamped copy of every render
    #[arg(long, global = true)]
    history: bool,

    /// Print control values and render stats as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered sketches by category
    List,
    /// Render a sketch, optionally overriding controls first
    Render {
        sketch: String,
        /// `name=value`, repeatable
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
    /// Simulate dragging a control through several values and releasing it
    Drag {
        sketch: String,
        control: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn main() {
    init_logger();

    let registry = knob::register_sketches! {
        {
            title: "Shapes",
            enabled: true,
            sketches: [
                square,
                ellipse,
                triangle,
                polygon,
            ]
        },
        {
            title: "Generative",
            enabled: true,
            sketches: [
                circles,
            ]
        },
    }
    .unwrap_or_else(|err| {
        eprintln!("knob sketch registry failed: {}", err);
        std::process::exit(1);
    });

    let cli = Cli::parse();

    if let Err(err) = run(&cli, &registry) {
        eprintln!("knob: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, registry: &SketchRegistry) -> Result<(), SessionError> {
    match &cli.command {
        Command::List => {
            for category in registry.categories() {
                println!("{}", category.title);
                for name in &category.sketches {
                    let display_name = registry
                        .get(name)
                        .map_or(name.as_str(), |e| e.config.display_name);
                    println!("  {:<12} {}", name, display_name);
                }
            }
            Ok(())
        }
        Command::Render { sketch, set } => {
            let (session, surface) = start(cli, registry, sketch)?;
            for assignment in set {
                session.assign(assignment)?;
            }
            report(cli, &session, &surface);
            Ok(())
        }
        Command::Drag {
            sketch,
            control,
            values,
        } => {
            let (session, surface) = start(cli, registry, sketch)?;
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            session.drag(control, &values)?;
            report(cli, &session, &surface);
            Ok(())
        }
    }
}

fn start(
    cli: &Cli,
    registry: &SketchRegistry,
    sketch: &str,
) -> Result<(SketchSession, Rc<RefCell<FileSurface>>), SessionError> {
    let dir = cli.out.clone().unwrap_or_else(default_output_dir);
    let surface =
        Rc::new(RefCell::new(FileSurface::new(dir).keep_history(cli.history)));
    let session = SketchSession::start_named(registry, sketch, surface.clone())?;
    Ok((session, surface))
}

fn report(cli: &Cli, session: &SketchSession, surface: &Rc<RefCell<FileSurface>>) {
    let surface = surface.borrow();
    let stats = session.stats();

    if let Some(err) = surface.last_error() {
        warn!("Last render of `{}` failed: {}", session.slot(), err);
    }

    if cli.json {
        let report = serde_json::json!({
            "sketch": session.slot(),
            "values": session.values(),
            "invocations": stats.invocations,
            "failures": stats.failures,
            "coalesced": stats.coalesced,
            "files": surface.written(),
        });
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => error!("Could not serialise report: {}", e),
        }
        return;
    }

    println!(
        "{}: {} render(s), {} failure(s)",
        session.config().display_name,
        stats.invocations,
        stats.failures
    );
    println!("{}", surface.slot_path(session.slot()).display());
}
