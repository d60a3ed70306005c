use std::{cell::RefCell, fs, io::stderr, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::Parser;
use trellis::{
    Ui, UiConfig,
    dump::dump,
    event::PlatformEvent,
    geom::Size,
    runloop,
    testing::{FixedFonts, RecordingSurface, ScriptedEvents},
};
use trellis_demos::tackgrid::{Tacks, demo, sample_script, tack_count};
use tracing_subscriber::EnvFilter;

/// Replay a scripted session against the tack canvas demo and print the
/// resulting node tree.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding a list of platform events. A built-in session is
    /// used when absent.
    #[clap(short, long)]
    script: Option<PathBuf>,

    /// Window width
    #[clap(long, default_value_t = 1024.0)]
    width: f64,

    /// Window height
    #[clap(long, default_value_t = 768.0)]
    height: f64,

    /// Log at debug level
    #[clap(short, long)]
    verbose: bool,
}

pub fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .init();

    let size = Size::new(args.width, args.height);
    let events: Vec<PlatformEvent> = match &args.script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => sample_script(size),
    };

    let state = Rc::new(RefCell::new(Tacks::default()));
    let config = UiConfig {
        width: args.width,
        height: args.height,
        ..UiConfig::default()
    };
    let mut ui = Ui::new(demo(&state), FixedFonts::default(), config)?;
    let mut source = ScriptedEvents::new(events);
    let mut surface = RecordingSurface::new(size);
    let frames = runloop(&mut ui, &mut source, &mut surface)?;

    println!("{}", dump(&ui, ui.root())?);
    println!(
        "frames: {frames}  tacks: {}  draw commands: {}",
        tack_count(&ui, &state)?,
        surface.commands().len()
    );
    Ok(())
}
