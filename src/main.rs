use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::path::{Path, PathBuf};

use bread_dash::audio::Audio;
use bread_dash::terminal::TerminalBackend;
use bread_dash::{Session, Tuning};

#[derive(Parser, Debug)]
#[command(name = "bread-dash")]
#[command(about = "Endless runner in your terminal. Space jumps, P pauses, R restarts, Q quits.")]
struct Args {
    /// Frame rate cap.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for hole and platform placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// No music or sound effects.
    #[arg(long, default_value_t = false)]
    mute: bool,

    /// Write logs here (filtered by RUST_LOG, default info). The terminal is
    /// busy drawing the game, so there is no log output without this.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(backend: &mut TerminalBackend, session: &mut Session) -> Result<()> {
    while backend.begin_frame()? {
        session.update(backend)?;
        session.draw(backend)?;
        backend.present()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let audio = if args.mute {
        None
    } else {
        match Audio::open() {
            Ok(audio) => Some(audio),
            Err(err) => {
                log::warn!("playing without sound: {err:#}");
                None
            }
        }
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(TerminalBackend::assets(), Tuning::default(), rng);

    let mut backend = TerminalBackend::begin(args.fps, audio).context("terminal setup failed")?;
    let result = run(&mut backend, &mut session);
    backend.restore().context("could not restore the terminal")?;

    log::info!("final score {}", session.score());
    result
}
