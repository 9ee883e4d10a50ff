//! dwell-pointer - drive a gaze dwell pointer from s-expression commands.
//!
//! Reads one command per line from a script file or stdin and prints one
//! response per line, so a hit-tester or renderer in another process can
//! use the pointer over a pipe.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use dwell_pointer::{ipc, DwellPointer, PointerConfig};

#[derive(Parser, Debug)]
#[command(name = "dwell-pointer", about = "Gaze dwell-time pointer and reticle driver")]
struct Cli {
    /// Config plist, e.g. (:dwell-time 1.0 :segments 20)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command script, one s-expression per line (default: stdin)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log every command and response
    #[arg(long)]
    ipc_trace: bool,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PointerConfig> {
    let Some(path) = path else {
        info!("no config file given, using defaults");
        return Ok(PointerConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    PointerConfig::from_sexp(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn run(pointer: &mut DwellPointer, input: impl BufRead, trace: bool) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", lineno + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        let response = ipc::handle_message(pointer, line);
        if trace {
            info!("<- {}", line);
            info!("-> {}", response);
        } else {
            debug!("-> {}", response);
        }
        writeln!(out, "{}", response).context("failed to write response")?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("dwell-pointer {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Logs go to stderr; stdout carries responses only.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dwell_pointer=info".into()),
        )
        .init();

    info!("dwell-pointer v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_ref())?;
    let mut pointer = DwellPointer::new(config).context("failed to create pointer")?;

    match cli.script {
        Some(path) => {
            let file = fs::File::open(&path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            run(&mut pointer, BufReader::new(file), cli.ipc_trace)
        }
        None => run(&mut pointer, io::stdin().lock(), cli.ipc_trace),
    }
}
