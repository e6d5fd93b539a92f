use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use tracing::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Re-encodes a JSON object compactly without disturbing its key order.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The JSON file to read. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Where to write the result. Writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write `<`, `>` and `&` literally instead of as unicode escapes.
    #[arg(long)]
    no_escape_html: bool,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(input: Option<&PathBuf>) -> anyhow::Result<Vec<u8>> {
    match input {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = Args::parse();
    debug!(?args);

    let bytes = read_input(args.input.as_ref())?;

    let mut map = jsonmap::decode(&bytes).context("input is not a JSON object")?;
    map.set_escape_html(!args.no_escape_html);
    info!(members = map.len(), "decoded input");

    let mut encoded = jsonmap::encode(&map).context("failed to encode JSON")?;
    encoded.push(b'\n');

    match &args.output {
        Some(path) => fs::write(path, &encoded)
            .with_context(|| format!("failed to write `{}`", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&encoded).context("failed to write stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
