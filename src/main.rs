use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::debug;

use svg2level::{Config, ExportMode};

#[derive(Parser)]
#[command(name = "svg2level", version)]
#[command(about = "Convert the path outlines of an SVG file into level line segments")]
struct Cli {
    /// SVG file to convert
    input: PathBuf,

    /// Only export the segments of the first outline, without names
    #[arg(long)]
    first_only: bool,

    /// Reject relative moveto (`m`) path commands
    #[arg(long)]
    no_relative_moveto: bool,

    /// Write CSV records instead of a Level block
    #[cfg(feature = "csv")]
    #[arg(long)]
    csv: bool,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            relative_moveto: !self.no_relative_moveto,
            mode: if self.first_only {
                ExportMode::FirstUnnamed
            } else {
                ExportMode::Named
            },
        }
    }
}

fn main() {
    fn inner(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
        let config = cli.config();
        debug!("Converting {} with {:?}", cli.input.display(), config);

        #[cfg(feature = "csv")]
        {
            if cli.csv {
                let doc = svg2level::Document::open(&cli.input)?;
                let outlines = svg2level::walk::walk_document(&doc, &config)?;
                let mut buf = Vec::new();
                svg2level::write_csv(&outlines, config.mode, &mut buf)?;
                std::io::stdout().write_all(&buf)?;
                return Ok(());
            }
        }

        // The text is only written once the whole document converted.
        let out = svg2level::convert_file(&cli.input, &config)?;
        std::io::stdout().write_all(out.as_bytes())?;
        Ok(())
    }

    let cli = Cli::parse();
    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = inner(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }
}
