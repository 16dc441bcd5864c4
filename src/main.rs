//! bitree-viz CLI
//!
//! Usage:
//!   bitree-viz [OPTIONS] [FILE]
//!
//! Options:
//!   -o, --output <FILE>      Output file (defaults to FILE.svg, or stdout)
//!   -s, --stylesheet <FILE>  Stylesheet with property defaults (TOML format)
//!   --dump-layout            Print node coordinates instead of SVG
//!   --scale <FACTOR>         Page scale of the SVG output (default 1)
//!   --log-level <LEVEL>      off, error, warn, info, debug or trace
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{debug, info, LevelFilter};

use bitree_viz::{render_svg, RenderConfig, Session, SessionError, Stylesheet};

#[derive(Parser, Debug)]
#[command(name = "bitree-viz")]
#[command(about = "Draw binary trees from a bracketed text notation")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stylesheet with global property defaults (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Print the computed layout instead of SVG
    #[arg(long)]
    dump_layout: bool,

    /// Page scale of the SVG output
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting bitree-viz");
    debug!(cli:?; "Parsed arguments");

    let mut config = RenderConfig::new();
    config.svg = config.svg.with_scale(cli.scale);
    if let Some(path) = &cli.stylesheet {
        match Stylesheet::from_file(path) {
            Ok(stylesheet) => config = config.with_stylesheet(stylesheet),
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                process::exit(1);
            }
        }
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    process::exit(1);
                }
            }
        }
    };

    let mut session = match Session::parse_with(&source, &config.layout, &config.stylesheet) {
        Ok(session) => session,
        Err(SessionError::Parse(e)) => {
            eprint!("{}", e.format(&source, &filename));
            process::exit(1);
        }
        Err(SessionError::Layout(e)) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    for diagnostic in session.diagnostics() {
        eprint!("{}", diagnostic.format(&source, &filename));
    }

    if cli.dump_layout {
        print!("{}", session.layout());
        return;
    }

    let svg = render_svg(&mut session, &config.svg);
    let output = cli
        .output
        .clone()
        .or_else(|| cli.input.as_ref().map(|path| path.with_extension("svg")))
        .filter(|path| Some(path) != cli.input.as_ref());
    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, svg) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                process::exit(1);
            }
            info!(path:? = path; "Wrote SVG");
        }
        None => print!("{}", svg),
    }
}
