//! blocklex - print a Python file with incremental syntax highlighting

use std::env;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use blocklex::syntax::BlockHighlighter;
use blocklex::{Config, Document, Renderer, Result};
use log::debug;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut line_numbers: Option<bool> = None;
    let mut active_line: Option<usize> = None;
    let mut file: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("blocklex {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--config" | "-c" => config_path = args.next().map(PathBuf::from),
            "--line-numbers" | "-n" => line_numbers = Some(true),
            "--no-line-numbers" => line_numbers = Some(false),
            "--line" | "-l" => active_line = args.next().and_then(|n| n.parse::<usize>().ok()),
            _ if !arg.starts_with('-') => file = Some(PathBuf::from(&arg)),
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                process::exit(2);
            }
        }
    }

    let Some(file) = file else {
        print_usage();
        process::exit(2);
    };

    let mut config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load(),
    };
    if let Some(show) = line_numbers {
        config.show_line_numbers = show;
    }

    let highlighter = Arc::new(BlockHighlighter::python()?);
    let mut doc = Document::from_file(&file, highlighter)?;
    if let Some(line) = active_line {
        doc.set_active_line(line.saturating_sub(1));
    }
    debug!("rendering {} lines of {}", doc.line_count(), doc.name());

    let renderer = Renderer::from_config(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    renderer.render_document(&mut out, &doc)?;

    Ok(())
}

fn print_usage() {
    println!("blocklex {} - incremental syntax highlighter", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: blocklex [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  -c, --config PATH      Read settings from PATH instead of ~/.blocklex.toml");
    println!("  -n, --line-numbers     Show the line-number gutter");
    println!("      --no-line-numbers  Hide the line-number gutter");
    println!("  -l, --line N           Mark line N (1-based) as the active line");
    println!("  -h, --help             Show this help message");
    println!("  -V, --version          Show version information");
    println!();
    println!("Set RUST_LOG=debug for diagnostic output.");
}
