//! Music Box quantizer CLI
//!
//! Reads one MIDI file, quantizes its note onsets onto the pin grid and
//! prints the populated cells plus an ASCII view of the cylinder.
//!
//! Usage:
//!   musicbox <file.mid> [OPTIONS]
//!
//! Options:
//!   --config <path>          TOML config (default: user config dir)
//!   --rows <n>               Override row capacity
//!   --jitter <ticks>         Override jitter tolerance
//!   --gap-multiplier <f>     Override empty-row threshold (<= 0 disables)
//!   --json                   Print the grid as JSON instead
//!   --verbose                Extra debug output
//!   --help                   Show this help message

use std::path::PathBuf;

use musicbox_lib::config::Config;
use musicbox_lib::{pipeline, report};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        std::process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let verbose = args.iter().any(|a| a == "--verbose");
    let log_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let input = positional(args)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("No input MIDI file given"))?;

    let config_path = flag_value(args, "--config")
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_default(&config_path);

    if let Some(rows) = parse_flag(args, "--rows")? {
        config.row_capacity = rows;
    }
    if let Some(jitter) = parse_flag(args, "--jitter")? {
        config.jitter_ticks = Some(jitter);
    }
    if let Some(multiplier) = parse_flag(args, "--gap-multiplier")? {
        config.gap_multiplier = multiplier;
    }

    let file = pipeline::quantize_file(&input, &config)?;

    if args.iter().any(|a| a == "--json") {
        println!("{}", report::to_json(&file)?);
        return Ok(());
    }

    println!("\n=== {} ===\n", input.display());
    for line in report::cell_lines(&file.result.grid, file.params.pitch_table()) {
        println!("  {}", line);
    }
    println!();
    print!("{}", report::render_ascii(&file.result.grid));
    println!();
    print!("{}", report::summary(&file.result.diagnostics));

    Ok(())
}

const VALUE_FLAGS: &[&str] = &["--config", "--rows", "--jitter", "--gap-multiplier"];

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_flag<T>(args: &[String], flag: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid value '{}' for {}: {}", raw, flag, e)),
        None => Ok(None),
    }
}

/// First argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<&str> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if VALUE_FLAGS.contains(&arg) {
            i += 2;
        } else if arg.starts_with("--") {
            i += 1;
        } else {
            return Some(arg);
        }
    }
    None
}

fn print_usage() {
    println!("Usage: musicbox <file.mid> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <path>          TOML config (default: user config dir)");
    println!("  --rows <n>               Override row capacity");
    println!("  --jitter <ticks>         Override jitter tolerance");
    println!("  --gap-multiplier <f>     Override empty-row threshold (<= 0 disables)");
    println!("  --json                   Print the grid as JSON instead");
    println!("  --verbose                Extra debug output");
    println!("  --help, -h               Show this help");
}
