//! Music Box Batch Quantizer
//!
//! Quantizes every `.mid` / `.midi` file in a directory on a worker pool and
//! reports a PASS/FAIL line per file.
//!
//! Usage:
//!   cargo run -p musicbox-tools --bin batch_quantize -- <dir> [OPTIONS]
//!
//! Options:
//!   --workers <n>       Worker threads (default: available parallelism)
//!   --config <path>     TOML config (default: user config dir)
//!   --verbose           Extra debug output

use std::path::PathBuf;

use musicbox_lib::batch;
use musicbox_lib::config::Config;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let verbose = args.iter().any(|a| a == "--verbose");
    let log_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let Some(dir) = args.get(1).filter(|a| !a.starts_with("--")).map(PathBuf::from) else {
        eprintln!("Usage: batch_quantize <dir> [--workers N] [--config PATH] [--verbose]");
        std::process::exit(1);
    };

    let workers = args
        .iter()
        .position(|a| a == "--workers")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()));

    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    println!("\n=== Music Box Batch Quantizer ===\n");

    let files = match batch::find_midi_files(&dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("  Cannot read {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    };

    if files.is_empty() {
        println!("  No MIDI files in {}", dir.display());
        std::process::exit(0);
    }

    println!("  Quantizing {} files on {} workers...", files.len(), workers);
    log::debug!("Config: {:?}", config);

    let results = batch::quantize_files(&files, &config, workers);
    batch::print_summary(&results);

    let any_failed = results.iter().any(|r| !r.is_ok());
    std::process::exit(if any_failed { 1 } else { 0 });
}
