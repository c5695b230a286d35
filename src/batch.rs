// Batch quantization: independent files on a small worker pool
//
// Runs share nothing but the read-only config, so workers just pull paths
// from a bounded job channel and push results back. A failure in one file
// never affects another.

use crossbeam_channel::{bounded, unbounded};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::pipeline::{self, FileQuantization, PipelineError};

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct BatchResult {
    pub path: PathBuf,
    pub outcome: Result<FileQuantization, PipelineError>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Quantize every path using up to `workers` threads.
/// Results come back in the order of `paths`.
pub fn quantize_files(paths: &[PathBuf], config: &Config, workers: usize) -> Vec<BatchResult> {
    if paths.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, paths.len());

    let (job_tx, job_rx) = bounded::<(usize, &Path)>(workers * 2);
    let (result_tx, result_rx) = unbounded::<(usize, BatchResult)>();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (index, path) in job_rx {
                    let outcome = pipeline::quantize_file(path, config);
                    if let Err(e) = &outcome {
                        log::warn!("Failed to quantize {}: {}", path.display(), e);
                    }
                    let result = BatchResult {
                        path: path.to_path_buf(),
                        outcome,
                    };
                    if result_tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        for (index, path) in paths.iter().enumerate() {
            if job_tx.send((index, path.as_path())).is_err() {
                break;
            }
        }
        drop(job_tx);
    });

    let mut results: Vec<(usize, BatchResult)> = result_rx.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

/// MIDI files (`.mid` / `.midi`) directly inside `dir`, sorted by name.
pub fn find_midi_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_midi_path(path))
        .collect();
    files.sort();
    Ok(files)
}

fn is_midi_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mid") || ext.eq_ignore_ascii_case("midi"))
        .unwrap_or(false)
}

/// Print a PASS/FAIL line per file and a totals line.
pub fn print_summary(results: &[BatchResult]) {
    let passed = results.iter().filter(|r| r.is_ok()).count();
    let failed = results.len() - passed;

    println!("\n  === Batch Results ===\n");

    for (i, result) in results.iter().enumerate() {
        let name = result.path.display().to_string();
        let status = match &result.outcome {
            Ok(file) if file.result.diagnostics.is_truncated() => "PASS (truncated)",
            Ok(_) => "PASS",
            Err(_) => "FAIL",
        };
        println!(
            "  [{}/{}] {} {} {}",
            i + 1,
            results.len(),
            name,
            ".".repeat(50_usize.saturating_sub(name.len())),
            status,
        );
        match &result.outcome {
            Ok(file) => {
                let d = &file.result.diagnostics;
                println!(
                    "         -> {} notes on {} rows, {} dropped, {} truncated",
                    file.result.grid.note_count(),
                    d.rows_used,
                    d.dropped_events,
                    d.truncated_events,
                );
            }
            Err(e) => println!("         -> {}", e),
        }
    }

    println!();
    if failed == 0 {
        println!("  Results: {} passed, 0 failed", passed);
    } else {
        println!("  Results: {} passed, {} FAILED", passed, failed);
    }
    println!();
}
