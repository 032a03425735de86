//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure for the `ffq`
//! binary using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the ffq batch runner.
#[derive(Parser, Debug)]
#[command(term_width = 0)]
pub struct Args {
    /// Path to the queue file YAML (an ordered list of FFmpeg argument
    /// lists).
    ///
    /// If not provided, defaults to `~/.ffqueue/queue.yml`.
    pub queue_path: Option<String>,

    /// Path to the FFmpeg executable.
    ///
    /// If not provided, `ffmpeg` is resolved through `PATH`.
    #[arg(long, short = 'p')]
    pub ffmpeg_path: Option<String>,

    /// Perform a dry run, which just prints the queued invocations but does
    /// not execute them.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,
}
