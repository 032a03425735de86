//! FFqueue Core Library
//!
//! This crate provides the execution engine for ffqueue, a sequential FFmpeg
//! batch runner. Given an ordered queue of argument lists it runs each as a
//! child process, streams the diagnostic output, derives a live completion
//! percentage from it, and supports pausing, resuming, and cancelling the
//! run mid-queue.
//!
//! # Key Features
//!
//! - **Queue Execution**: Strictly sequential runs on a dedicated worker
//!   thread, reported through an event channel
//! - **Collision Avoidance**: Existing output files are never overwritten;
//!   outputs are renamed with a numeric suffix instead
//! - **Progress Scraping**: Best-effort parsing of FFmpeg's stderr into a
//!   0-100% completion estimate
//! - **Process Control**: Pause, resume, and stop with partial-output
//!   cleanup
//! - **Error Handling**: Failures never escape the worker; the caller
//!   learns outcomes only through the event stream
//!
//! # Examples
//!
//! Running a queue and draining its events:
//!
//! ```no_run
//! use ffqueue_core::command::Command;
//! use ffqueue_core::events::Event;
//! use ffqueue_core::runner::Runner;
//!
//! let queue = vec![Command::new(["-i", "in.mkv", "out.mp4"])];
//! let (runner, events) = Runner::start("ffmpeg".to_string(), queue);
//!
//! while let Ok(event) = events.recv() {
//!     match event {
//!         Event::Log(line) => println!("{line}"),
//!         Event::Progress { index, total, percent } => {
//!             println!("[{index}/{total}] {percent:.1}%");
//!         }
//!         Event::Failure(message) => eprintln!("{message}"),
//!         Event::Finished(code) => {
//!             println!("finished with code {code}");
//!             break;
//!         }
//!     }
//! }
//! # drop(runner);
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod output_path;
pub mod process;
pub mod progress;
pub mod queue_file;
pub mod runner;
