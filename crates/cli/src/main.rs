use clap::Parser;
use ffqueue_core::config;
use ffqueue_core::error::Result;
use ffqueue_core::events::Event;
use ffqueue_core::queue_file;
use ffqueue_core::runner::Runner;
use log::debug;
use std::process::ExitCode;

mod cli_args;

use cli_args::Args;

fn execute() -> Result<ExitCode> {
    let args = Args::parse();

    let queue_path = config::get_queue_path(&args.queue_path);
    debug!("Queue path: `{queue_path}`");

    let queue = queue_file::load_queue(&queue_path)?;
    let ffmpeg_path = config::get_ffmpeg_path(&args.ffmpeg_path);

    if args.dry_run {
        for (index, command) in queue.iter().enumerate() {
            println!("({}/{}): {ffmpeg_path} {command}", index + 1, queue.len());
        }
        println!("Dry run is specified, exiting without executing.");
        return Ok(ExitCode::SUCCESS);
    }

    let (runner, events) = Runner::start(ffmpeg_path, queue);

    let mut result_code = 0;
    while let Ok(event) = events.recv() {
        match event {
            Event::Log(line) => println!("{line}"),
            Event::Progress {
                index,
                total,
                percent,
            } => println!("[{index}/{total}] {percent:.1}%"),
            Event::Failure(message) => eprintln!("{message}"),
            Event::Finished(code) => {
                result_code = code;
                break;
            }
        }
    }

    drop(runner);

    if result_code == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        // Engine codes outside u8 range (forced-kill statuses) collapse to 255
        Ok(ExitCode::from(u8::try_from(result_code).unwrap_or(u8::MAX)))
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
