//! The queue executor.
//!
//! [`Runner::start`] spawns one dedicated worker thread that executes the
//! queue strictly in order and reports everything it observes as [`Event`]s
//! over a channel. The caller's thread keeps the [`Runner`] handle for the
//! control surface: `pause`, `resume`, `stop`.
//!
//! Nothing escapes the worker as a raised fault; every failure is recovered
//! here and turned into an event.

use std::io::{BufRead, BufReader};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::command::{quote, Command, CommandQueue};
use crate::error::Error;
use crate::events::Event;
use crate::output_path::resolve_collision;
use crate::process::{spawn_child, SharedState};
use crate::progress::ProgressParser;

/// Overall result code when the executable cannot be found at all
pub const EXIT_CODE_NOT_FOUND: i32 = 127;
/// Overall result code when the run was stopped by the user
pub const EXIT_CODE_STOPPED: i32 = 130;
/// Overall result code for spawn or stream failures
pub const EXIT_CODE_ERROR: i32 = -1;

/// Handle to one in-flight queue run.
///
/// Dropping the runner stops the run: the in-flight process is terminated,
/// the worker thread is joined, and a tracked partial output file is
/// removed.
pub struct Runner {
    shared: Arc<SharedState>,
    events: Sender<Event>,
    worker: Option<JoinHandle<()>>,
}

impl Runner {
    /// Starts executing the queue on a dedicated worker thread.
    ///
    /// Returns the control handle and the receiving end of the event
    /// stream. Events arrive in production order; the stream ends with
    /// exactly one [`Event::Finished`], whose code is `0` only when every
    /// command exited successfully.
    pub fn start(ffmpeg_path: String, queue: CommandQueue) -> (Self, Receiver<Event>) {
        let (sender, receiver) = mpsc::channel();
        let shared = Arc::new(SharedState::new());

        let worker = {
            let shared = Arc::clone(&shared);
            let sender = sender.clone();
            thread::spawn(move || {
                let code = run_queue(&ffmpeg_path, &queue, &shared, &sender);
                let _ = sender.send(Event::Finished(code));
            })
        };

        (
            Self {
                shared,
                events: sender,
                worker: Some(worker),
            },
            receiver,
        )
    }

    /// Suspends the in-flight process. Valid only while a process is alive
    /// and not already paused; failure to suspend is reported as a
    /// non-fatal [`Event::Failure`].
    pub fn pause(&self) {
        match self.shared.suspend() {
            Ok(()) => {
                let _ = self.events.send(Event::Log("Paused.".to_string()));
            }
            Err(e) => {
                let _ = self
                    .events
                    .send(Event::Failure(format!("Failed to suspend process: {e}")));
            }
        }
    }

    /// Resumes a paused process.
    pub fn resume(&self) {
        match self.shared.resume() {
            Ok(()) => {
                let _ = self.events.send(Event::Log("Resumed.".to_string()));
            }
            Err(e) => {
                let _ = self
                    .events
                    .send(Event::Failure(format!("Failed to resume process: {e}")));
            }
        }
    }

    /// Stops the run: no further commands are picked up, the in-flight
    /// process is terminated (resumed first if paused), and a tracked
    /// partial output file is deleted best-effort.
    ///
    /// Synchronous from the caller's perspective: returns only once the
    /// worker thread has fully unwound and cleanup has been attempted.
    pub fn stop(&mut self) {
        self.shared.terminate();

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        self.shared.remove_partial_output();
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_queue(
    ffmpeg_path: &str,
    queue: &[Command],
    shared: &SharedState,
    events: &Sender<Event>,
) -> i32 {
    let total = queue.len();

    for (position, command) in queue.iter().enumerate() {
        if shared.is_stop_requested() {
            return EXIT_CODE_STOPPED;
        }

        let index = position + 1;

        let (resolved, output_path) = resolve_collision(command);
        if resolved != *command {
            if let Some(path) = &output_path {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let _ = events.send(Event::Log(format!(
                    "Notice: Output file exists. Renaming to '{name}' to avoid overwrite."
                )));
            }
        }
        shared.set_cleanup_target(output_path);

        let _ = events.send(Event::Log(format!(
            "Executing ({index}/{total}): {} {resolved}",
            quote(ffmpeg_path)
        )));

        let mut child = match spawn_child(ffmpeg_path, &resolved.args) {
            Ok(child) => child,
            Err(e @ Error::ExecutableNotFound { .. }) => {
                let _ = events.send(Event::Failure(e.to_string()));
                return EXIT_CODE_NOT_FOUND;
            }
            Err(e) => {
                let _ = events.send(Event::Failure(e.to_string()));
                return EXIT_CODE_ERROR;
            }
        };

        // Take both pipes before the handle is shared with the control
        // side, so only the handle itself ever needs the lock.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        shared.store_child(child);

        // FFmpeg rarely writes to stdout, but an unread pipe can fill up
        // and deadlock the child, so a helper thread drains it.
        let stdout_forwarder = stdout.map(|stdout| {
            let events = events.clone();
            thread::spawn(move || {
                for line in BufReader::new(stdout)
                    .lines()
                    .map_while(std::result::Result::ok)
                {
                    let _ = events.send(Event::Log(line));
                }
            })
        });

        let mut parser = ProgressParser::new();
        let mut stream_error = None;

        if let Some(stderr) = stderr {
            let mut reader = BufReader::new(stderr);
            let mut raw = Vec::new();

            loop {
                match read_diagnostic_line(&mut reader, &mut raw) {
                    Ok(0) => break,
                    Ok(_) => {
                        if raw.is_empty() {
                            continue;
                        }
                        let line = String::from_utf8_lossy(&raw).into_owned();
                        let _ = events.send(Event::Log(line.clone()));
                        if let Some(percent) = parser.feed(&line) {
                            let _ = events.send(Event::Progress {
                                index,
                                total,
                                percent,
                            });
                        }
                    }
                    Err(e) => {
                        stream_error = Some(e);
                        break;
                    }
                }
            }
        }

        if let Some(forwarder) = stdout_forwarder {
            let _ = forwarder.join();
        }

        let Some(mut child) = shared.take_child() else {
            return EXIT_CODE_ERROR;
        };
        let wait_result = child.wait();

        let status = match wait_result {
            Ok(status) => status,
            Err(e) => {
                let _ = events.send(Event::Failure(Error::Stream(e).to_string()));
                return EXIT_CODE_ERROR;
            }
        };

        // A successful exit retires the output from cleanup tracking before
        // any early return below, so a stop that raced the exit can never
        // delete a completed file.
        if status.success() {
            shared.clear_cleanup_target();
        }

        if let Some(e) = stream_error {
            let _ = events.send(Event::Failure(Error::Stream(e).to_string()));
            return EXIT_CODE_ERROR;
        }

        if shared.is_stop_requested() {
            // The termination made this exit status meaningless; a stopped
            // command is not reported as a failure.
            return EXIT_CODE_STOPPED;
        }

        if status.success() {
            let _ = events.send(Event::Progress {
                index,
                total,
                percent: parser.finish(),
            });
        } else {
            let code = status.code().unwrap_or(EXIT_CODE_ERROR);
            let _ = events.send(Event::Failure(format!(
                "Command {index} failed with exit code {code}"
            )));
            return code;
        }
    }

    0
}

/// Reads one diagnostic line, treating both `\n` and `\r` as terminators.
///
/// FFmpeg redraws its status line with bare carriage returns, so splitting
/// only on newlines would batch every progress update until the command
/// exits. Returns the number of bytes consumed; `0` means end of stream.
fn read_diagnostic_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<usize> {
    buf.clear();

    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(buf.len());
        }

        if let Some(terminator) = available.iter().position(|&b| b == b'\n' || b == b'\r') {
            buf.extend_from_slice(&available[..terminator]);
            reader.consume(terminator + 1);
            return Ok(buf.len() + 1);
        }

        buf.extend_from_slice(available);
        let consumed = available.len();
        reader.consume(consumed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all_lines(input: &str) -> Vec<String> {
        let mut reader = Cursor::new(input.as_bytes());
        let mut raw = Vec::new();
        let mut lines = Vec::new();

        loop {
            match read_diagnostic_line(&mut reader, &mut raw).unwrap() {
                0 => break,
                _ => {
                    if !raw.is_empty() {
                        lines.push(String::from_utf8_lossy(&raw).into_owned());
                    }
                }
            }
        }

        lines
    }

    #[test]
    fn test_read_diagnostic_line_newlines() {
        assert_eq!(read_all_lines("one\ntwo\nthree\n"), ["one", "two", "three"]);
    }

    #[test]
    fn test_read_diagnostic_line_carriage_returns() {
        assert_eq!(
            read_all_lines("time=00:00:01.00\rtime=00:00:02.00\rdone\n"),
            ["time=00:00:01.00", "time=00:00:02.00", "done"]
        );
    }

    #[test]
    fn test_read_diagnostic_line_crlf_yields_no_empty_lines() {
        assert_eq!(read_all_lines("one\r\ntwo\r\n"), ["one", "two"]);
    }

    #[test]
    fn test_read_diagnostic_line_unterminated_tail() {
        assert_eq!(read_all_lines("one\ntail"), ["one", "tail"]);
    }
}
