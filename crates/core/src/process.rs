//! Child-process lifecycle: spawning, suspend/resume, termination, and
//! partial-output cleanup.
//!
//! The OS process handle and the tracked output path are the only state
//! shared between the worker thread and the control surface, so both live
//! here behind locks. Pause and stop flags are atomics next to them.

use std::path::PathBuf;
use std::process::{Child, Command as OsCommand, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use log::{info, warn};

use crate::error::{Error, Result};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Spawns a child process with stdin closed and both output streams piped.
///
/// Stdin is always null: the engine must never hang waiting for input. On
/// Windows the child gets no console window of its own.
pub(crate) fn spawn_child(executable: &str, args: &[String]) -> Result<Child> {
    let mut command = OsCommand::new(executable);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    command.spawn().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::ExecutableNotFound {
            path: executable.to_string(),
        },
        _ => Error::Spawn {
            path: executable.to_string(),
            original: e,
        },
    })
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: libc::c_int) -> Result<()> {
    let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
    if rc == 0 {
        Ok(())
    } else {
        Err(Error::Signal {
            pid,
            original: std::io::Error::last_os_error(),
        })
    }
}

#[cfg(unix)]
fn suspend_process(pid: u32) -> Result<()> {
    send_signal(pid, libc::SIGSTOP)
}

#[cfg(unix)]
fn resume_process(pid: u32) -> Result<()> {
    send_signal(pid, libc::SIGCONT)
}

#[cfg(not(unix))]
fn suspend_process(_pid: u32) -> Result<()> {
    Err(Error::SuspendUnsupported)
}

#[cfg(not(unix))]
fn resume_process(_pid: u32) -> Result<()> {
    Err(Error::SuspendUnsupported)
}

/// State shared between the worker thread and the control operations.
pub(crate) struct SharedState {
    child: Mutex<Option<Child>>,
    cleanup_target: Mutex<Option<PathBuf>>,
    paused: AtomicBool,
    stop_requested: AtomicBool,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            child: Mutex::new(None),
            cleanup_target: Mutex::new(None),
            paused: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
        }
    }

    fn lock_child(&self) -> MutexGuard<'_, Option<Child>> {
        // A poisoned lock still holds a usable handle
        self.child.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_cleanup_target(&self) -> MutexGuard<'_, Option<PathBuf>> {
        self.cleanup_target
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn store_child(&self, child: Child) {
        let mut guard = self.lock_child();
        *guard = Some(child);

        // terminate() sets the stop flag before taking this lock, so a stop
        // request that arrived between the spawn and this store is caught
        // here: the just-stored child must not run to completion.
        if self.stop_requested.load(Ordering::SeqCst) {
            if let Some(child) = guard.as_mut() {
                if let Err(e) = child.kill() {
                    warn!("Failed to kill process {}: {e}", child.id());
                }
            }
        }
    }

    pub(crate) fn take_child(&self) -> Option<Child> {
        self.lock_child().take()
    }

    pub(crate) fn set_cleanup_target(&self, target: Option<PathBuf>) {
        *self.lock_cleanup_target() = target;
    }

    /// Clears the tracked output path so a later stop can never delete a
    /// completed file.
    pub(crate) fn clear_cleanup_target(&self) {
        *self.lock_cleanup_target() = None;
    }

    pub(crate) fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Suspends the running child process. The monitoring loop keeps
    /// blocking on the (now silent) diagnostic stream; only the child's own
    /// work stops.
    pub(crate) fn suspend(&self) -> Result<()> {
        let guard = self.lock_child();
        let child = guard.as_ref().ok_or(Error::NoActiveProcess)?;

        if self.paused.load(Ordering::SeqCst) {
            return Err(Error::AlreadyPaused);
        }

        suspend_process(child.id())?;
        self.paused.store(true, Ordering::SeqCst);
        info!("Suspended process {}", child.id());
        Ok(())
    }

    /// Resumes a previously suspended child process.
    pub(crate) fn resume(&self) -> Result<()> {
        let guard = self.lock_child();
        let child = guard.as_ref().ok_or(Error::NoActiveProcess)?;

        if !self.paused.load(Ordering::SeqCst) {
            return Err(Error::NotPaused);
        }

        resume_process(child.id())?;
        self.paused.store(false, Ordering::SeqCst);
        info!("Resumed process {}", child.id());
        Ok(())
    }

    /// Requests a stop and forcibly terminates the in-flight child, if any.
    ///
    /// A suspended process is resumed before being killed: terminating a
    /// stopped process can leave it unreaped on some platforms.
    pub(crate) fn terminate(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);

        let mut guard = self.lock_child();
        if let Some(child) = guard.as_mut() {
            if self.paused.swap(false, Ordering::SeqCst) {
                if let Err(e) = resume_process(child.id()) {
                    warn!("Failed to resume process {} before termination: {e}", child.id());
                }
            }

            if let Err(e) = child.kill() {
                warn!("Failed to kill process {}: {e}", child.id());
            }
        }
    }

    /// Deletes the tracked partial output file, if one is still tracked and
    /// present on disk. Best-effort: deletion failure is logged, never
    /// raised.
    pub(crate) fn remove_partial_output(&self) {
        let Some(path) = self.lock_cleanup_target().take() else {
            return;
        };

        if !path.exists() {
            return;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => info!("Removed partial output file `{}`", path.display()),
            Err(e) => warn!(
                "Failed to remove partial output file `{}`: {e}",
                path.display()
            ),
        }
    }
}
