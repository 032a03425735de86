use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Executable not found at `{}`", .path)]
    ExecutableNotFound { path: String },

    #[error("Error spawning `{}`: {}", .path, .original)]
    Spawn {
        path: String,
        original: std::io::Error,
    },

    #[error("Error reading process output: {}", .0)]
    Stream(#[from] std::io::Error),

    #[error("Error sending signal to process {}: {}", .pid, .original)]
    Signal {
        pid: u32,
        original: std::io::Error,
    },

    #[error("Suspending processes is not supported on this platform.")]
    SuspendUnsupported,

    #[error("No process is currently running.")]
    NoActiveProcess,

    #[error("The process is already paused.")]
    AlreadyPaused,

    #[error("The process is not paused.")]
    NotPaused,

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("No commands were found in the queue file. Is `{}` empty?", .path)]
    EmptyQueue { path: String },

    #[error("Queue entry {} has no arguments.", .0)]
    EmptyCommand(usize),
}

impl Error {
    pub fn empty_queue(path: String) -> Self {
        Self::EmptyQueue { path }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}
