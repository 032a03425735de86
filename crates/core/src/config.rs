//! Configuration path utilities for ffqueue.
//!
//! This module resolves the FFmpeg executable path and the default queue
//! file path, expanding shell variables like `~` in paths.

/// Default FFmpeg executable, resolved through `PATH`
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
/// Default path for the queue file
const DEFAULT_QUEUE_PATH: &str = "~/.ffqueue/queue.yml";

/// Resolves the FFmpeg executable path.
///
/// If a custom path is provided, uses that path (with shell expansions like
/// `~` resolved). Otherwise, falls back to plain `ffmpeg` so the system
/// `PATH` lookup applies.
pub fn get_ffmpeg_path(ffmpeg_path_arg: &Option<String>) -> String {
    let ffmpeg_path = match ffmpeg_path_arg {
        Some(ffmpeg_path) => ffmpeg_path,
        None => DEFAULT_FFMPEG_PATH,
    };

    shellexpand::tilde(ffmpeg_path).to_string()
}

/// Resolves the queue file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// queue path. Shell expansions like `~` are resolved.
pub fn get_queue_path(queue_path_arg: &Option<String>) -> String {
    let queue_path = match queue_path_arg {
        Some(queue_path) => queue_path,
        None => DEFAULT_QUEUE_PATH,
    };

    shellexpand::tilde(queue_path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_ffmpeg_path_with_custom_path() {
        let custom_path = Some("/opt/ffmpeg/bin/ffmpeg".to_string());
        let result = get_ffmpeg_path(&custom_path);
        assert_eq!(result, "/opt/ffmpeg/bin/ffmpeg");
    }

    #[test]
    fn test_get_ffmpeg_path_with_none() {
        let result = get_ffmpeg_path(&None);
        assert_eq!(result, "ffmpeg");
    }

    #[test]
    fn test_get_ffmpeg_path_with_tilde() {
        let tilde_path = Some("~/bin/ffmpeg".to_string());
        let result = get_ffmpeg_path(&tilde_path);
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("bin/ffmpeg"));
    }

    #[test]
    fn test_get_queue_path_with_custom_path() {
        let custom_path = Some("/custom/queue.yml".to_string());
        let result = get_queue_path(&custom_path);
        assert_eq!(result, "/custom/queue.yml");
    }

    #[test]
    fn test_get_queue_path_with_none() {
        let result = get_queue_path(&None);
        // Should expand the tilde in the default path
        assert!(result.contains("queue.yml"));
        assert!(!result.starts_with('~'));
    }
}
