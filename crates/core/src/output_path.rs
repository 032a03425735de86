//! Output collision handling.
//!
//! FFmpeg overwrites (or prompts over) existing output files. Before a
//! command is spawned, the queue executor identifies its output argument and
//! rewrites it to a unique path if a file already exists there.

use std::path::{Path, PathBuf};

use log::info;

use crate::command::Command;

/// Flag that marks the following token as an input path
const INPUT_FLAG: &str = "-i";

/// Destinations that are not regular files and must never be rewritten
const SINK_PREFIXES: &[&str] = &["pipe:", "udp:", "rtp:", "tcp:", "rtmp:"];

fn is_sink(token: &str) -> bool {
    token == "-" || SINK_PREFIXES.iter().any(|prefix| token.starts_with(prefix))
}

/// Heuristic output detection: scan the arguments backwards for the first
/// token that is neither a flag nor an input path. A bare `-` is the stdout
/// marker, not a flag, so it stays a candidate (and is later excluded as a
/// sink rather than shifting detection onto an earlier token).
fn find_output_index(args: &[String]) -> Option<usize> {
    for index in (0..args.len()).rev() {
        let arg = &args[index];

        if arg.len() > 1 && arg.starts_with('-') {
            continue;
        }

        if index > 0 && args[index - 1] == INPUT_FLAG {
            continue;
        }

        return Some(index);
    }

    None
}

/// Returns `path` unchanged if nothing exists there, otherwise the first
/// free `name_N.ext` variant for the smallest `N >= 1`.
fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|ext| ext.to_string_lossy().into_owned());
    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut counter = 1;
    loop {
        let file_name = match &extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };

        let candidate = parent.join(file_name);
        if !candidate.exists() {
            return candidate;
        }

        counter += 1;
    }
}

/// Resolves the output argument of a command against existing files.
///
/// Returns a possibly-rewritten copy of the command plus the tracked output
/// path, or `None` when no rewritable output argument is identifiable (no
/// candidate token, or the destination is a sink).
///
/// Resolving a command whose output path is already unique returns it
/// unchanged, so resolution is idempotent.
pub fn resolve_collision(command: &Command) -> (Command, Option<PathBuf>) {
    let Some(output_index) = find_output_index(&command.args) else {
        return (command.clone(), None);
    };

    let original = &command.args[output_index];
    if is_sink(original) {
        return (command.clone(), None);
    }

    let resolved = unique_path(Path::new(original));
    if resolved == Path::new(original) {
        return (command.clone(), Some(resolved));
    }

    info!(
        "Output file `{}` exists; renaming to `{}` to avoid overwrite",
        original,
        resolved.display()
    );

    let mut rewritten = command.clone();
    rewritten.args[output_index] = resolved.to_string_lossy().into_owned();
    (rewritten, Some(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn test_find_output_index_simple() {
        let args: Vec<String> = ["-i", "in.mp4", "out.mp4"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(find_output_index(&args), Some(2));
    }

    #[test]
    fn test_find_output_index_skips_trailing_flags() {
        let args: Vec<String> = ["-i", "in.mp4", "out.mp4", "-y"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(find_output_index(&args), Some(2));
    }

    #[test]
    fn test_find_output_index_skips_input_path() {
        let args: Vec<String> = ["-i", "in.mp4"].iter().map(ToString::to_string).collect();
        assert_eq!(find_output_index(&args), None);
    }

    #[test]
    fn test_find_output_index_stdout_marker_is_candidate() {
        let args: Vec<String> = ["-i", "in.mp4", "-f", "rawvideo", "-"]
            .iter()
            .map(ToString::to_string)
            .collect();
        // The stdout marker must win over earlier non-flag tokens, so that
        // detection never rewrites a codec name or similar.
        assert_eq!(find_output_index(&args), Some(4));
    }

    #[test]
    fn test_resolve_nonexistent_path_unchanged() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        let command = Command::new(["-i", "in.mp4", output.to_str().unwrap()]);

        let (resolved, tracked) = resolve_collision(&command);
        assert_eq!(resolved, command);
        assert_eq!(tracked, Some(output));
    }

    #[test]
    fn test_resolve_existing_path_appends_suffix() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        touch(&output);
        let command = Command::new(["-i", "in.mp4", output.to_str().unwrap()]);

        let (resolved, tracked) = resolve_collision(&command);
        let expected = dir.path().join("out_1.mp4");
        assert_eq!(resolved.args[2], expected.to_str().unwrap());
        assert_eq!(tracked, Some(expected));
        assert!(!tracked.unwrap().exists());
    }

    #[test]
    fn test_resolve_picks_smallest_free_suffix() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        touch(&output);
        touch(&dir.path().join("out_1.mp4"));
        touch(&dir.path().join("out_2.mp4"));
        let command = Command::new(["-i", "in.mp4", output.to_str().unwrap()]);

        let (resolved, _) = resolve_collision(&command);
        assert_eq!(
            resolved.args[2],
            dir.path().join("out_3.mp4").to_str().unwrap()
        );
    }

    #[test]
    fn test_resolve_without_extension() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("capture");
        touch(&output);
        let command = Command::new(["-i", "in.mp4", output.to_str().unwrap()]);

        let (resolved, _) = resolve_collision(&command);
        assert_eq!(
            resolved.args[2],
            dir.path().join("capture_1").to_str().unwrap()
        );
    }

    #[test]
    fn test_sinks_are_never_rewritten() {
        for sink in ["-", "pipe:1", "udp://127.0.0.1:1234", "rtmp://host/live"] {
            let command = Command::new(["-i", "in.mp4", "-f", "mpegts", sink]);
            let (resolved, tracked) = resolve_collision(&command);
            assert_eq!(resolved, command, "sink `{sink}` was rewritten");
            assert_eq!(tracked, None);
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        touch(&output);
        let command = Command::new(["-i", "in.mp4", output.to_str().unwrap()]);

        let (first, _) = resolve_collision(&command);
        let (second, _) = resolve_collision(&first);
        assert_eq!(first, second);
    }
}
