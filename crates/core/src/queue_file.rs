//! Queue file loading and validation.
//!
//! A queue file is a YAML document holding an ordered list of argument
//! lists, one per FFmpeg invocation:
//!
//! ```yaml
//! - ["-i", "a.mkv", "a.mp4"]
//! - ["-i", "b.mkv", "-c:v", "libx264", "b.mp4"]
//! ```

use std::fs::File;

use crate::command::CommandQueue;
use crate::error::{Error, Result};

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

fn validate_queue(queue: &CommandQueue, path: &str) -> Result<()> {
    if queue.is_empty() {
        return Err(Error::empty_queue(path.to_string()));
    }

    for (index, command) in queue.iter().enumerate() {
        if command.is_empty() {
            return Err(Error::EmptyCommand(index + 1));
        }
    }

    Ok(())
}

/// Loads and validates a command queue from a YAML queue file.
///
/// # Errors
///
/// Returns an error if:
/// - The queue file cannot be read
/// - The YAML is malformed or doesn't match the expected structure
/// - The queue file is empty
/// - Any queue entry has no argument tokens
pub fn load_queue(queue_path: &String) -> Result<CommandQueue> {
    let queue_reader = get_reader("queue", queue_path)?;

    let parsing_result: serde_yaml::Result<CommandQueue> = serde_yaml::from_reader(queue_reader);

    let queue = parsing_result.map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "queue".to_string(),
            queue_path.clone(),
            e,
        )
    })?;

    validate_queue(&queue, queue_path)?;

    Ok(queue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_queue_valid_yaml() {
        let yaml_content = r#"
- ["-i", "a.mkv", "a.mp4"]
- ["-i", "b.mkv", "-c:v", "libx264", "b.mp4"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{yaml_content}").unwrap();
        let temp_path = temp_file.path().to_str().unwrap().to_string();

        let queue = load_queue(&temp_path).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].args, vec!["-i", "a.mkv", "a.mp4"]);
        assert_eq!(queue[1].args[3], "libx264");
    }

    #[test]
    fn test_load_queue_empty_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[]").unwrap();
        let temp_path = temp_file.path().to_str().unwrap().to_string();

        let result = load_queue(&temp_path);
        assert!(matches!(result, Err(Error::EmptyQueue { .. })));
    }

    #[test]
    fn test_load_queue_empty_entry() {
        let yaml_content = r#"
- ["-i", "a.mkv", "a.mp4"]
- []
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{yaml_content}").unwrap();
        let temp_path = temp_file.path().to_str().unwrap().to_string();

        let result = load_queue(&temp_path);
        assert!(matches!(result, Err(Error::EmptyCommand(2))));
    }

    #[test]
    fn test_load_queue_invalid_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "invalid: yaml: content: [").unwrap();
        let temp_path = temp_file.path().to_str().unwrap().to_string();

        let result = load_queue(&temp_path);
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }

    #[test]
    fn test_load_queue_file_not_found() {
        let nonexistent_path = "/this/path/does/not/exist.yml".to_string();
        let result = load_queue(&nonexistent_path);
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
