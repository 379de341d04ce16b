//! Entity recognizer backed by an external command.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use papiers_core::{Entity, EntityRecognizer, RecognizerError};

/// Runs a recognizer command per call: the text goes to its stdin and a
/// JSON array of `{"text", "label"}` objects is read from its stdout.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Build from an argv list; `None` when the list is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl EntityRecognizer for CommandRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RecognizerError::Unavailable(format!("{}: {}", self.program, e)))?;

        // Stdin is fed from its own thread while stdout and stderr drain.
        // The child is always waited on.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output.map_err(|e| RecognizerError::Failed(e.to_string()))?;

        if !output.status.success() {
            return Err(RecognizerError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        match written {
            // The command may answer without consuming all of its input
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                return Err(RecognizerError::Failed(format!("writing to {}: {}", self.program, e)));
            }
            _ => {}
        }

        let entities: Vec<Entity> = serde_json::from_slice(&output.stdout)
            .map_err(|e| RecognizerError::MalformedOutput(e.to_string()))?;
        debug!("Recognizer returned {} entities", entities.len());
        Ok(entities)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandRecognizer {
        CommandRecognizer::from_argv(&["sh".to_string(), "-c".to_string(), script.to_string()])
            .unwrap()
    }

    #[test]
    fn test_empty_argv() {
        assert!(CommandRecognizer::from_argv(&[]).is_none());
    }

    #[test]
    fn test_parses_entities() {
        let recognizer = sh(r#"cat > /dev/null; echo '[{"text":"Jean Dupont","label":"PER"},{"text":"Lyon","label":"LOC"}]'"#);
        let persons = recognizer.persons("Jean Dupont habite Lyon");
        assert_eq!(persons, vec![Entity::new("Jean Dupont", "PER")]);
    }

    #[test]
    fn test_large_input_with_early_output() {
        // Writes more than a pipe buffer before reading any input
        let recognizer = sh(r#"printf '['; head -c 200000 /dev/zero | tr '\0' ' '; cat > /dev/null; printf ']'"#);
        let text = "a".repeat(200_000);
        assert_eq!(recognizer.recognize(&text).unwrap(), Vec::<Entity>::new());
    }

    #[test]
    fn test_command_ignoring_stdin() {
        let recognizer = sh(r#"echo '[{"text":"Jean Dupont","label":"PER"}]'"#);
        let text = "a".repeat(200_000);
        assert_eq!(recognizer.recognize(&text).unwrap(), vec![Entity::new("Jean Dupont", "PER")]);
    }

    #[test]
    fn test_failures_are_errors() {
        assert!(matches!(
            sh("cat > /dev/null; echo not json").recognize("x"),
            Err(RecognizerError::MalformedOutput(_))
        ));
        assert!(matches!(
            sh("cat > /dev/null; exit 3").recognize("x"),
            Err(RecognizerError::Failed(_))
        ));
        let missing = CommandRecognizer::from_argv(&["papiers-no-such-recognizer".to_string()]).unwrap();
        assert!(matches!(missing.recognize("x"), Err(RecognizerError::Unavailable(_))));
        assert!(missing.persons("x").is_empty());
    }
}
