//! Message scripts
//!
//! A script is the ordered list of command messages one session sends. The
//! built-in default script is the harness's standard fixture; integrators can
//! substitute their own as a JSON array of message strings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// The fixture sent when no script file is supplied: vehicle registration
/// commands exercising add, show, transfer and location updates, with a tail
/// of malformed entries the device is expected to reject.
const DEFAULT_MESSAGES: &[&str] = &[
    "A-GR04XFB-C-GranbySt.",
    "A-GF57XWD-B-BeehiveLane",
    "A-BD51SMR-V-BrownsLane",
    "S-GR04XFB-PD",
    "T-GR04XFB-B",
    "L-GF57XWD-Southfield",
    "S-GF57XWD-1",
    "L-CU57ABC-BeehiveLane",
    "L-GR04XFB-BrownsLane",
    "S-BD51SMR-PD",
    "L-BD51SMR-BrownsLane",
    "A-CU57ABC-C-BedfordSquare",
    "A-CU57ABC-BedfordSq.",
    "A-CU57ABC-C-BedfordSquare",
    "A-CU57ABC-C-",
    "A-CU57ABC-M-BedfordSq.",
    "A-GR04XFB-B-BrownsLane",
    "Z-GR04XFB-BrownsLane",
    "ACU57ABC-V-BrownsLane",
    "A-GF23WSN- L- BrownsLane",
];

/// Errors from loading a script file
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Script file is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An ordered message sequence for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    name: String,
    messages: Vec<String>,
}

impl Script {
    /// Build a script from explicit messages
    pub fn new(name: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            name: name.into(),
            messages,
        }
    }

    /// Parse a script from JSON text (an array of message strings)
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, ScriptError> {
        let messages: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::new(name, messages))
    }

    /// Load a script from a JSON file containing an array of message strings
    ///
    /// The script is named after the file stem.
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "script".to_string());
        let text = fs::read_to_string(path)?;
        Self::from_json(name, &text)
    }

    /// Display name of the script
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages in send order
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Number of messages in the script
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the script has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new(
            "default",
            DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_script_fixture() {
        let script = Script::default();
        assert_eq!(script.name(), "default");
        assert_eq!(script.len(), 20);
        assert_eq!(script.messages()[0], "A-GR04XFB-C-GranbySt.");
        assert_eq!(script.messages()[19], "A-GF23WSN- L- BrownsLane");
    }

    #[test]
    fn test_from_json() {
        let script = Script::from_json("mini", r#"["A-1", "B-2"]"#).unwrap();
        assert_eq!(script.messages(), &["A-1".to_string(), "B-2".to_string()]);
        assert!(!script.is_empty());
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(Script::from_json("bad", r#"{"not": "a list"}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        file.write_all(br#"["S-GR04XFB-PD"]"#).unwrap();

        let script = Script::from_file(file.path()).unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script.messages()[0], "S-GR04XFB-PD");
    }

    #[test]
    fn test_from_file_missing() {
        let err = Script::from_file(Path::new("/nonexistent/script.json"));
        assert!(matches!(err, Err(ScriptError::Io(_))));
    }
}
