//! External editor integration for record bodies.

use std::env;
use std::fs;
use std::path::Path;
use std::process::{self, Command};

use crate::error::{Result, SigformError};

/// Gets the editor command from the environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(editor) = env::var("VISUAL") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(SigformError::Editor(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|e| SigformError::Editor(format!("Failed to launch editor '{editor}': {e}")))?;

    if !status.success() {
        return Err(SigformError::Editor(format!(
            "Editor '{editor}' exited with non-zero status"
        )));
    }

    Ok(fs::read_to_string(path)?)
}

/// Opens the editor on a body buffer and returns the edited text.
pub fn edit_body(initial: &str) -> Result<String> {
    let temp_file = env::temp_dir().join(buffer_name());
    fs::write(&temp_file, initial)?;

    let result = open_in_editor(&temp_file);

    let _ = fs::remove_file(&temp_file);
    result
}

/// Buffer file name under the shared temp dir. Carries the process id;
/// concurrent invocations must not share a buffer.
fn buffer_name() -> String {
    format!("sigform_body_{}.txt", process::id())
}
