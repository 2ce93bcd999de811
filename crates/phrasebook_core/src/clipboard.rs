//! System clipboard boundary.
//!
//! # Responsibility
//! - Define the write-only clipboard contract used by the builder copy action.
//! - Ship an OS command-backed implementation (pbcopy, xclip/xsel, clip).

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::process::{Child, Command, Stdio};

#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard command is available on this platform.
    Unsupported,
    /// Spawning or feeding the clipboard command failed.
    Io {
        command: &'static str,
        source: std::io::Error,
    },
    /// Clipboard command exited unsuccessfully.
    CommandFailed(&'static str),
}

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "clipboard not supported on this platform"),
            Self::Io { command, source } => {
                write!(f, "clipboard command `{command}` failed: {source}")
            }
            Self::CommandFailed(command) => {
                write!(f, "clipboard command `{command}` exited with error")
            }
        }
    }
}

impl Error for ClipboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard that pipes text into the platform clipboard command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        #[cfg(target_os = "macos")]
        {
            pipe_into("pbcopy", spawn("pbcopy", &[])?, text)
        }

        #[cfg(target_os = "linux")]
        {
            match spawn("xclip", &["-selection", "clipboard"]) {
                Ok(child) => pipe_into("xclip", child, text),
                Err(_) => pipe_into("xsel", spawn("xsel", &["--clipboard", "--input"])?, text),
            }
        }

        #[cfg(target_os = "windows")]
        {
            pipe_into("clip", spawn("clip", &[])?, text)
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            let _ = text;
            Err(ClipboardError::Unsupported)
        }
    }
}

#[allow(dead_code)]
fn spawn(command: &'static str, args: &[&str]) -> Result<Child, ClipboardError> {
    Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|source| ClipboardError::Io { command, source })
}

#[allow(dead_code)]
fn pipe_into(command: &'static str, mut child: Child, text: &str) -> Result<(), ClipboardError> {
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|source| ClipboardError::Io { command, source })?;
    }

    let status = child
        .wait()
        .map_err(|source| ClipboardError::Io { command, source })?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(command))
    }
}

/// In-memory clipboard that records every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    writes: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.push(text.to_string());
        Ok(())
    }
}

impl<C: Clipboard + ?Sized> Clipboard for &mut C {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clipboard, MemoryClipboard};

    fn copy_twice(clipboard: &mut impl Clipboard) {
        clipboard.write_text("first").unwrap();
        clipboard.write_text("second").unwrap();
    }

    #[test]
    fn memory_clipboard_keeps_every_write() {
        let mut clipboard = MemoryClipboard::new();
        copy_twice(&mut &mut clipboard);
        assert_eq!(clipboard.writes(), ["first", "second"]);
        assert_eq!(clipboard.last(), Some("second"));
    }
}
