//! Host clipboard backends.
//!
//! The system clipboard via `arboard` is tried first. Terminals reached
//! over SSH usually have no system clipboard, so the OSC 52 escape
//! sequence is the fallback.

use std::io::Write;

use base64::Engine;
use statute_types::{Result, ViewerError};
use statute_viewer::{ClipboardBackend, ClipboardChain};

/// The system clipboard. Opened on first write and kept open afterwards.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardBackend for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ViewerError::Clipboard(format!("system clipboard: {e}")))?;
            self.inner = Some(clipboard);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ViewerError::Clipboard("system clipboard unavailable".into()));
        };
        clipboard
            .set_text(text)
            .map_err(|e| ViewerError::Clipboard(format!("system clipboard: {e}")))
    }
}

/// Terminal clipboard via the OSC 52 escape sequence on stdout.
pub struct Osc52Clipboard;

impl ClipboardBackend for Osc52Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", osc52_sequence(text))?;
        stdout.flush()?;
        Ok(())
    }
}

/// `ESC ] 52 ; c ; <base64> ESC \`
fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// System clipboard first, terminal clipboard second.
pub fn host_chain() -> ClipboardChain {
    ClipboardChain::new(Box::new(SystemClipboard::default())).with_fallback(Box::new(Osc52Clipboard))
}
