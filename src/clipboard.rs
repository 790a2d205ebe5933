use crate::error::ClipboardError;

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard. On X11 the contents only survive while the `arboard`
/// handle lives, so it is opened once and kept.
#[derive(Default)]
pub struct SystemClipboard {
    #[cfg(not(windows))]
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        #[cfg(windows)]
        {
            clipboard_win::set_clipboard_string(text).map_err(|e| ClipboardError(e.to_string()))
        }
        #[cfg(not(windows))]
        {
            let clipboard = match self.inner.as_mut() {
                Some(cb) => cb,
                None => self.inner.insert(arboard::Clipboard::new()?),
            };
            clipboard.set_text(text.to_owned())?;
            Ok(())
        }
    }
}
