//! Popup session state and the handlers bound to each user action.
//!
//! The controller owns no threads and performs no I/O except through the
//! [`Clipboard`] it is given. Translation is split into
//! [`begin_translate`](PopupController::begin_translate) and
//! [`finish_translate`](PopupController::finish_translate) so a front-end can
//! run the request elsewhere and hand the outcome back on its own thread.

use std::time::{Duration, Instant};

use crate::client::{TranslationRequest, TranslationResponse};
#[cfg(test)]
use crate::client::TranslationBackend;
use crate::clipboard::Clipboard;
use crate::direction::{Direction, TextLayout};
use crate::error::TranslateError;

pub const CHAR_WARNING_THRESHOLD: usize = 1000;
pub const COPY_FLASH: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Neutral,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub translate_enabled: bool,
    pub clear_enabled: bool,
    pub swap_enabled: bool,
    pub copy_enabled: bool,
    pub translate_busy: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            translate_enabled: true,
            clear_enabled: true,
            swap_enabled: true,
            copy_enabled: false,
            translate_busy: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharCount {
    pub label: String,
    pub warning: bool,
}

impl CharCount {
    fn of(text: &str) -> Self {
        let n = text.chars().count();
        Self {
            label: format!("{} characters", n),
            warning: n > CHAR_WARNING_THRESHOLD,
        }
    }
}

/// Everything a popup shows; reset whenever the popup opens.
#[derive(Debug, Clone)]
struct Session {
    direction: Direction,
    input: String,
    output: String,
    input_layout: TextLayout,
    output_layout: TextLayout,
    controls: Controls,
    char_count: CharCount,
    status: Status,
    copy_flash_until: Option<Instant>,
}

impl Default for Session {
    fn default() -> Self {
        let direction = Direction::default();
        let (input_layout, output_layout) = direction.layouts();
        Self {
            direction,
            input: String::new(),
            output: String::new(),
            input_layout,
            output_layout,
            controls: Controls::default(),
            char_count: CharCount::of(""),
            status: Status { message: "Ready to translate".into(), kind: StatusKind::Neutral },
            copy_flash_until: None,
        }
    }
}

pub struct PopupController<C> {
    session: Session,
    clipboard: C,
}

impl<C: Clipboard> PopupController<C> {
    pub fn new(clipboard: C) -> Self {
        Self { session: Session::default(), clipboard }
    }

    pub fn direction(&self) -> Direction {
        self.session.direction
    }

    /// Direct access for text widgets; call [`update_character_count`](Self::update_character_count)
    /// after edits.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.session.input
    }

    pub fn output(&self) -> &str {
        &self.session.output
    }

    pub fn layouts(&self) -> (TextLayout, TextLayout) {
        (self.session.input_layout, self.session.output_layout)
    }

    pub fn controls(&self) -> Controls {
        self.session.controls
    }

    pub fn char_count(&self) -> &CharCount {
        &self.session.char_count
    }

    pub fn status(&self) -> &Status {
        &self.session.status
    }

    pub fn is_busy(&self) -> bool {
        self.session.controls.translate_busy
    }

    fn show_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.session.status = Status { message: message.into(), kind };
    }

    pub fn update_character_count(&mut self) {
        self.session.char_count = CharCount::of(&self.session.input);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.session.direction = direction;
        let (input_layout, output_layout) = direction.layouts();
        self.session.input_layout = input_layout;
        self.session.output_layout = output_layout;
        tracing::debug!("Direction set to {:?}", direction);
        self.show_status("Mode changed", StatusKind::Success);
    }

    pub fn select_example(&mut self, text: &str) {
        self.session.input = text.to_string();
        self.update_character_count();
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.session.controls.translate_enabled = enabled;
        self.session.controls.clear_enabled = enabled;
        self.session.controls.swap_enabled = enabled;
        self.session.controls.translate_busy = !enabled;
    }

    /// Validates the input and moves the popup into its busy state. Returns
    /// the request to send, or `None` if nothing should be sent. Every `Some`
    /// must be answered by exactly one [`finish_translate`](Self::finish_translate).
    pub fn begin_translate(&mut self) -> Option<TranslationRequest> {
        if !self.session.controls.translate_enabled {
            tracing::debug!("Translate ignored: control disabled");
            return None;
        }
        let text = self.session.input.trim();
        if text.is_empty() {
            self.show_status(TranslateError::Validation.to_string(), StatusKind::Error);
            return None;
        }
        let prompt = self.session.direction.build_prompt(text);
        tracing::info!("Translating {} chars ({:?})", text.chars().count(), self.session.direction);

        self.set_controls_enabled(false);
        self.show_status("Translating...", StatusKind::Loading);
        self.session.output.clear();
        self.session.controls.copy_enabled = false;

        Some(TranslationRequest { text: prompt })
    }

    /// Renders the outcome of the request handed out by `begin_translate`
    /// and releases the controls.
    pub fn finish_translate(&mut self, result: Result<TranslationResponse, TranslateError>) {
        if !self.session.controls.translate_busy {
            tracing::warn!("Dropping translation result: no request in flight");
            return;
        }
        match result {
            Ok(resp) => {
                tracing::info!(
                    "Translation success (mode {}, original echoed: {})",
                    resp.mode,
                    resp.original.is_some()
                );
                self.session.output = resp.translation;
                self.session.controls.copy_enabled = true;
                self.show_status(format!("✓ Translation succeeded ({})", resp.mode), StatusKind::Success);
            }
            Err(e) => {
                tracing::warn!("Translation error: {:?}", e);
                self.show_status(format!("✗ Error: {}", e), StatusKind::Error);
            }
        }
        self.set_controls_enabled(true);
    }

    #[cfg(test)]
    pub async fn translate(&mut self, backend: &dyn TranslationBackend) {
        let Some(request) = self.begin_translate() else {
            return;
        };
        let result = backend.translate(request).await;
        self.finish_translate(result);
    }

    pub fn clear_all(&mut self) {
        self.session.input.clear();
        self.session.output.clear();
        self.session.controls.copy_enabled = false;
        self.update_character_count();
        self.show_status("Ready to translate", StatusKind::Neutral);
    }

    pub fn swap_languages(&mut self) {
        std::mem::swap(&mut self.session.input, &mut self.session.output);
        self.set_direction(self.session.direction.opposite());
        self.update_character_count();
        self.show_status("↔ Languages swapped", StatusKind::Success);
    }

    pub fn copy_to_clipboard(&mut self, now: Instant) {
        if self.session.output.is_empty() {
            return;
        }
        match self.clipboard.write_text(&self.session.output) {
            Ok(()) => {
                self.show_status("✓ Text copied", StatusKind::Success);
                self.session.copy_flash_until = Some(now + COPY_FLASH);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.show_status("✗ Copy failed", StatusKind::Error);
            }
        }
    }

    /// Whether the copy control should still show its flash colour. Clears the
    /// flash once the interval has passed.
    pub fn copy_flashing(&mut self, now: Instant) -> bool {
        match self.session.copy_flash_until {
            Some(until) if now < until => true,
            Some(_) => {
                self.session.copy_flash_until = None;
                false
            }
            None => false,
        }
    }
}
