//! Output surface the core writes human-readable state into.
//!
//! The browser implementation lives in `overlay.rs`; tests use a recorder.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Pointer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    /// Idle, ready to enter AR.
    Ready,
    Ok,
    Error,
}

pub trait UiSurface {
    /// Tooltip next to the pointer at client pixel position (`x`, `y`).
    fn show_tooltip(&mut self, text: &str, x: f32, y: f32);
    fn hide_tooltip(&mut self);
    fn set_cursor(&mut self, cursor: CursorHint);
    /// Transient banner.
    fn notify(&mut self, message: &str);
    fn set_ar_status(&mut self, text: &str, tone: StatusTone);
    fn set_auto_rotate_button(&mut self, rotating: bool);
    /// Swap between the desktop control layout and the compact AR one.
    fn set_ar_layout(&mut self, in_ar: bool);
    fn copy_to_clipboard(&mut self, _text: &str) {}
    fn open_url(&mut self, _url: &str) {}
}

/// Everything written to the UI, in order. Used by tests and headless runs.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Tooltip { text: String, x: f32, y: f32 },
    TooltipHidden,
    Cursor(CursorHint),
    Notification(String),
    ArStatus { text: String, tone: StatusTone },
    AutoRotateButton(bool),
    ArLayout(bool),
    Clipboard(String),
    OpenUrl(String),
}

/// Shares its log between clones, so a test can keep one handle and give
/// the other to the app.
#[derive(Clone, Debug, Default)]
pub struct RecordingUi {
    log: Rc<RefCell<Vec<UiEvent>>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: UiEvent) {
        self.log.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.log.borrow().clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Notification(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<(String, StatusTone)> {
        self.log.borrow().iter().rev().find_map(|e| match e {
            UiEvent::ArStatus { text, tone } => Some((text.clone(), *tone)),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl UiSurface for RecordingUi {
    fn show_tooltip(&mut self, text: &str, x: f32, y: f32) {
        self.push(UiEvent::Tooltip {
            text: text.to_string(),
            x,
            y,
        });
    }
    fn hide_tooltip(&mut self) {
        self.push(UiEvent::TooltipHidden);
    }
    fn set_cursor(&mut self, cursor: CursorHint) {
        self.push(UiEvent::Cursor(cursor));
    }
    fn notify(&mut self, message: &str) {
        self.push(UiEvent::Notification(message.to_string()));
    }
    fn set_ar_status(&mut self, text: &str, tone: StatusTone) {
        self.push(UiEvent::ArStatus {
            text: text.to_string(),
            tone,
        });
    }
    fn set_auto_rotate_button(&mut self, rotating: bool) {
        self.push(UiEvent::AutoRotateButton(rotating));
    }
    fn set_ar_layout(&mut self, in_ar: bool) {
        self.push(UiEvent::ArLayout(in_ar));
    }
    fn copy_to_clipboard(&mut self, text: &str) {
        self.push(UiEvent::Clipboard(text.to_string()));
    }
    fn open_url(&mut self, url: &str) {
        self.push(UiEvent::OpenUrl(url.to_string()));
    }
}
