//! Host text field seam.
//!
//! The router never owns the text the user is editing. It talks to whatever
//! field currently has focus through `HostField`, which mirrors the small set
//! of edit operations a platform input connection offers. Every operation
//! reports whether the host accepted it.

use std::cell::RefCell;
use std::rc::Rc;

/// Input purpose hint supplied by the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPurpose {
    /// Free-form text input
    #[default]
    FreeForm,
    /// Email address
    Email,
    /// URL
    Url,
    /// Number input
    Number,
    /// Phone number
    Phone,
    /// Password (no composing, no suggestions)
    Password,
    /// Password field inside a web view
    WebPassword,
    /// Password shown in clear text
    VisiblePassword,
}

impl InputPurpose {
    /// Whether text must go straight to the field without composing.
    pub fn is_password(self) -> bool {
        matches!(
            self,
            InputPurpose::Password | InputPurpose::WebPassword | InputPurpose::VisiblePassword
        )
    }
}

/// Keys sent to the host as key events rather than text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Delete,
}

/// A focused text field.
pub trait HostField {
    fn input_purpose(&self) -> InputPurpose;

    /// Replace any composing region with `text` and move past it.
    fn commit_text(&mut self, text: &str) -> bool;

    /// Replace the composing region with `text`, or start one at the cursor.
    fn set_composing_text(&mut self, text: &str) -> bool;

    /// Keep the composing text as ordinary text.
    fn finish_composing_text(&mut self) -> bool;

    /// Delete `before` chars before the cursor and `after` chars after it.
    fn delete_surrounding(&mut self, before: usize, after: usize) -> bool;

    fn send_key(&mut self, key: KeyCode) -> bool;

    /// Up to `n` chars immediately before the cursor.
    fn text_before_cursor(&self, n: usize) -> String;
}

// Shared handle so a caller can keep inspecting a field the router owns.
impl<T: HostField> HostField for Rc<RefCell<T>> {
    fn input_purpose(&self) -> InputPurpose {
        self.borrow().input_purpose()
    }
    fn commit_text(&mut self, text: &str) -> bool {
        self.borrow_mut().commit_text(text)
    }
    fn set_composing_text(&mut self, text: &str) -> bool {
        self.borrow_mut().set_composing_text(text)
    }
    fn finish_composing_text(&mut self) -> bool {
        self.borrow_mut().finish_composing_text()
    }
    fn delete_surrounding(&mut self, before: usize, after: usize) -> bool {
        self.borrow_mut().delete_surrounding(before, after)
    }
    fn send_key(&mut self, key: KeyCode) -> bool {
        self.borrow_mut().send_key(key)
    }
    fn text_before_cursor(&self, n: usize) -> String {
        self.borrow().text_before_cursor(n)
    }
}

/// In-memory text field with the cursor always at the end.
///
/// The composing region, when present, is the tail of `text`. Enter is
/// applied as a newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    composing_start: Option<usize>,
    purpose: InputPurpose,
    sent_keys: Vec<KeyCode>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_purpose(purpose: InputPurpose) -> Self {
        Self {
            purpose,
            ..Self::default()
        }
    }

    /// Whole field content including any composing text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text outside the composing region.
    pub fn committed(&self) -> &str {
        &self.text[..self.composing_start.unwrap_or(self.text.len())]
    }

    /// Current composing region, if any.
    pub fn composing(&self) -> Option<&str> {
        self.composing_start.map(|start| &self.text[start..])
    }

    pub fn sent_keys(&self) -> &[KeyCode] {
        &self.sent_keys
    }

    fn drop_composing(&mut self) {
        if let Some(start) = self.composing_start.take() {
            self.text.truncate(start);
        }
    }
}

impl HostField for TextBuffer {
    fn input_purpose(&self) -> InputPurpose {
        self.purpose
    }

    fn commit_text(&mut self, text: &str) -> bool {
        self.drop_composing();
        self.text.push_str(text);
        true
    }

    fn set_composing_text(&mut self, text: &str) -> bool {
        self.drop_composing();
        self.composing_start = Some(self.text.len());
        self.text.push_str(text);
        true
    }

    fn finish_composing_text(&mut self) -> bool {
        self.composing_start = None;
        true
    }

    fn delete_surrounding(&mut self, before: usize, _after: usize) -> bool {
        self.composing_start = None;
        for _ in 0..before {
            if self.text.pop().is_none() {
                break;
            }
        }
        true
    }

    fn send_key(&mut self, key: KeyCode) -> bool {
        self.sent_keys.push(key);
        match key {
            KeyCode::Enter => {
                self.finish_composing_text();
                self.text.push('\n');
            }
            KeyCode::Delete => {
                self.delete_surrounding(1, 0);
            }
        }
        true
    }

    fn text_before_cursor(&self, n: usize) -> String {
        let skip = self.text.chars().count().saturating_sub(n);
        self.text.chars().skip(skip).collect()
    }
}
