//! Mode-aware input router.
//!
//! `InputRouter` receives key and touch events from the keyboard shell, one at
//! a time on the UI thread, and decides where each one goes: the composing
//! word, the GIF search query, the translation text, or straight into the
//! host field. It drives the prediction engine and shortcut table and reports
//! suggestion-strip and toolbar updates as queued `RouterEvent`s.
//!
//! Character dispatch, in priority order:
//! 1. GIF search: append to the query and report the new query.
//! 2. Translation: append to the translation text.
//! 3. Emoji panel: commit directly.
//! 4. Password field: commit directly, no composing, no suggestions.
//! 5. Normal: append to the composing word and refresh suggestions. An exact
//!    shortcut match replaces the predictions with a single expansion preview.
//!
//! Space commits the composing word, expanding it if it is a shortcut trigger.
//! Enter commits it as typed (expansion only with `enter_expands_shortcuts`)
//! and then sends an Enter key to the host.

use crate::accents;
use crate::clipboard::ClipboardHistory;
use crate::host::{HostField, KeyCode};
use crate::popup::{LongPressTracker, PopupSession};
use crate::prediction::PredictionEngine;
use crate::session::{ComposingState, Mode};
use crate::shortcuts::ShortcutTable;
use crate::store::KeyValueStore;
use crate::KeyboardConfig;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Key events the router understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    /// Text produced by a key (usually one character, an emoji may be more)
    Text(String),
    Backspace,
    Space,
    Enter,
    Tab,
    /// Shift key tap
    Shift,
    /// Shift key double-tap or long-press
    CapsLock,
}

/// A shortcut expanded at a word boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutFired {
    pub trigger: String,
    pub expansion: String,
}

impl ShortcutFired {
    /// Toolbar feedback line, e.g. `⚡ "omw" → "on my way"`.
    pub fn feedback_text(&self) -> String {
        format!("⚡ \"{}\" → \"{}\"", self.trigger, self.expansion)
    }
}

/// Notifications for the suggestion strip and toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    /// New contents of the suggestion strip
    SuggestionsChanged(Vec<String>),
    ShortcutFired(ShortcutFired),
    /// The GIF search query changed; the shell runs the search
    GifQueryChanged(String),
    GifSearchClosed,
    /// Enter pressed in the translation panel
    TranslateRequested(String),
    ModeChanged(Mode),
}

/// Composing state machine for one keyboard instance.
pub struct InputRouter {
    engine: Arc<PredictionEngine>,
    shortcuts: ShortcutTable,
    clipboard: ClipboardHistory,
    config: KeyboardConfig,
    state: ComposingState,
    field: Option<Box<dyn HostField>>,
    suggestions: Vec<String>,
    // Expansion currently shown as the only suggestion, if any
    preview: Option<String>,
    long_press: LongPressTracker,
    events: Vec<RouterEvent>,
}

impl std::fmt::Debug for InputRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRouter")
            .field("state", &self.state)
            .field("suggestions", &self.suggestions)
            .field("has_field", &self.field.is_some())
            .finish_non_exhaustive()
    }
}

impl InputRouter {
    /// Create a router. Shortcuts and clipboard history share `store`.
    pub fn new(
        engine: Arc<PredictionEngine>,
        store: Arc<dyn KeyValueStore>,
        config: KeyboardConfig,
    ) -> Self {
        let long_press = LongPressTracker::new(
            config.long_press_delay(),
            config.popup_candidate_width,
            config.popup_hit_factor,
        );
        Self {
            engine,
            shortcuts: ShortcutTable::new(Arc::clone(&store)),
            clipboard: ClipboardHistory::new(store, config.clipboard_history_limit),
            state: ComposingState::new(&config.language),
            config,
            field: None,
            suggestions: Vec::new(),
            preview: None,
            long_press,
            events: Vec::new(),
        }
    }

    pub fn engine(&self) -> &Arc<PredictionEngine> {
        &self.engine
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn clipboard(&self) -> &ClipboardHistory {
        &self.clipboard
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    pub fn state(&self) -> &ComposingState {
        &self.state
    }

    // ---- host field ----

    /// Attach a newly focused field and start from a clean state.
    pub fn start_input(&mut self, field: Box<dyn HostField>) {
        self.state.clear();
        self.field = Some(field);
        self.long_press.cancel();
        self.preview = None;
        self.set_suggestions(Vec::new());
        self.apply_auto_shift();
        debug!(purpose = ?self.field.as_ref().map(|f| f.input_purpose()), "input started");
    }

    /// Detach the field, keeping any composing text as ordinary text.
    pub fn finish_input(&mut self) {
        if !self.state.composing.is_empty() {
            self.host("finish_composing_text", |f| f.finish_composing_text());
        }
        self.state.clear();
        self.long_press.cancel();
        self.preview = None;
        self.set_suggestions(Vec::new());
        self.field = None;
    }

    /// Run an edit against the host field.
    ///
    /// Without a field the edit is dropped; nothing here may fail loudly.
    fn host<F>(&mut self, op: &'static str, edit: F) -> bool
    where
        F: FnOnce(&mut (dyn HostField + 'static)) -> bool,
    {
        match self.field.as_deref_mut() {
            Some(field) => {
                let accepted = edit(field);
                if !accepted {
                    warn!(op, "host field rejected edit");
                }
                accepted
            }
            None => {
                warn!(op, "no host field attached");
                false
            }
        }
    }

    fn commit(&mut self, text: &str) -> bool {
        self.host("commit_text", |f| f.commit_text(text))
    }

    // ---- state queries ----

    /// Mode as the shell should render it.
    pub fn current_mode(&self) -> Mode {
        let password = self
            .field
            .as_ref()
            .map(|f| f.input_purpose().is_password())
            .unwrap_or(false);
        if self.state.mode == Mode::Normal && password {
            Mode::PasswordField
        } else {
            self.state.mode
        }
    }

    pub fn current_suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn current_composing_text(&self) -> &str {
        self.state.composing.text()
    }

    pub fn gif_query(&self) -> &str {
        self.state.gif_query.text()
    }

    pub fn translation_text(&self) -> &str {
        self.state.translation_text.text()
    }

    pub fn is_shifted(&self) -> bool {
        self.state.shifted
    }

    pub fn is_caps_locked(&self) -> bool {
        self.state.caps_locked
    }

    pub fn language(&self) -> &str {
        &self.state.language
    }

    /// Switch the language used for case folding and accent lookup.
    ///
    /// Reloading the dictionary is left to the caller.
    pub fn set_language(&mut self, language: &str) {
        debug!(language, "router language changed");
        self.state.language = language.to_string();
    }

    /// Drain queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<RouterEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- suggestions ----

    fn set_suggestions(&mut self, suggestions: Vec<String>) {
        if suggestions != self.suggestions {
            self.suggestions = suggestions.clone();
            self.events.push(RouterEvent::SuggestionsChanged(suggestions));
        }
    }

    fn reset_suggestions(&mut self) {
        self.preview = None;
        self.set_suggestions(Vec::new());
    }

    /// Recompute suggestions for the composing word.
    fn refresh_suggestions(&mut self) {
        let word = self.state.composing.text().to_string();
        if word.is_empty() {
            self.reset_suggestions();
            return;
        }
        match self.shortcuts.get_expansion(&word) {
            Some(expansion) => {
                self.preview = Some(expansion.clone());
                self.set_suggestions(vec![expansion]);
            }
            None => {
                self.preview = None;
                let predictions = self.engine.predict(&word, self.config.max_suggestions);
                self.set_suggestions(predictions);
            }
        }
    }

    // ---- modes ----

    /// Switch to `mode`, leaving whatever mode was active.
    ///
    /// Any composing text is kept in the field as typed and suggestions are
    /// hidden. `PasswordField` cannot be entered; it follows the focused
    /// field.
    pub fn enter_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Normal => return self.exit_to_normal(),
            Mode::PasswordField => {
                warn!("password mode follows the focused field and cannot be entered");
                return;
            }
            _ => {}
        }
        if self.state.mode == mode {
            return;
        }

        if !self.state.composing.is_empty() {
            self.host("finish_composing_text", |f| f.finish_composing_text());
            self.state.composing.clear();
        }
        self.leave_current_mode();
        match mode {
            Mode::GifSearch => self.state.gif_query.clear(),
            Mode::Translation => self.state.translation_text.clear(),
            _ => {}
        }
        self.state.mode = mode;
        self.reset_suggestions();
        debug!(mode = %mode, "mode entered");
        self.events.push(RouterEvent::ModeChanged(mode));
    }

    /// Return to Normal and show suggestions for the composing word again.
    pub fn exit_to_normal(&mut self) {
        if self.state.mode == Mode::Normal {
            return;
        }
        self.leave_current_mode();
        self.state.mode = Mode::Normal;
        debug!("mode exited to normal");
        self.events.push(RouterEvent::ModeChanged(Mode::Normal));
        self.refresh_suggestions();
    }

    fn leave_current_mode(&mut self) {
        self.long_press.cancel();
        match self.state.mode {
            Mode::GifSearch => {
                self.state.gif_query.clear();
                self.events.push(RouterEvent::GifSearchClosed);
            }
            Mode::Translation => self.state.translation_text.clear(),
            _ => {}
        }
    }

    /// Mode switch requested by the shell (toolbar buttons).
    pub fn on_mode_change(&mut self, mode: Mode) {
        if mode == Mode::Normal {
            self.exit_to_normal();
        } else {
            self.enter_mode(mode);
        }
    }

    // ---- keys ----

    /// Dispatch a key event.
    pub fn process_key(&mut self, key: KeyEvent) {
        match key {
            KeyEvent::Text(text) => self.on_character(&text),
            KeyEvent::Backspace => self.on_backspace(),
            KeyEvent::Space => self.on_space(),
            KeyEvent::Enter => self.on_enter(),
            KeyEvent::Tab => self.on_tab(),
            KeyEvent::Shift => self.on_shift_toggle(),
            KeyEvent::CapsLock => self.toggle_caps_lock(),
        }
    }

    /// Apply shift to typed text and release one-shot shift.
    fn fold_case(&mut self, text: &str) -> String {
        if !self.state.shifted {
            return text.to_string();
        }
        if !self.state.caps_locked {
            self.state.shifted = false;
        }
        accents::to_upper(text, &self.state.language)
    }

    pub fn on_character(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.current_mode() {
            Mode::GifSearch => {
                let text = self.fold_case(text);
                self.state.gif_query.push_str(&text);
                let query = self.state.gif_query.text().to_string();
                self.events.push(RouterEvent::GifQueryChanged(query));
            }
            Mode::Translation => {
                let text = self.fold_case(text);
                self.state.translation_text.push_str(&text);
            }
            Mode::Emoji => {
                self.commit(text);
            }
            Mode::Clipboard => {
                self.exit_to_normal();
                self.on_character(text);
            }
            Mode::PasswordField => {
                let text = self.fold_case(text);
                self.commit(&text);
            }
            Mode::Normal => {
                let text = self.fold_case(text);
                self.state.composing.push_str(&text);
                let composing = self.state.composing.text().to_string();
                self.host("set_composing_text", |f| f.set_composing_text(&composing));
                self.refresh_suggestions();
            }
        }
    }

    pub fn on_backspace(&mut self) {
        match self.current_mode() {
            Mode::GifSearch => {
                if self.state.gif_query.delete_before() {
                    let query = self.state.gif_query.text().to_string();
                    self.events.push(RouterEvent::GifQueryChanged(query));
                }
            }
            Mode::Translation => {
                self.state.translation_text.delete_before();
            }
            Mode::Normal if !self.state.composing.is_empty() => {
                self.state.composing.delete_before();
                let composing = self.state.composing.text().to_string();
                if composing.is_empty() {
                    self.commit("");
                } else {
                    self.host("set_composing_text", |f| f.set_composing_text(&composing));
                }
                self.refresh_suggestions();
            }
            _ => {
                self.host("delete_surrounding", |f| f.delete_surrounding(1, 0));
                self.reset_suggestions();
            }
        }
    }

    pub fn on_space(&mut self) {
        match self.current_mode() {
            Mode::GifSearch => {
                self.state.gif_query.push_str(" ");
                let query = self.state.gif_query.text().to_string();
                self.events.push(RouterEvent::GifQueryChanged(query));
            }
            Mode::Translation => self.state.translation_text.push_str(" "),
            Mode::Emoji | Mode::PasswordField => {
                self.commit(" ");
            }
            Mode::Clipboard => {
                self.exit_to_normal();
                self.on_space();
            }
            Mode::Normal => self.commit_word(true, " "),
        }
    }

    pub fn on_enter(&mut self) {
        match self.current_mode() {
            Mode::GifSearch => self.exit_to_normal(),
            Mode::Translation => {
                let text = self.state.translation_text.text().to_string();
                debug!(chars = self.state.translation_text.char_len(), "translation requested");
                self.events.push(RouterEvent::TranslateRequested(text));
            }
            _ => {
                self.commit_word(self.config.enter_expands_shortcuts, "");
                self.host("send_key", |f| f.send_key(KeyCode::Enter));
            }
        }
    }

    /// Tab flushes the composing word and inserts a tab character.
    pub fn on_tab(&mut self) {
        match self.current_mode() {
            Mode::GifSearch | Mode::Translation => {}
            _ => self.commit_word(false, "\t"),
        }
    }

    /// Commit the composing word followed by `suffix`.
    ///
    /// With `expand`, a word matching a shortcut trigger is replaced by its
    /// expansion and not learned; otherwise the word is committed as typed
    /// and learned.
    fn commit_word(&mut self, expand: bool, suffix: &str) {
        let word = self.state.composing.take();
        let expansion = if expand && !word.is_empty() {
            self.shortcuts.get_expansion(&word)
        } else {
            None
        };

        match expansion {
            Some(expansion) => {
                self.commit(&format!("{}{}", expansion, suffix));
                debug!(trigger = %word, "shortcut expanded");
                self.events.push(RouterEvent::ShortcutFired(ShortcutFired {
                    trigger: word,
                    expansion,
                }));
            }
            None if word.is_empty() => {
                if !suffix.is_empty() {
                    self.commit(suffix);
                }
            }
            None => {
                self.commit(&format!("{}{}", word, suffix));
                self.engine.learn(&word);
            }
        }

        self.reset_suggestions();
        self.apply_auto_shift();
    }

    /// Commit a tapped suggestion followed by a space.
    ///
    /// A tapped expansion preview fires the shortcut instead of being learned.
    pub fn commit_suggestion(&mut self, suggestion: &str) {
        if suggestion.is_empty() {
            return;
        }
        let trigger = self.state.composing.take();
        self.commit(&format!("{} ", suggestion));
        if self.preview.as_deref() == Some(suggestion) {
            self.events.push(RouterEvent::ShortcutFired(ShortcutFired {
                trigger,
                expansion: suggestion.to_string(),
            }));
        } else {
            self.engine.learn(suggestion);
        }
        self.reset_suggestions();
        self.apply_auto_shift();
    }

    pub fn on_shift_toggle(&mut self) {
        self.state.shifted = !self.state.shifted;
        self.state.caps_locked = false;
    }

    pub fn toggle_caps_lock(&mut self) {
        self.state.caps_locked = !self.state.caps_locked;
        self.state.shifted = self.state.caps_locked;
    }

    /// Engage one-shot shift at the start of a sentence.
    fn apply_auto_shift(&mut self) {
        if !self.config.auto_shift || self.state.caps_locked {
            return;
        }
        let Some(field) = self.field.as_deref() else {
            return;
        };
        let before = field.text_before_cursor(2);
        if before.is_empty() || matches!(before.as_str(), ". " | "! " | "? ") {
            self.state.shifted = true;
        }
    }

    // ---- clipboard ----

    /// Insert clipboard entry `index` into the field.
    ///
    /// Composing text is kept as typed. Returns `false` if there is no such
    /// entry.
    pub fn insert_clip(&mut self, index: usize) -> bool {
        let Some(clip) = self.clipboard.get(index) else {
            return false;
        };
        if !self.state.composing.is_empty() {
            self.host("finish_composing_text", |f| f.finish_composing_text());
            self.state.composing.clear();
        }
        self.commit(&clip);
        if self.state.mode == Mode::Clipboard {
            self.exit_to_normal();
        } else {
            self.reset_suggestions();
        }
        true
    }

    // ---- long press ----

    /// Finger down on `key`; the popup opens from `on_long_press_tick`.
    pub fn on_key_down(&mut self, key: &str, anchor_x: f32, now: Instant) {
        self.long_press.touch_down(key, anchor_x, now);
    }

    /// Timer tick while a key is held. Returns `true` if the popup opened.
    pub fn on_long_press_tick(&mut self, now: Instant) -> bool {
        let language = self.state.language.clone();
        self.long_press.poll(now, &language, self.state.shifted)
    }

    /// Long-press timer fired for `key`: open its popup right away.
    ///
    /// Returns `false` when the key has no variants; releasing it then acts
    /// as a plain tap.
    pub fn begin_long_press(&mut self, key: &str, anchor_x: f32) -> bool {
        self.long_press.touch_down(key, anchor_x, Instant::now());
        let language = self.state.language.clone();
        self.long_press.activate(&language, self.state.shifted)
    }

    /// Pointer moved while the popup is open; returns the selected index.
    pub fn on_drag_to(&mut self, x: f32, y: f32) -> Option<usize> {
        self.long_press.drag_to(x, y)
    }

    pub fn popup(&self) -> Option<&PopupSession> {
        self.long_press.session()
    }

    /// Finger lifted. The selected variant (or the tapped key) is typed as a
    /// character and returned.
    pub fn end_long_press(&mut self) -> Option<String> {
        let value = self.long_press.touch_up()?;
        self.on_character(&value);
        Some(value)
    }

    /// Abandon the gesture without typing anything.
    pub fn cancel_long_press(&mut self) {
        self.long_press.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{InputPurpose, TextBuffer};
    use crate::prediction::StaticSource;
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn router_with(config: KeyboardConfig) -> (InputRouter, Rc<RefCell<TextBuffer>>) {
        let engine = Arc::new(PredictionEngine::new());
        let source = StaticSource::new().with_list("en", "the 50\ntest 10\ntea 5\nbright 3\n");
        engine.load("en", &source).unwrap();
        let mut router = InputRouter::new(engine, Arc::new(MemoryStore::new()), config);
        let field = Rc::new(RefCell::new(TextBuffer::new()));
        router.start_input(Box::new(Rc::clone(&field)));
        router.take_events();
        (router, field)
    }

    fn router() -> (InputRouter, Rc<RefCell<TextBuffer>>) {
        router_with(KeyboardConfig {
            language: "en".to_string(),
            ..KeyboardConfig::default()
        })
    }

    fn type_str(router: &mut InputRouter, text: &str) {
        for c in text.chars() {
            router.on_character(&c.to_string());
        }
    }

    #[test]
    fn typing_composes_and_predicts() {
        let (mut r, field) = router();
        type_str(&mut r, "te");
        assert_eq!(r.current_composing_text(), "te");
        assert_eq!(field.borrow().composing(), Some("te"));
        assert_eq!(r.current_suggestions(), ["test", "tea"]);
    }

    #[test]
    fn space_commits_and_learns() {
        let (mut r, field) = router();
        type_str(&mut r, "tea");
        r.on_space();
        assert_eq!(field.borrow().text(), "tea ");
        assert_eq!(r.engine().frequency("tea"), Some(6));
        assert!(r.current_suggestions().is_empty());
        assert_eq!(r.current_composing_text(), "");
    }

    #[test]
    fn shortcut_preview_and_expansion() {
        let (mut r, field) = router();
        r.shortcuts().add("brb", "be right back");
        type_str(&mut r, "brb");
        assert_eq!(r.current_suggestions(), ["be right back"]);
        r.take_events();

        r.on_space();
        assert_eq!(field.borrow().text(), "be right back ");
        assert_eq!(r.engine().frequency("brb"), None);
        let fired = r.take_events().into_iter().find_map(|e| match e {
            RouterEvent::ShortcutFired(s) => Some(s),
            _ => None,
        });
        let fired = fired.unwrap();
        assert_eq!(fired.trigger, "brb");
        assert_eq!(fired.feedback_text(), "⚡ \"brb\" → \"be right back\"");
    }

    #[test]
    fn enter_does_not_expand_by_default() {
        let (mut r, field) = router();
        r.shortcuts().add("brb", "be right back");
        type_str(&mut r, "brb");
        r.on_enter();
        assert_eq!(field.borrow().text(), "brb\n");
        assert_eq!(field.borrow().sent_keys(), [KeyCode::Enter]);
        assert_eq!(r.engine().frequency("brb"), Some(1));
    }

    #[test]
    fn enter_expands_when_configured() {
        let (mut r, field) = router_with(KeyboardConfig {
            language: "en".to_string(),
            enter_expands_shortcuts: true,
            ..KeyboardConfig::default()
        });
        r.shortcuts().add("brb", "be right back");
        type_str(&mut r, "brb");
        r.on_enter();
        assert_eq!(field.borrow().text(), "be right back\n");
        assert_eq!(r.engine().frequency("brb"), None);
    }

    #[test]
    fn backspace_in_composing_and_outside() {
        let (mut r, field) = router();
        field.borrow_mut().commit_text("ab ");
        type_str(&mut r, "te");
        r.on_backspace();
        assert_eq!(r.current_composing_text(), "t");
        assert_eq!(field.borrow().text(), "ab t");
        assert_eq!(r.current_suggestions(), ["the", "test", "tea"]);

        r.on_backspace();
        assert_eq!(field.borrow().text(), "ab ");
        assert!(r.current_suggestions().is_empty());

        r.on_backspace();
        assert_eq!(field.borrow().text(), "ab");
    }

    #[test]
    fn one_shot_shift_and_caps_lock() {
        let (mut r, field) = router();
        r.on_shift_toggle();
        type_str(&mut r, "te");
        assert_eq!(r.current_composing_text(), "Te");
        assert!(!r.is_shifted());

        r.toggle_caps_lock();
        type_str(&mut r, "st");
        r.on_space();
        assert_eq!(field.borrow().text(), "TeST ");
        assert!(r.is_shifted() && r.is_caps_locked());
    }

    #[test]
    fn turkish_shift_uses_dotted_capital() {
        let (mut r, _field) = router_with(KeyboardConfig::default());
        r.on_shift_toggle();
        r.on_character("i");
        assert_eq!(r.current_composing_text(), "İ");
    }

    #[test]
    fn password_field_commits_directly() {
        let (mut r, _) = router();
        let field = Rc::new(RefCell::new(TextBuffer::with_purpose(InputPurpose::Password)));
        r.start_input(Box::new(Rc::clone(&field)));
        assert_eq!(r.current_mode(), Mode::PasswordField);

        type_str(&mut r, "te");
        assert_eq!(field.borrow().text(), "te");
        assert_eq!(field.borrow().composing(), None);
        assert_eq!(r.current_composing_text(), "");
        assert!(r.current_suggestions().is_empty());

        r.enter_mode(Mode::PasswordField);
        r.on_space();
        assert_eq!(field.borrow().text(), "te ");
        assert_eq!(r.engine().frequency("te"), None);
    }

    #[test]
    fn gif_search_owns_query() {
        let (mut r, field) = router();
        type_str(&mut r, "th");
        r.enter_mode(Mode::GifSearch);
        assert_eq!(field.borrow().text(), "th");
        assert_eq!(field.borrow().composing(), None);
        assert!(r.current_suggestions().is_empty());
        r.take_events();

        type_str(&mut r, "ca");
        r.on_space();
        r.on_backspace();
        assert_eq!(r.gif_query(), "ca");
        assert_eq!(
            r.take_events(),
            vec![
                RouterEvent::GifQueryChanged("c".into()),
                RouterEvent::GifQueryChanged("ca".into()),
                RouterEvent::GifQueryChanged("ca ".into()),
                RouterEvent::GifQueryChanged("ca".into()),
            ]
        );

        r.on_enter();
        assert_eq!(r.current_mode(), Mode::Normal);
        let events = r.take_events();
        assert!(events.contains(&RouterEvent::GifSearchClosed));
        assert!(events.contains(&RouterEvent::ModeChanged(Mode::Normal)));
        assert_eq!(field.borrow().text(), "th");
    }

    #[test]
    fn gif_space_keeps_one_shot_shift() {
        let (mut r, _) = router();
        r.enter_mode(Mode::GifSearch);
        type_str(&mut r, "cat");
        r.on_shift_toggle();
        r.on_space();
        assert!(r.is_shifted());
        r.on_character("d");
        assert_eq!(r.gif_query(), "cat D");
        assert!(!r.is_shifted());
    }

    #[test]
    fn mode_switch_abandons_open_popup() {
        let (mut r, field) = router();
        assert!(r.begin_long_press("e", 200.0));
        r.enter_mode(Mode::GifSearch);
        assert!(r.popup().is_none());
        assert_eq!(r.end_long_press(), None);
        assert_eq!(r.gif_query(), "");

        r.on_mode_change(Mode::Translation);
        assert!(r.begin_long_press("a", 200.0));
        r.exit_to_normal();
        assert_eq!(r.end_long_press(), None);
        assert_eq!(r.current_composing_text(), "");
        assert_eq!(field.borrow().text(), "");
    }

    #[test]
    fn turkish_capital_word_predicts_and_learns_folded() {
        let engine = Arc::new(PredictionEngine::new());
        let source = StaticSource::new().with_list("tr", "istanbul 50\nışık 40\n");
        engine.load("tr", &source).unwrap();
        let mut r = InputRouter::new(Arc::clone(&engine), Arc::new(MemoryStore::new()), KeyboardConfig::default());
        let field = Rc::new(RefCell::new(TextBuffer::new()));
        r.start_input(Box::new(Rc::clone(&field)));

        r.on_shift_toggle();
        type_str(&mut r, "is");
        assert_eq!(r.current_composing_text(), "İs");
        assert_eq!(r.current_suggestions(), ["istanbul"]);

        r.on_space();
        assert_eq!(field.borrow().text(), "İs ");
        assert_eq!(engine.frequency("is"), Some(1));
        assert_eq!(engine.frequency("i\u{307}s"), None);
        assert_eq!(engine.predict("I", 3), vec!["ışık"]);
    }

    #[test]
    fn translation_enter_requests_translation() {
        let (mut r, field) = router();
        r.enter_mode(Mode::Translation);
        type_str(&mut r, "hi");
        r.on_space();
        type_str(&mut r, "x");
        r.on_backspace();
        r.on_enter();
        assert!(r
            .take_events()
            .contains(&RouterEvent::TranslateRequested("hi ".into())));
        assert_eq!(field.borrow().text(), "");
    }

    #[test]
    fn emoji_commits_directly() {
        let (mut r, field) = router();
        r.enter_mode(Mode::Emoji);
        r.on_character("😀");
        r.on_space();
        assert_eq!(field.borrow().text(), "😀 ");
        assert_eq!(r.current_composing_text(), "");
    }

    #[test]
    fn suggestion_tap_commits_and_learns() {
        let (mut r, field) = router();
        type_str(&mut r, "br");
        assert_eq!(r.current_suggestions(), ["bright"]);
        r.commit_suggestion("bright");
        assert_eq!(field.borrow().text(), "bright ");
        assert_eq!(r.engine().frequency("bright"), Some(4));
    }

    #[test]
    fn preview_tap_fires_shortcut() {
        let (mut r, field) = router();
        r.shortcuts().add("omw", "on my way");
        type_str(&mut r, "omw");
        r.commit_suggestion("on my way");
        assert_eq!(field.borrow().text(), "on my way ");
        assert_eq!(r.engine().frequency("on my way"), None);
    }

    #[test]
    fn tab_flushes_word() {
        let (mut r, field) = router();
        type_str(&mut r, "tea");
        r.on_tab();
        assert_eq!(field.borrow().text(), "tea\t");
        assert_eq!(r.engine().frequency("tea"), Some(6));
    }

    #[test]
    fn clipboard_insert_returns_to_normal() {
        let (mut r, field) = router();
        r.clipboard().add_clip("copied text");
        r.enter_mode(Mode::Clipboard);
        assert!(r.insert_clip(0));
        assert!(!r.insert_clip(5));
        assert_eq!(field.borrow().text(), "copied text");
        assert_eq!(r.current_mode(), Mode::Normal);
    }

    #[test]
    fn auto_shift_at_sentence_start() {
        let (mut r, field) = router_with(KeyboardConfig {
            language: "en".to_string(),
            auto_shift: true,
            ..KeyboardConfig::default()
        });
        assert!(r.is_shifted());
        type_str(&mut r, "hi");
        r.on_character(".");
        r.on_space();
        assert!(r.is_shifted());
        type_str(&mut r, "ok");
        r.on_space();
        assert!(!r.is_shifted());
        assert_eq!(field.borrow().text(), "Hi. Ok ");
    }

    #[test]
    fn no_field_is_a_noop() {
        let engine = Arc::new(PredictionEngine::new());
        let mut r = InputRouter::new(engine, Arc::new(MemoryStore::new()), KeyboardConfig::default());
        type_str(&mut r, "abc");
        r.on_space();
        r.on_backspace();
        r.on_enter();
        assert_eq!(r.current_composing_text(), "");
        assert_eq!(r.current_mode(), Mode::Normal);
    }

    #[test]
    fn long_press_commits_selected_variant() {
        let (mut r, field) = router();
        assert!(r.begin_long_press("e", 200.0));
        let center = r.popup().unwrap().layout().center_x(0);
        assert_eq!(r.on_drag_to(center, 0.0), Some(0));
        assert_eq!(r.end_long_press().as_deref(), Some("é"));
        assert_eq!(field.borrow().composing(), Some("é"));
        assert!(r.popup().is_none());
    }

    #[test]
    fn long_press_without_variants_is_a_tap() {
        let (mut r, _) = router();
        assert!(!r.begin_long_press("q", 10.0));
        assert_eq!(r.end_long_press().as_deref(), Some("q"));
        assert_eq!(r.current_composing_text(), "q");

        r.begin_long_press("e", 10.0);
        r.cancel_long_press();
        assert_eq!(r.end_long_press(), None);
        assert_eq!(r.current_composing_text(), "q");
    }
}
