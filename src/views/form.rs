//! Keyboard-driven forms shared by every editing view.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::{CursorMove, TextArea};

use crate::error::FormError;
use crate::i18n::{t, Language};

/// One option of a choice field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Multiline,
    Secret,
    Number,
    Date,
    Choice(Vec<Choice>),
}

/// What the form wants after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

pub struct Field {
    pub name: &'static str,
    /// i18n key
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub editable: bool,
    input: TextArea<'static>,
    selected: usize,
}

impl Field {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        let mut input = TextArea::default();
        if kind == FieldKind::Secret {
            input.set_mask_char('•');
        }
        Self {
            name,
            label,
            kind,
            required: false,
            editable: true,
            input,
            selected: 0,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn multiline(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Multiline)
    }

    pub fn secret(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Secret)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn choice(name: &'static str, label: &'static str, options: Vec<Choice>) -> Self {
        Self::new(name, label, FieldKind::Choice(options))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn value(&self) -> String {
        match &self.kind {
            FieldKind::Choice(options) => options
                .get(self.selected)
                .map(|c| c.value.clone())
                .unwrap_or_default(),
            _ => self.input.lines().join("\n"),
        }
    }

    /// Text shown for the field (choice label, masked secret)
    pub fn display_value(&self) -> String {
        match &self.kind {
            FieldKind::Choice(options) => options
                .get(self.selected)
                .map(|c| c.label.clone())
                .unwrap_or_default(),
            FieldKind::Secret => "•".repeat(self.value().chars().count()),
            _ => self.value(),
        }
    }

    pub fn set_value(&mut self, value: &str) {
        match &self.kind {
            FieldKind::Choice(options) => {
                self.selected = options.iter().position(|c| c.value == value).unwrap_or(0);
            }
            _ => {
                let mut input = TextArea::from(value.lines().map(str::to_string));
                if self.kind == FieldKind::Secret {
                    input.set_mask_char('•');
                }
                input.move_cursor(CursorMove::Bottom);
                input.move_cursor(CursorMove::End);
                self.input = input;
            }
        }
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.input
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.input
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            FieldKind::Number => c.is_ascii_digit() || c == '.',
            FieldKind::Date => c.is_ascii_digit() || c == '-',
            FieldKind::Choice(_) => false,
            _ => true,
        }
    }

    fn cycle(&mut self, step: isize) {
        if let FieldKind::Choice(options) = &self.kind {
            if options.is_empty() {
                return;
            }
            let len = options.len() as isize;
            self.selected = ((self.selected as isize + step).rem_euclid(len)) as usize;
        }
    }

    /// Edit keys; returns false when the key was not consumed
    fn edit(&mut self, key: KeyEvent) -> bool {
        if !self.editable {
            return false;
        }

        if matches!(self.kind, FieldKind::Choice(_)) {
            return match key.code {
                KeyCode::Left => {
                    self.cycle(-1);
                    true
                }
                KeyCode::Right | KeyCode::Char(' ') => {
                    self.cycle(1);
                    true
                }
                _ => false,
            };
        }

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.accepts(c) {
                    self.input.insert_char(c);
                }
            }
            KeyCode::Backspace => {
                self.input.delete_char();
            }
            KeyCode::Delete => {
                self.input.delete_next_char();
            }
            KeyCode::Left => self.input.move_cursor(CursorMove::Back),
            KeyCode::Right => self.input.move_cursor(CursorMove::Forward),
            KeyCode::Home => self.input.move_cursor(CursorMove::Head),
            KeyCode::End => self.input.move_cursor(CursorMove::End),
            _ => return false,
        }
        true
    }
}

pub struct Form {
    pub fields: Vec<Field>,
    pub focused: usize,
    lang: Language,
}

impl Form {
    pub fn new(lang: Language, fields: Vec<Field>) -> Self {
        let mut form = Self {
            fields,
            focused: 0,
            lang,
        };
        if !form.fields.first().is_some_and(|f| f.editable) {
            form.focus_next();
        }
        form
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> String {
        self.field(name).map(Field::value).unwrap_or_default()
    }

    /// Trimmed value, `None` when blank
    pub fn text(&self, name: &str) -> Option<String> {
        let value = self.value(name);
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(field) = self.field_mut(name) {
            field.set_value(value);
        }
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.set_value("");
        }
        self.focused = 0;
    }

    pub fn focused_field(&self) -> Option<&Field> {
        self.fields.get(self.focused)
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, step: isize) {
        let len = self.fields.len() as isize;
        if len == 0 {
            return;
        }
        let mut idx = self.focused as isize;
        for _ in 0..len {
            idx = (idx + step).rem_euclid(len);
            if self.fields[idx as usize].editable {
                self.focused = idx as usize;
                return;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let multiline = self
            .focused_field()
            .is_some_and(|f| f.kind == FieldKind::Multiline && f.editable);

        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return FormAction::Submit;
            }
            KeyCode::Enter => {
                // Ctrl/Alt+Enter breaks the line in multi-line fields
                if multiline
                    && (key.modifiers.contains(KeyModifiers::CONTROL)
                        || key.modifiers.contains(KeyModifiers::ALT))
                {
                    if let Some(field) = self.fields.get_mut(self.focused) {
                        field.input.insert_newline();
                    }
                    return FormAction::Continue;
                }
                return FormAction::Submit;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return FormAction::Continue;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return FormAction::Continue;
            }
            _ => {}
        }

        if let Some(field) = self.fields.get_mut(self.focused) {
            field.edit(key);
        }
        FormAction::Continue
    }

    fn label(&self, name: &str) -> String {
        self.field(name)
            .map(|f| t(self.lang, f.label).to_string())
            .unwrap_or_else(|| name.to_string())
    }

    /// First required field left blank
    pub fn check_required(&self) -> Result<(), FormError> {
        match self
            .fields
            .iter()
            .find(|f| f.required && f.value().trim().is_empty())
        {
            Some(field) => Err(FormError::Missing(t(self.lang, field.label).to_string())),
            None => Ok(()),
        }
    }

    pub fn number(&self, name: &str) -> Result<Option<f64>, FormError> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(Some)
                .ok_or_else(|| FormError::NotANumber(self.label(name))),
        }
    }

    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>, FormError> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| FormError::NotADate(self.label(name))),
        }
    }
}

#[cfg(test)]
pub(crate) fn type_text(form: &mut Form, text: &str) {
    for c in text.chars() {
        form.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample() -> Form {
        Form::new(
            Language::En,
            vec![
                Field::text("title", "title").required(),
                Field::text("locked", "status").editable(false).with_value("TODO"),
                Field::number("hours", "estimated_duration"),
                Field::choice(
                    "priority",
                    "priority",
                    vec![Choice::new("LOW", "Low"), Choice::new("HIGH", "High")],
                ),
            ],
        )
    }

    #[test]
    fn test_typing_and_focus_skip_read_only() {
        let mut form = sample();
        type_text(&mut form, "Ship it");
        assert_eq!(form.value("title"), "Ship it");

        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused_field().unwrap().name, "hours");
        type_text(&mut form, "2x.5");
        assert_eq!(form.value("hours"), "2.5");
        assert_eq!(form.number("hours"), Ok(Some(2.5)));

        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focused_field().unwrap().name, "title");
    }

    #[test]
    fn test_choice_cycles() {
        let mut form = sample();
        form.focused = 3;
        assert_eq!(form.value("priority"), "LOW");
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.value("priority"), "HIGH");
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.value("priority"), "LOW");
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.field("priority").unwrap().display_value(), "High");
    }

    #[test]
    fn test_required_and_formats() {
        let mut form = sample();
        assert_eq!(
            form.check_required(),
            Err(FormError::Missing("Title".to_string()))
        );
        form.set_value("title", "x");
        assert!(form.check_required().is_ok());

        form.set_value("hours", "1.2.3");
        assert!(matches!(form.number("hours"), Err(FormError::NotANumber(_))));
        assert_eq!(form.date("title"), Err(FormError::NotADate("Title".to_string())));
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut form = sample();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
        assert_eq!(
            form.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            FormAction::Submit
        );
    }

    #[test]
    fn test_backspace_edits() {
        let mut form = sample();
        type_text(&mut form, "abc");
        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.value("title"), "ab");
        form.handle_key(key(KeyCode::Home));
        form.handle_key(key(KeyCode::Delete));
        assert_eq!(form.value("title"), "b");
    }
}
