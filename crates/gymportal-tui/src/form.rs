//! Editable forms shared by the login, contact, profile, membership and
//! notification pages.

use crossterm::event::{KeyCode, KeyEvent};

/// Maximum characters accepted by a single-line field
pub const MAX_FIELD_LEN: usize = 120;

/// Maximum characters accepted by a message body
pub const MAX_MESSAGE_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Rendered masked.
    Secret(String),
    /// `(code, label)` pairs.
    Choice {
        options: Vec<(String, String)>,
        selected: usize,
    },
    Toggle(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub value: FieldValue,
    pub required: bool,
    pub hidden: bool,
    pub max_len: usize,
}

impl Field {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            value: FieldValue::Text(String::new()),
            required: false,
            hidden: false,
            max_len: MAX_FIELD_LEN,
        }
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            value: FieldValue::Secret(String::new()),
            ..Self::text(key, label)
        }
    }

    pub fn message(key: &'static str, label: &'static str) -> Self {
        Self {
            max_len: MAX_MESSAGE_LEN,
            ..Self::text(key, label)
        }
    }

    pub fn choice(key: &'static str, label: &'static str, options: Vec<(String, String)>) -> Self {
        Self {
            value: FieldValue::Choice { options, selected: 0 },
            ..Self::text(key, label)
        }
    }

    pub fn toggle(key: &'static str, label: &'static str, on: bool) -> Self {
        Self {
            value: FieldValue::Toggle(on),
            ..Self::text(key, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_text(mut self, value: impl Into<String>) -> Self {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => *s = value.into(),
            _ => {}
        }
        self
    }

    /// Text shown for the field's current value.
    pub fn display(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Secret(s) => "*".repeat(s.chars().count()),
            FieldValue::Choice { options, selected } => options
                .get(*selected)
                .map(|(_, label)| format!("< {} >", label))
                .unwrap_or_else(|| "(none)".to_string()),
            FieldValue::Toggle(on) => if *on { "[x]" } else { "[ ]" }.to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        match &self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => s.trim().is_empty(),
            FieldValue::Choice { options, .. } => options.is_empty(),
            FieldValue::Toggle(_) => false,
        }
    }
}

/// What a key press did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    /// A field's value changed.
    Changed(&'static str),
    Submit,
    Cancel,
}

/// Whether a character may be appended to a field holding `len` characters.
pub fn can_add_char(len: usize, max_len: usize, c: char) -> bool {
    len < max_len && !c.is_control()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<String>,
    /// Set while a submit is in flight; input is ignored.
    pub submitting: bool,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        let mut form = Self {
            fields,
            focus: 0,
            error: None,
            submitting: false,
        };
        form.focus = form.first_visible().unwrap_or(0);
        form
    }

    fn first_visible(&self) -> Option<usize> {
        self.fields.iter().position(|f| !f.hidden)
    }

    fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    /// Trimmed text of a text or secret field; empty when absent.
    pub fn text(&self, key: &str) -> String {
        match self.field(key).map(|f| &f.value) {
            Some(FieldValue::Text(s)) | Some(FieldValue::Secret(s)) => s.trim().to_string(),
            _ => String::new(),
        }
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.field_mut(key) {
            if let FieldValue::Text(s) | FieldValue::Secret(s) = &mut field.value {
                *s = value.into();
            }
        }
    }

    /// Code of the selected option.
    pub fn choice(&self, key: &str) -> Option<String> {
        match self.field(key).map(|f| &f.value) {
            Some(FieldValue::Choice { options, selected }) => options.get(*selected).map(|(code, _)| code.clone()),
            _ => None,
        }
    }

    pub fn set_choice(&mut self, key: &str, code: &str) {
        if let Some(field) = self.field_mut(key) {
            if let FieldValue::Choice { options, selected } = &mut field.value {
                if let Some(i) = options.iter().position(|(c, _)| c == code) {
                    *selected = i;
                }
            }
        }
    }

    pub fn set_options(&mut self, key: &str, new_options: Vec<(String, String)>) {
        if let Some(field) = self.field_mut(key) {
            if let FieldValue::Choice { options, selected } = &mut field.value {
                *options = new_options;
                *selected = 0;
            }
        }
    }

    pub fn toggle(&self, key: &str) -> bool {
        matches!(self.field(key).map(|f| &f.value), Some(FieldValue::Toggle(true)))
    }

    pub fn set_toggle(&mut self, key: &str, on: bool) {
        if let Some(field) = self.field_mut(key) {
            if let FieldValue::Toggle(v) = &mut field.value {
                *v = on;
            }
        }
    }

    pub fn set_hidden(&mut self, key: &str, hidden: bool) {
        if let Some(field) = self.field_mut(key) {
            field.hidden = hidden;
        }
        if self.fields.get(self.focus).is_some_and(|f| f.hidden) {
            self.next_field();
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = (usize, &Field)> {
        self.fields.iter().enumerate().filter(|(_, f)| !f.hidden)
    }

    pub fn next_field(&mut self) {
        let n = self.fields.len();
        for step in 1..=n {
            let i = (self.focus + step) % n;
            if !self.fields[i].hidden {
                self.focus = i;
                return;
            }
        }
    }

    pub fn prev_field(&mut self) {
        let n = self.fields.len();
        for step in 1..=n {
            let i = (self.focus + n - step) % n;
            if !self.fields[i].hidden {
                self.focus = i;
                return;
            }
        }
    }

    fn is_last_visible(&self) -> bool {
        !self.fields.iter().skip(self.focus + 1).any(|f| !f.hidden)
    }

    /// Label of the first required field left blank.
    pub fn missing_required(&self) -> Option<&'static str> {
        self.visible().find(|(_, f)| f.required && f.is_blank()).map(|(_, f)| f.label)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.submitting {
            return FormAction::None;
        }
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev_field();
                FormAction::None
            }
            KeyCode::Enter => {
                if self.is_last_visible() {
                    FormAction::Submit
                } else {
                    self.next_field();
                    FormAction::None
                }
            }
            KeyCode::Left | KeyCode::Right => self.cycle_choice(key.code == KeyCode::Right),
            KeyCode::Backspace => self.edit(|s, _| {
                s.pop();
                true
            }),
            KeyCode::Char(' ') if matches!(self.focused().map(|f| &f.value), Some(FieldValue::Toggle(_))) => {
                let key = self.fields[self.focus].key;
                if let FieldValue::Toggle(v) = &mut self.fields[self.focus].value {
                    *v = !*v;
                }
                FormAction::Changed(key)
            }
            KeyCode::Char(c) => self.edit(|s, max_len| {
                if can_add_char(s.chars().count(), max_len, c) {
                    s.push(c);
                    true
                } else {
                    false
                }
            }),
            _ => FormAction::None,
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut String, usize) -> bool) -> FormAction {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return FormAction::None;
        };
        let (key, max_len) = (field.key, field.max_len);
        let changed = match &mut field.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => apply(s, max_len),
            _ => false,
        };
        if changed {
            self.error = None;
            FormAction::Changed(key)
        } else {
            FormAction::None
        }
    }

    fn cycle_choice(&mut self, forward: bool) -> FormAction {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return FormAction::None;
        };
        match &mut field.value {
            FieldValue::Choice { options, selected } if !options.is_empty() => {
                let n = options.len();
                *selected = if forward { (*selected + 1) % n } else { (*selected + n - 1) % n };
                FormAction::Changed(field.key)
            }
            FieldValue::Toggle(v) => {
                *v = !*v;
                FormAction::Changed(field.key)
            }
            _ => FormAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(form: &mut Form, code: KeyCode) -> FormAction {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    fn login_form() -> Form {
        Form::new(vec![
            Field::text("email", "Email").required(),
            Field::secret("password", "Password").required(),
        ])
    }

    #[test]
    fn test_typing_and_enter_advances_then_submits() {
        let mut form = login_form();
        type_str(&mut form, "ana@olimpo.gym");
        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::None);
        assert_eq!(form.focus, 1);
        type_str(&mut form, "pw");
        assert_eq!(form.fields[1].display(), "**");
        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::Submit);
        assert_eq!(form.text("email"), "ana@olimpo.gym");
        assert_eq!(form.text("password"), "pw");
    }

    #[test]
    fn test_missing_required_reports_first_blank() {
        let mut form = login_form();
        assert_eq!(form.missing_required(), Some("Email"));
        type_str(&mut form, "a");
        assert_eq!(form.missing_required(), Some("Password"));
    }

    #[test]
    fn test_hidden_fields_are_skipped() {
        let mut form = Form::new(vec![
            Field::text("a", "A"),
            Field::text("b", "B"),
            Field::text("c", "C"),
        ]);
        form.set_hidden("b", true);
        press(&mut form, KeyCode::Tab);
        assert_eq!(form.focused().map(|f| f.key), Some("c"));
        press(&mut form, KeyCode::Tab);
        assert_eq!(form.focused().map(|f| f.key), Some("a"));
    }

    #[test]
    fn test_choice_cycles_and_reports_change() {
        let options = vec![("M".to_string(), "Monthly".to_string()), ("A".to_string(), "Annual".to_string())];
        let mut form = Form::new(vec![Field::choice("type", "Type", options)]);
        assert_eq!(form.choice("type").as_deref(), Some("M"));
        assert_eq!(press(&mut form, KeyCode::Left), FormAction::Changed("type"));
        assert_eq!(form.choice("type").as_deref(), Some("A"));
        form.set_choice("type", "M");
        assert_eq!(form.fields[0].display(), "< Monthly >");
    }

    #[test]
    fn test_toggle_with_space() {
        let mut form = Form::new(vec![Field::toggle("auto", "Auto-renew", false)]);
        press(&mut form, KeyCode::Char(' '));
        assert!(form.toggle("auto"));
    }

    #[test]
    fn test_length_limit_and_control_chars() {
        assert!(can_add_char(0, 3, 'a'));
        assert!(!can_add_char(3, 3, 'a'));
        assert!(!can_add_char(0, 3, '\u{7}'));
    }

    #[test]
    fn test_submitting_ignores_input() {
        let mut form = login_form();
        form.submitting = true;
        assert_eq!(press(&mut form, KeyCode::Char('x')), FormAction::None);
        assert_eq!(form.text("email"), "");
    }
}
