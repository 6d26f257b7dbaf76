//! Materialized form state: one input per field, defaults pre-filled.

use crate::api::{ArgValue, Args};

use super::operation::{FieldDefault, FieldSpec, InputKind};

/// Current value of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

#[derive(Debug, Clone)]
pub struct FieldInput {
    pub spec: FieldSpec,
    pub value: FieldValue,
}

impl FieldInput {
    fn from_spec(spec: &FieldSpec) -> Self {
        let value = match (spec.input_kind, &spec.default) {
            (InputKind::Checkbox, Some(FieldDefault::Checked(b))) => FieldValue::Checked(*b),
            (InputKind::Checkbox, _) => FieldValue::Checked(false),
            (_, Some(FieldDefault::Text(s))) => FieldValue::Text(s.clone()),
            (_, Some(FieldDefault::Checked(b))) => FieldValue::Text(b.to_string()),
            (_, None) => FieldValue::Text(String::new()),
        };
        Self {
            spec: spec.clone(),
            value,
        }
    }

    /// Display form of the value.
    pub fn display(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Checked(true) => "[x]".into(),
            FieldValue::Checked(false) => "[ ]".into(),
        }
    }
}

/// Form for one operation.
#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: Vec<FieldInput>,
    /// Whether this form is the visible one.
    pub active: bool,
    /// Index of the focused field.
    pub focused: usize,
}

impl FormState {
    pub fn new(specs: &[FieldSpec]) -> Self {
        Self {
            fields: specs.iter().map(FieldInput::from_spec).collect(),
            active: false,
            focused: 0,
        }
    }

    /// Read the current values. Checkboxes are always present as a bool;
    /// everything else is the raw entered text.
    pub fn collect(&self) -> Args {
        self.fields
            .iter()
            .map(|f| {
                let value = match &f.value {
                    FieldValue::Text(s) => ArgValue::Text(s.clone()),
                    FieldValue::Checked(b) => ArgValue::Flag(*b),
                };
                (f.spec.name.clone(), value)
            })
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldInput> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldInput> {
        self.fields.iter_mut().find(|f| f.spec.name == name)
    }

    /// Replace a text/number field's value. Returns false if no such
    /// field exists or it is a checkbox.
    pub fn set_text(&mut self, name: &str, value: &str) -> bool {
        match self.field_mut(name) {
            Some(f) if f.spec.input_kind != InputKind::Checkbox => {
                f.value = FieldValue::Text(value.to_string());
                true
            }
            _ => false,
        }
    }

    /// Set a checkbox. Returns false if no such checkbox exists.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        match self.field_mut(name) {
            Some(f) if f.spec.input_kind == InputKind::Checkbox => {
                f.value = FieldValue::Checked(checked);
                true
            }
            _ => false,
        }
    }

    /// Restore every field to its declared default.
    pub fn reset(&mut self) {
        for f in &mut self.fields {
            *f = FieldInput::from_spec(&f.spec);
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type a character into the focused field. Number fields take the
    /// characters a numeric input accepts: digits, sign, point, exponent.
    pub fn insert_char(&mut self, c: char) {
        let Some(f) = self.fields.get_mut(self.focused) else {
            return;
        };
        match (&mut f.value, f.spec.input_kind) {
            (FieldValue::Text(s), InputKind::Number) => {
                if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                    s.push(c);
                }
            }
            (FieldValue::Text(s), _) => s.push(c),
            (FieldValue::Checked(b), _) if c == ' ' => *b = !*b,
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(FieldInput {
            value: FieldValue::Text(s),
            ..
        }) = self.fields.get_mut(self.focused)
        {
            s.pop();
        }
    }

    /// Toggle the focused field if it is a checkbox.
    pub fn toggle(&mut self) {
        if let Some(FieldInput {
            value: FieldValue::Checked(b),
            ..
        }) = self.fields.get_mut(self.focused)
        {
            *b = !*b;
        }
    }
}
