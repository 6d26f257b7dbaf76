//! Operation definitions and the built-in catalog.

use std::fmt;
use std::str::FromStr;

use super::error::ConsoleError;

/// The server operations the console knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKey {
    Create,
    Update,
    Delete,
    Move,
    GetLevel,
    GetPath,
    GetSubLayer,
    GetTree,
}

impl OperationKey {
    pub const ALL: [OperationKey; 8] = [
        OperationKey::Create,
        OperationKey::Update,
        OperationKey::Delete,
        OperationKey::Move,
        OperationKey::GetLevel,
        OperationKey::GetPath,
        OperationKey::GetTree,
        OperationKey::GetSubLayer,
    ];

    /// Endpoint name, appended to the API base URL.
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKey::Create => "create",
            OperationKey::Update => "update",
            OperationKey::Delete => "delete",
            OperationKey::Move => "move",
            OperationKey::GetLevel => "getLevel",
            OperationKey::GetPath => "getPath",
            OperationKey::GetSubLayer => "getSubLayer",
            OperationKey::GetTree => "getTree",
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKey {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ConsoleError::UnknownOperationName(s.to_string()))
    }
}

/// Shape of an operation's result, which decides where it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Changes the tree; no direct result, the forest is re-fetched.
    Modify,
    /// A single scalar.
    QueryValue,
    /// A list of category rows.
    QueryList,
}

/// Input control bound to one request argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Checkbox,
}

/// Pre-filled value of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDefault {
    Text(String),
    Checked(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub input_kind: InputKind,
    pub default: Option<FieldDefault>,
}

impl FieldSpec {
    pub fn text(name: &str, label: &str) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            input_kind: InputKind::Text,
            default: None,
        }
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self {
            input_kind: InputKind::Number,
            ..Self::text(name, label)
        }
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self {
            input_kind: InputKind::Checkbox,
            ..Self::text(name, label)
        }
    }

    /// Set a text default (verbatim, also for number fields).
    pub fn with_value(mut self, value: &str) -> Self {
        self.default = Some(FieldDefault::Text(value.into()));
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.default = Some(FieldDefault::Checked(checked));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDefinition {
    pub key: OperationKey,
    pub display_name: String,
    pub kind: OperationKind,
    pub fields: Vec<FieldSpec>,
}

impl OperationDefinition {
    pub fn new(
        key: OperationKey,
        display_name: &str,
        kind: OperationKind,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            kind,
            fields,
        }
    }
}

/// The demo operations, in tab order.
pub fn catalog() -> Vec<OperationDefinition> {
    use OperationKind::*;

    vec![
        OperationDefinition::new(
            OperationKey::Create,
            "Create",
            Modify,
            vec![
                FieldSpec::number("parentId", "Parent category"),
                FieldSpec::text("name", "Name").with_value("New category"),
            ],
        ),
        OperationDefinition::new(
            OperationKey::Update,
            "Update",
            Modify,
            vec![
                FieldSpec::number("id", "Category ID").with_value("1"),
                FieldSpec::text("newName", "New name").with_value("New name"),
            ],
        ),
        OperationDefinition::new(
            OperationKey::Delete,
            "Delete",
            Modify,
            vec![
                FieldSpec::number("id", "Category ID").with_value("7"),
                FieldSpec::checkbox("single", "Only this node, not the subtree"),
            ],
        ),
        OperationDefinition::new(
            OperationKey::Move,
            "Move",
            Modify,
            vec![
                FieldSpec::number("id", "Category ID").with_value("2"),
                FieldSpec::number("parent", "New parent").with_value("7"),
                FieldSpec::checkbox("single", "Only this node, not the subtree"),
            ],
        ),
        OperationDefinition::new(
            OperationKey::GetLevel,
            "Level",
            QueryValue,
            vec![FieldSpec::number("id", "Node ID").with_value("7")],
        ),
        OperationDefinition::new(
            OperationKey::GetPath,
            "Path",
            QueryList,
            vec![
                FieldSpec::number("ancestor", "Ancestor ID").with_value("0"),
                FieldSpec::number("descendant", "Descendant ID").with_value("8"),
            ],
        ),
        OperationDefinition::new(
            OperationKey::GetTree,
            "Subtree",
            QueryList,
            vec![FieldSpec::number("id", "Node ID").with_value("7")],
        ),
        OperationDefinition::new(
            OperationKey::GetSubLayer,
            "Sub-layer",
            QueryList,
            vec![
                FieldSpec::number("id", "Node ID").with_value("7"),
                FieldSpec::number("depth", "Distance N").with_value("1"),
            ],
        ),
    ]
}
