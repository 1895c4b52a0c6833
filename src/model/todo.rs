use serde::{Deserialize, Serialize};

/// Generate a fresh todo id: a random (v4) UUID in hyphenated lowercase form,
/// e.g. `3f2b8c1e-9a4d-4e6f-b1c2-7d8e9f0a1b2c`.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().hyphenated().to_string()
}

/// A todo item and its (recursive) children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique id, fixed at creation
    pub id: String,
    /// Todo text
    #[serde(alias = "todoText")]
    pub text: String,
    /// Completion flag (does not cascade)
    #[serde(default)]
    pub completed: bool,
    /// Child todos in insertion order
    #[serde(default, alias = "todos")]
    pub children: Vec<Todo>,
}

impl Todo {
    /// Create an incomplete leaf todo with a freshly generated id
    pub fn new(text: impl Into<String>) -> Self {
        Todo {
            id: new_id(),
            text: text.into(),
            completed: false,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
