use crate::model::todo::Todo;

/// Error type for id-addressed tree operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("todo not found: {0}")]
    NotFound(String),
}

/// A located todo: the node, its index, and the list that owns it
#[derive(Debug, Clone, Copy)]
pub struct TodoRef<'a> {
    pub todo: &'a Todo,
    pub index: usize,
    pub list: &'a [Todo],
}

/// Mutable handle to the list owning a located todo
#[derive(Debug)]
pub struct TodoRefMut<'a> {
    pub index: usize,
    pub list: &'a mut Vec<Todo>,
}

impl TodoRefMut<'_> {
    pub fn todo(&mut self) -> &mut Todo {
        &mut self.list[self.index]
    }
}

// ---------------------------------------------------------------------------
// Locator
// ---------------------------------------------------------------------------

/// Find a todo by id anywhere in the tree.
///
/// Depth-first: a node's children are searched before the node itself is
/// tested, so a descendant match wins over its ancestor.
pub fn locate<'a>(list: &'a [Todo], id: &str) -> Option<TodoRef<'a>> {
    for (index, todo) in list.iter().enumerate() {
        if let Some(found) = locate(&todo.children, id) {
            return Some(found);
        }
        if todo.id == id {
            return Some(TodoRef { todo, index, list });
        }
    }
    None
}

/// Mutable variant of [`locate`]. Same search order.
pub fn locate_mut<'a>(list: &'a mut Vec<Todo>, id: &str) -> Option<TodoRefMut<'a>> {
    let path = locate_path(list, id)?;
    let (&index, parents) = path.split_last()?;
    let mut list = list;
    for &i in parents {
        list = &mut list[i].children;
    }
    Some(TodoRefMut { index, list })
}

/// Index path from the root to the todo with `id` (last element is the
/// todo's own index in its list).
pub fn locate_path(list: &[Todo], id: &str) -> Option<Vec<usize>> {
    let mut path = Vec::new();
    if locate_path_inner(list, id, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn locate_path_inner(list: &[Todo], id: &str, path: &mut Vec<usize>) -> bool {
    for (i, todo) in list.iter().enumerate() {
        path.push(i);
        if locate_path_inner(&todo.children, id, path) {
            return true;
        }
        if todo.id == id {
            return true;
        }
        path.pop();
    }
    false
}

/// The child list of the todo with `id`
pub fn children_mut<'a>(list: &'a mut Vec<Todo>, id: &str) -> Result<&'a mut Vec<Todo>, TreeError> {
    let found = locate_mut(list, id).ok_or_else(|| TreeError::NotFound(id.to_string()))?;
    Ok(&mut found.list[found.index].children)
}

// ---------------------------------------------------------------------------
// Mutator
// ---------------------------------------------------------------------------

/// Append a new todo to `list`. Returns the new id.
/// Callers are responsible for trimming and for skipping empty text.
pub fn add_todo(list: &mut Vec<Todo>, text: impl Into<String>) -> String {
    let todo = Todo::new(text);
    let id = todo.id.clone();
    list.push(todo);
    id
}

/// Replace the text of the todo at `index`
pub fn edit_text(list: &mut [Todo], index: usize, text: impl Into<String>) {
    debug_assert!(index < list.len(), "edit_text: index {} out of range", index);
    list[index].text = text.into();
}

/// Remove the todo at `index` together with its subtree
pub fn delete_at(list: &mut Vec<Todo>, index: usize) -> Todo {
    debug_assert!(index < list.len(), "delete_at: index {} out of range", index);
    list.remove(index)
}

/// Flip the completed flag of the todo at `index` (children untouched)
pub fn toggle_completed(list: &mut [Todo], index: usize) {
    debug_assert!(
        index < list.len(),
        "toggle_completed: index {} out of range",
        index
    );
    let todo = &mut list[index];
    todo.completed = !todo.completed;
}

/// Remove every todo whose id is in `ids`, in the order given.
///
/// Ids that no longer resolve are skipped: when a completed todo sits under
/// a completed ancestor, the ancestor's removal already took it out.
/// Returns the removed todos (each with its subtree).
pub fn delete_completed<'a, I>(root: &mut Vec<Todo>, ids: I) -> Vec<Todo>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut removed = Vec::new();
    for id in ids {
        if let Some(found) = locate_mut(root, id) {
            removed.push(delete_at(found.list, found.index));
        }
    }
    removed
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Total number of todos in the tree
pub fn count_todos(list: &[Todo]) -> usize {
    list.iter().map(|t| 1 + count_todos(&t.children)).sum()
}

/// Number of completed todos anywhere in the tree
pub fn count_completed(list: &[Todo]) -> usize {
    list.iter()
        .map(|t| usize::from(t.completed) + count_completed(&t.children))
        .sum()
}

pub fn any_completed(list: &[Todo]) -> bool {
    list.iter().any(|t| t.completed || any_completed(&t.children))
}

pub fn contains_id(list: &[Todo], id: &str) -> bool {
    locate(list, id).is_some()
}

/// Ids of completed todos in pre-order (parents before their children)
pub fn completed_ids(list: &[Todo]) -> Vec<String> {
    let mut ids = Vec::new();
    collect_completed(list, &mut ids);
    ids
}

fn collect_completed(list: &[Todo], ids: &mut Vec<String>) {
    for todo in list {
        if todo.completed {
            ids.push(todo.id.clone());
        }
        collect_completed(&todo.children, ids);
    }
}
