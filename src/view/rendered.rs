//! The retained view of the todo tree.
//!
//! A [`RenderedTree`] is what a render pass produces: one [`RenderedTodo`] per
//! todo, nested [`Sublist`]s that can be hidden, and the single
//! [`PendingInput`] slot where new todo text is typed. Interactions that do
//! not touch the todo data (collapse toggles, moving the input) act on this
//! structure directly.

/// Which list something belongs to: the root list, or the children of a todo
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ListTarget {
    #[default]
    Root,
    /// The child list of the todo with this id
    Sublist(String),
}

impl ListTarget {
    pub fn sublist(id: impl Into<String>) -> Self {
        ListTarget::Sublist(id.into())
    }
}

/// Label of a todo's collapse control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseLabel {
    /// Shown while the sublist is visible
    Collapse,
    /// Shown while the sublist is hidden
    Expand,
}

impl CollapseLabel {
    pub fn for_hidden(hidden: bool) -> Self {
        if hidden {
            CollapseLabel::Expand
        } else {
            CollapseLabel::Collapse
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            CollapseLabel::Collapse => "Collapse",
            CollapseLabel::Expand => "Expand",
        }
    }
}

/// A nested list of rendered todos. Its id is the id of the owning todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sublist {
    pub id: String,
    pub hidden: bool,
    pub items: Vec<RenderedTodo>,
}

/// The rendered form of one todo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTodo {
    pub id: String,
    pub text: String,
    /// State of the completion checkbox
    pub completed: bool,
    /// Present only for todos with children
    pub collapse_control: Option<CollapseLabel>,
    pub sublist: Option<Sublist>,
}

/// The one place new todo text is entered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingInput {
    pub attached_to: ListTarget,
}

/// Output of a render pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedTree {
    pub items: Vec<RenderedTodo>,
    pub input: PendingInput,
    pub delete_completed_visible: bool,
}

impl RenderedTree {
    /// Find a rendered todo by id (document order)
    pub fn find(&self, id: &str) -> Option<&RenderedTodo> {
        find_in(&self.items, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut RenderedTodo> {
        find_in_mut(&mut self.items, id)
    }

    /// The list that holds the todo with `id`
    pub fn list_of(&self, id: &str) -> Option<ListTarget> {
        list_of_in(&self.items, id, &ListTarget::Root)
    }

    /// Items of a list, if it exists in the view
    pub fn list_items(&self, target: &ListTarget) -> Option<&[RenderedTodo]> {
        match target {
            ListTarget::Root => Some(&self.items),
            ListTarget::Sublist(id) => self
                .find(id)
                .and_then(|t| t.sublist.as_ref())
                .map(|s| s.items.as_slice()),
        }
    }

    /// Whether a list exists and neither it nor any enclosing sublist is hidden
    pub fn is_list_visible(&self, target: &ListTarget) -> bool {
        match target {
            ListTarget::Root => true,
            ListTarget::Sublist(id) => visible_sublist_in(&self.items, id),
        }
    }

    /// Whether the list `target` is the sublist of `id` or lies anywhere inside it
    pub fn list_is_within(&self, target: &ListTarget, id: &str) -> bool {
        let ListTarget::Sublist(target_id) = target else {
            return false;
        };
        if target_id == id {
            return true;
        }
        self.find(id)
            .and_then(|t| t.sublist.as_ref())
            .is_some_and(|s| find_in(&s.items, target_id).is_some())
    }

    /// Ids of todos whose checkbox is checked, in document order
    pub fn completed_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        collect_completed(&self.items, &mut ids);
        ids
    }

    pub fn any_completed(&self) -> bool {
        any_completed_in(&self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn find_in<'a>(items: &'a [RenderedTodo], id: &str) -> Option<&'a RenderedTodo> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = item.sublist.as_ref().and_then(|s| find_in(&s.items, id)) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(items: &'a mut [RenderedTodo], id: &str) -> Option<&'a mut RenderedTodo> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = item
            .sublist
            .as_mut()
            .and_then(|s| find_in_mut(&mut s.items, id))
        {
            return Some(found);
        }
    }
    None
}

fn list_of_in(items: &[RenderedTodo], id: &str, current: &ListTarget) -> Option<ListTarget> {
    for item in items {
        if item.id == id {
            return Some(current.clone());
        }
        if let Some(sub) = &item.sublist
            && let Some(found) = list_of_in(&sub.items, id, &ListTarget::Sublist(sub.id.clone()))
        {
            return Some(found);
        }
    }
    None
}

fn visible_sublist_in(items: &[RenderedTodo], id: &str) -> bool {
    items.iter().any(|item| match &item.sublist {
        Some(sub) if !sub.hidden => sub.id == id || visible_sublist_in(&sub.items, id),
        _ => false,
    })
}

fn collect_completed(items: &[RenderedTodo], ids: &mut Vec<String>) {
    for item in items {
        if item.completed {
            ids.push(item.id.clone());
        }
        if let Some(sub) = &item.sublist {
            collect_completed(&sub.items, ids);
        }
    }
}

fn any_completed_in(items: &[RenderedTodo]) -> bool {
    items.iter().any(|item| {
        item.completed
            || item
                .sublist
                .as_ref()
                .is_some_and(|s| any_completed_in(&s.items))
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn leaf(id: &str, completed: bool) -> RenderedTodo {
        RenderedTodo {
            id: id.into(),
            text: id.to_uppercase(),
            completed,
            collapse_control: None,
            sublist: None,
        }
    }

    pub fn branch(id: &str, hidden: bool, items: Vec<RenderedTodo>) -> RenderedTodo {
        RenderedTodo {
            id: id.into(),
            text: id.to_uppercase(),
            completed: false,
            collapse_control: Some(CollapseLabel::for_hidden(hidden)),
            sublist: Some(Sublist {
                id: id.into(),
                hidden,
                items,
            }),
        }
    }

    /// a (hidden)
    /// ├── b
    /// │   └── c
    /// └── d [x]
    /// e [x]
    pub fn sample_view() -> RenderedTree {
        RenderedTree {
            items: vec![
                branch(
                    "a",
                    true,
                    vec![branch("b", false, vec![leaf("c", false)]), leaf("d", true)],
                ),
                leaf("e", true),
            ],
            input: PendingInput::default(),
            delete_completed_visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_find_and_list_of() {
        let view = sample_view();
        assert_eq!(view.find("c").unwrap().text, "C");
        assert!(view.find("zz").is_none());
        assert_eq!(view.list_of("a"), Some(ListTarget::Root));
        assert_eq!(view.list_of("c"), Some(ListTarget::sublist("b")));
        assert_eq!(view.list_of("d"), Some(ListTarget::sublist("a")));
        assert_eq!(view.list_of("zz"), None);
    }

    #[test]
    fn test_list_items() {
        let view = sample_view();
        assert_eq!(view.list_items(&ListTarget::Root).unwrap().len(), 2);
        assert_eq!(view.list_items(&ListTarget::sublist("a")).unwrap().len(), 2);
        assert!(view.list_items(&ListTarget::sublist("c")).is_none());
    }

    #[test]
    fn test_visibility_accounts_for_ancestors() {
        let mut view = sample_view();
        assert!(view.is_list_visible(&ListTarget::Root));
        assert!(!view.is_list_visible(&ListTarget::sublist("a")));
        // b's own sublist is shown, but it sits inside a's hidden one
        assert!(!view.is_list_visible(&ListTarget::sublist("b")));
        assert!(!view.is_list_visible(&ListTarget::sublist("e")));

        view.find_mut("a").unwrap().sublist.as_mut().unwrap().hidden = false;
        assert!(view.is_list_visible(&ListTarget::sublist("a")));
        assert!(view.is_list_visible(&ListTarget::sublist("b")));
    }

    #[test]
    fn test_list_within() {
        let view = sample_view();
        assert!(view.list_is_within(&ListTarget::sublist("a"), "a"));
        assert!(view.list_is_within(&ListTarget::sublist("b"), "a"));
        assert!(!view.list_is_within(&ListTarget::sublist("a"), "b"));
        assert!(!view.list_is_within(&ListTarget::Root, "a"));
    }

    #[test]
    fn test_completed_in_document_order() {
        let view = sample_view();
        assert_eq!(view.completed_ids(), vec!["d", "e"]);
        assert!(view.any_completed());
        assert!(!RenderedTree::default().any_completed());
    }

    #[test]
    fn test_collapse_label_text() {
        assert_eq!(CollapseLabel::for_hidden(true).text(), "Expand");
        assert_eq!(CollapseLabel::for_hidden(false).text(), "Collapse");
    }
}
