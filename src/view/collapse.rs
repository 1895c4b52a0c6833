use std::collections::HashSet;

use super::rendered::{CollapseLabel, ListTarget, RenderedTodo, RenderedTree};

/// Ids of every hidden sublist in the view, at any depth (including
/// sublists nested inside hidden ones).
pub fn capture_collapsed(view: &RenderedTree) -> HashSet<String> {
    let mut collapsed = HashSet::new();
    collect_hidden(&view.items, &mut collapsed);
    collapsed
}

fn collect_hidden(items: &[RenderedTodo], collapsed: &mut HashSet<String>) {
    for item in items {
        if let Some(sub) = &item.sublist {
            if sub.hidden {
                collapsed.insert(sub.id.clone());
            }
            collect_hidden(&sub.items, collapsed);
        }
    }
}

pub fn is_collapsed(collapsed: &HashSet<String>, id: &str) -> bool {
    collapsed.contains(id)
}

/// Show or hide the sublist of todo `id` and relabel its control.
///
/// Only acts when the todo has both a sublist and a collapse control.
/// If the pending input ends up inside a hidden subtree it moves to the
/// root list. Returns whether anything changed.
pub fn toggle_collapse(view: &mut RenderedTree, id: &str) -> bool {
    let Some(todo) = view.find_mut(id) else {
        return false;
    };
    let (Some(sub), Some(control)) = (todo.sublist.as_mut(), todo.collapse_control.as_mut())
    else {
        return false;
    };

    sub.hidden = !sub.hidden;
    *control = CollapseLabel::for_hidden(sub.hidden);
    let now_hidden = sub.hidden;

    if now_hidden && view.list_is_within(&view.input.attached_to, id) {
        view.input.attached_to = ListTarget::Root;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::rendered::test_support::*;

    #[test]
    fn test_capture_finds_nested_hidden() {
        let mut view = sample_view();
        let collapsed = capture_collapsed(&view);
        assert_eq!(collapsed, HashSet::from(["a".to_string()]));

        view.find_mut("b").unwrap().sublist.as_mut().unwrap().hidden = true;
        let collapsed = capture_collapsed(&view);
        assert!(is_collapsed(&collapsed, "a"));
        assert!(is_collapsed(&collapsed, "b"));
        assert!(!is_collapsed(&collapsed, "c"));
    }

    #[test]
    fn test_capture_on_empty_view() {
        assert!(capture_collapsed(&RenderedTree::default()).is_empty());
    }

    #[test]
    fn test_toggle_expands_then_collapses() {
        let mut view = sample_view();
        assert!(toggle_collapse(&mut view, "a"));
        let a = view.find("a").unwrap();
        assert!(!a.sublist.as_ref().unwrap().hidden);
        assert_eq!(a.collapse_control, Some(CollapseLabel::Collapse));

        assert!(toggle_collapse(&mut view, "a"));
        let a = view.find("a").unwrap();
        assert!(a.sublist.as_ref().unwrap().hidden);
        assert_eq!(a.collapse_control, Some(CollapseLabel::Expand));
    }

    #[test]
    fn test_toggle_on_leaf_or_unknown_is_noop() {
        let mut view = sample_view();
        let before = view.clone();
        assert!(!toggle_collapse(&mut view, "e"));
        assert!(!toggle_collapse(&mut view, "missing"));
        assert_eq!(view, before);
    }

    #[test]
    fn test_toggle_needs_a_control() {
        let mut view = sample_view();
        // A freshly opened sub input list has no control yet
        let e = view.find_mut("e").unwrap();
        e.sublist = Some(crate::view::rendered::Sublist {
            id: "e".into(),
            hidden: false,
            items: vec![],
        });
        assert!(!toggle_collapse(&mut view, "e"));
        assert!(!view.find("e").unwrap().sublist.as_ref().unwrap().hidden);
    }

    #[test]
    fn test_hiding_moves_input_out() {
        let mut view = sample_view();
        toggle_collapse(&mut view, "a");
        view.input.attached_to = ListTarget::sublist("b");
        toggle_collapse(&mut view, "a");
        assert_eq!(view.input.attached_to, ListTarget::Root);
    }

    #[test]
    fn test_hiding_elsewhere_keeps_input() {
        let mut view = sample_view();
        toggle_collapse(&mut view, "a");
        view.input.attached_to = ListTarget::sublist("a");
        toggle_collapse(&mut view, "b");
        assert_eq!(view.input.attached_to, ListTarget::sublist("a"));
    }
}
