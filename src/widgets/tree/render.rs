use crate::core::collapse::CollapseState;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::widgets::tree::window::{WindowPlan, WindowStates};

/// Lists at or past this length render their children through the window
/// planner instead of direct recursion.
pub const VIRTUALIZE_THRESHOLD: usize = 100;

/// Read-only state the renderer consults while walking a tree.
pub struct RenderEnv<'a> {
    pub collapse: &'a CollapseState,
    pub windows: &'a WindowStates,
}

/// How a node is introduced by its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    None,
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Null,
    Bool,
    Number,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub path: ValuePath,
    pub label: Label,
    pub body: RenderBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderBody {
    /// Primitive token; strings arrive already quote-wrapped.
    Scalar { kind: ScalarKind, text: String },
    /// `{}` or `[]`: a plain literal with nothing to toggle.
    EmptyContainer { literal: &'static str },
    /// Object or list with a disclosure control.
    Branch {
        summary: String,
        collapsed: bool,
        children: BranchChildren,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BranchChildren {
    /// Collapsed branches render no children at all.
    Hidden,
    Inline(Vec<RenderNode>),
    Windowed(WindowedChildren),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowedChildren {
    pub len: usize,
    pub plan: WindowPlan,
    pub items: Vec<WindowItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowItem {
    pub index: usize,
    /// Absolute offset of this item within the list's virtual extent.
    pub offset: f32,
    pub node: RenderNode,
}

/// Walks `value` depth-first and pre-order into a disclosure tree.
///
/// The walk never mutates anything: collapse flags and window plans are
/// read from `env`, and toggling happens upstream in the widget that owns
/// the store.
pub fn render_value(value: &Value, path: ValuePath, label: Label, env: &RenderEnv) -> RenderNode {
    let body = match value {
        Value::Null => scalar(ScalarKind::Null, "null".to_string()),
        Value::Bool(flag) => scalar(ScalarKind::Bool, flag.to_string()),
        Value::Number(number) => scalar(ScalarKind::Number, number.to_string()),
        Value::Text(text) => scalar(ScalarKind::Text, format!("\"{text}\"")),
        Value::List(items) if items.is_empty() => RenderBody::EmptyContainer { literal: "[]" },
        Value::Object(entries) if entries.is_empty() => {
            RenderBody::EmptyContainer { literal: "{}" }
        }
        Value::List(items) => {
            let collapsed = env.collapse.is_collapsed(&path);
            let children = if collapsed {
                BranchChildren::Hidden
            } else if items.len() >= VIRTUALIZE_THRESHOLD {
                BranchChildren::Windowed(window_children(items, &path, env))
            } else {
                BranchChildren::Inline(
                    items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| {
                            render_value(item, path.child_index(index), Label::Index(index), env)
                        })
                        .collect(),
                )
            };
            RenderBody::Branch {
                summary: count_label(items.len(), "item"),
                collapsed,
                children,
            }
        }
        Value::Object(entries) => {
            let collapsed = env.collapse.is_collapsed(&path);
            let children = if collapsed {
                BranchChildren::Hidden
            } else {
                BranchChildren::Inline(
                    entries
                        .iter()
                        .map(|(key, child)| {
                            render_value(
                                child,
                                path.child_key(key.as_str()),
                                Label::Key(key.clone()),
                                env,
                            )
                        })
                        .collect(),
                )
            };
            RenderBody::Branch {
                summary: count_label(entries.len(), "key"),
                collapsed,
                children,
            }
        }
    };

    RenderNode { path, label, body }
}

fn window_children(items: &[Value], path: &ValuePath, env: &RenderEnv) -> WindowedChildren {
    let plan = env.windows.plan(path, items.len());
    let mut rendered = Vec::with_capacity(plan.range.len());
    for (slot, index) in plan.range.clone().enumerate() {
        let node = render_value(
            &items[index],
            path.child_index(index),
            Label::Index(index),
            env,
        );
        rendered.push(WindowItem {
            index,
            offset: plan.offsets[slot],
            node,
        });
    }
    WindowedChildren {
        len: items.len(),
        plan,
        items: rendered,
    }
}

fn scalar(kind: ScalarKind, text: String) -> RenderBody {
    RenderBody::Scalar { kind, text }
}

fn count_label(count: usize, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BranchChildren, Label, RenderBody, RenderEnv, RenderNode, ScalarKind, VIRTUALIZE_THRESHOLD,
        render_value,
    };
    use crate::core::collapse::CollapseState;
    use crate::core::value::Value;
    use crate::core::value_path::ValuePath;
    use crate::widgets::tree::window::{ROW_UNIT, WindowStates};

    fn render(value: &Value, collapse: &CollapseState) -> RenderNode {
        let windows = WindowStates::new(10.0 * ROW_UNIT);
        let env = RenderEnv { collapse, windows: &windows };
        render_value(value, ValuePath::root(), Label::None, &env)
    }

    fn list_of(len: usize) -> Value {
        Value::List((0..len).map(|i| Value::Number(i as f64)).collect())
    }

    #[test]
    fn scalars_render_as_classified_tokens() {
        let parsed: Value =
            serde_json::from_str(r#"{"s":"hi","n":4,"b":false,"z":null}"#).expect("valid json");
        let node = render(&parsed, &CollapseState::new());

        let RenderBody::Branch { children: BranchChildren::Inline(children), .. } = &node.body
        else {
            panic!("expected an inline branch");
        };

        let texts: Vec<(ScalarKind, &str)> = children
            .iter()
            .map(|child| match &child.body {
                RenderBody::Scalar { kind, text } => (*kind, text.as_str()),
                other => panic!("expected scalar, got {other:?}"),
            })
            .collect();
        assert_eq!(
            texts,
            [
                (ScalarKind::Text, "\"hi\""),
                (ScalarKind::Number, "4"),
                (ScalarKind::Bool, "false"),
                (ScalarKind::Null, "null"),
            ]
        );
    }

    #[test]
    fn summaries_count_and_pluralize() {
        let one_key: Value = serde_json::from_str(r#"{"a":1}"#).expect("valid json");
        let RenderBody::Branch { summary, .. } = render(&one_key, &CollapseState::new()).body
        else {
            panic!("expected branch");
        };
        assert_eq!(summary, "1 key");

        let RenderBody::Branch { summary, .. } = render(&list_of(3), &CollapseState::new()).body
        else {
            panic!("expected branch");
        };
        assert_eq!(summary, "3 items");
    }

    #[test]
    fn empty_containers_are_plain_literals() {
        let parsed: Value = serde_json::from_str(r#"{"a":{},"b":[]}"#).expect("valid json");
        let node = render(&parsed, &CollapseState::new());

        let RenderBody::Branch { children: BranchChildren::Inline(children), .. } = &node.body
        else {
            panic!("expected an inline branch");
        };
        assert_eq!(children[0].body, RenderBody::EmptyContainer { literal: "{}" });
        assert_eq!(children[1].body, RenderBody::EmptyContainer { literal: "[]" });
    }

    #[test]
    fn collapsed_branches_hide_children() {
        let mut collapse = CollapseState::new();
        collapse.toggle(ValuePath::root());

        let node = render(&list_of(3), &collapse);
        let RenderBody::Branch { collapsed, children, .. } = node.body else {
            panic!("expected branch");
        };
        assert!(collapsed);
        assert_eq!(children, BranchChildren::Hidden);
    }

    #[test]
    fn short_lists_recurse_inline() {
        let node = render(&list_of(VIRTUALIZE_THRESHOLD - 1), &CollapseState::new());
        let RenderBody::Branch { children, .. } = node.body else {
            panic!("expected branch");
        };
        let BranchChildren::Inline(children) = children else {
            panic!("expected inline children below the threshold");
        };
        assert_eq!(children.len(), VIRTUALIZE_THRESHOLD - 1);
        assert_eq!(children[2].label, Label::Index(2));
        assert_eq!(children[2].path, ValuePath::root().child_index(2));
    }

    #[test]
    fn threshold_length_lists_are_windowed() {
        let node = render(&list_of(VIRTUALIZE_THRESHOLD), &CollapseState::new());
        let RenderBody::Branch { children, .. } = node.body else {
            panic!("expected branch");
        };
        let BranchChildren::Windowed(windowed) = children else {
            panic!("expected windowed children at the threshold");
        };
        assert_eq!(windowed.len, VIRTUALIZE_THRESHOLD);
        assert!(windowed.items.len() < VIRTUALIZE_THRESHOLD);
    }

    #[test]
    fn windowed_items_keep_their_true_paths() {
        let node = render(&list_of(500), &CollapseState::new());
        let RenderBody::Branch { children: BranchChildren::Windowed(windowed), .. } = node.body
        else {
            panic!("expected windowed branch");
        };
        for item in &windowed.items {
            assert_eq!(item.node.path, ValuePath::root().child_index(item.index));
            assert_eq!(item.node.label, Label::Index(item.index));
        }
    }

    #[test]
    fn nested_structures_inside_windows_render_normally() {
        let items: Vec<Value> = (0..200)
            .map(|i| {
                serde_json::from_str(&format!(r#"{{"id":{i},"tags":["x"]}}"#)).expect("valid json")
            })
            .collect();
        let node = render(&Value::List(items), &CollapseState::new());

        let RenderBody::Branch { children: BranchChildren::Windowed(windowed), .. } = node.body
        else {
            panic!("expected windowed branch");
        };
        let first = &windowed.items[0].node;
        let RenderBody::Branch { children: BranchChildren::Inline(fields), .. } = &first.body
        else {
            panic!("expected object items");
        };
        assert_eq!(fields[0].label, Label::Key("id".to_string()));
        assert_eq!(
            fields[1].path,
            ValuePath::root().child_index(0).child_key("tags")
        );
    }

    #[test]
    fn scenario_two_keys_with_list() {
        let parsed: Value = serde_json::from_str(r#"{"a":1,"b":[1,2,3]}"#).expect("valid json");
        let node = render(&parsed, &CollapseState::new());

        let RenderBody::Branch { summary, children: BranchChildren::Inline(children), .. } =
            &node.body
        else {
            panic!("expected inline branch");
        };
        assert_eq!(summary, "2 keys");

        assert_eq!(children[0].label, Label::Key("a".to_string()));
        assert_eq!(
            children[0].body,
            RenderBody::Scalar { kind: ScalarKind::Number, text: "1".to_string() }
        );

        assert_eq!(children[1].label, Label::Key("b".to_string()));
        let RenderBody::Branch { summary, .. } = &children[1].body else {
            panic!("expected list branch");
        };
        assert_eq!(summary, "3 items");
    }
}
