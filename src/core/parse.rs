use indexmap::IndexMap;

use crate::core::value::Value;

/// Turns raw text into a tree value, or `None` when the text has no
/// structured reading.
///
/// Strict JSON is tried first. Anything that fails it gets one pass of the
/// line-oriented fallback below, which reads an indentation-based
/// `key: value` convention and is deliberately lossy: it exists to give a
/// tree preview of simple configuration-style text, not to be a YAML
/// parser.
pub fn parse_document(input: &str) -> Option<Value> {
    if input.trim().is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(input) {
        return Some(value);
    }
    parse_indented(input)
}

enum Scope {
    Object(IndexMap<String, Value>),
    List(Vec<Value>),
}

struct Frame {
    scope: Scope,
    /// Indentation of the line that opened this scope; the root has none.
    opened_at: Option<usize>,
    /// Indentation of the scope's first child, fixed when it arrives.
    child_indent: Option<usize>,
    /// Key in the parent object this scope folds into on close.
    key: Option<String>,
}

enum LineAction {
    OpenObject { key: String },
    OpenList { key: String },
    InsertPair { key: String, value: Value },
    PushItem(Value),
    Skip,
}

fn parse_indented(input: &str) -> Option<Value> {
    let mut stack: Vec<Frame> = Vec::new();

    for raw in input.lines() {
        let line = raw.trim_end();
        let content = line.trim_start();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let indent = line.len() - content.len();

        if stack.is_empty() {
            let scope = if content.starts_with("- ") || content == "-" {
                Scope::List(Vec::new())
            } else {
                Scope::Object(IndexMap::new())
            };
            stack.push(Frame {
                scope,
                opened_at: None,
                child_indent: Some(indent),
                key: None,
            });
        }

        close_to_indent(&mut stack, indent);

        let Some(top) = stack.last_mut() else {
            continue;
        };
        if top.child_indent.is_none() {
            top.child_indent = Some(indent);
        }

        match line_action(&top.scope, content) {
            LineAction::OpenObject { key } => stack.push(Frame {
                scope: Scope::Object(IndexMap::new()),
                opened_at: Some(indent),
                child_indent: None,
                key: Some(key),
            }),
            LineAction::OpenList { key } => stack.push(Frame {
                scope: Scope::List(Vec::new()),
                opened_at: Some(indent),
                child_indent: None,
                key: Some(key),
            }),
            LineAction::InsertPair { key, value } => {
                if let Scope::Object(entries) = &mut top.scope {
                    entries.insert(key, value);
                }
            }
            LineAction::PushItem(value) => {
                if let Scope::List(items) = &mut top.scope {
                    items.push(value);
                }
            }
            LineAction::Skip => {}
        }
    }

    while stack.len() > 1 {
        fold_top(&mut stack);
    }

    let root = stack.pop()?;
    match root.scope {
        Scope::Object(entries) if entries.is_empty() => None,
        Scope::List(items) if items.is_empty() => None,
        Scope::Object(entries) => Some(Value::Object(entries)),
        Scope::List(items) => Some(Value::List(items)),
    }
}

fn line_action(scope: &Scope, content: &str) -> LineAction {
    if let Scope::List(_) = scope {
        let entry = if let Some(rest) = content.strip_prefix("- ") {
            rest.trim_start()
        } else if content == "-" {
            ""
        } else {
            content
        };
        if entry.is_empty() {
            return LineAction::PushItem(Value::Null);
        }
        return LineAction::PushItem(coerce_scalar(entry));
    }

    // Object scope: only `key: value` lines contribute. Anything without a
    // colon is noise the fallback cannot place, so it is dropped and a
    // document made of nothing else comes out empty.
    let Some((raw_key, raw_value)) = content.split_once(':') else {
        return LineAction::Skip;
    };
    let key = unquote(raw_key.trim()).to_string();
    if key.is_empty() {
        return LineAction::Skip;
    }

    match raw_value.trim() {
        "" | "{}" => LineAction::OpenObject { key },
        "[]" => LineAction::OpenList { key },
        rest => LineAction::InsertPair {
            key,
            value: coerce_scalar(rest),
        },
    }
}

fn close_to_indent(stack: &mut Vec<Frame>, indent: usize) {
    while stack.len() > 1 {
        let top = &stack[stack.len() - 1];
        let close = match top.child_indent {
            // A scope with children closes once a line dedents past them.
            Some(child_indent) => indent < child_indent,
            // A scope that never got a child closes unless this line is its
            // first child, sitting deeper than the opener.
            None => top.opened_at.is_some_and(|opened| indent <= opened),
        };
        if !close {
            break;
        }
        fold_top(stack);
    }
}

fn fold_top(stack: &mut Vec<Frame>) {
    let Some(frame) = stack.pop() else {
        return;
    };
    let value = match frame.scope {
        Scope::Object(entries) => Value::Object(entries),
        Scope::List(items) => Value::List(items),
    };
    let Some(parent) = stack.last_mut() else {
        return;
    };
    match (&mut parent.scope, frame.key) {
        (Scope::Object(entries), Some(key)) => {
            entries.insert(key, value);
        }
        (Scope::List(items), _) => items.push(value),
        (Scope::Object(_), None) => {}
    }
}

/// Coercion ladder for fallback scalars: boolean literals, null, numeric
/// literals, quoted strings (quotes stripped), then the raw text.
fn coerce_scalar(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if looks_numeric(text)
        && let Ok(number) = text.parse::<f64>()
    {
        return Value::Number(number);
    }
    let stripped = unquote(text);
    if stripped.len() != text.len() {
        return Value::Text(stripped.to_string());
    }
    Value::Text(text.to_string())
}

fn looks_numeric(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if !(first.is_ascii_digit() || first == '-') {
        return false;
    }
    text.chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
}

fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &text[1..text.len() - 1];
        }
    }
    text
}
