pub mod render;
pub mod window;

use crate::core::collapse::CollapseState;
use crate::core::parse::parse_document;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::base::WidgetBase;
use crate::widgets::scroll::RowCursor;

use render::{BranchChildren, Label, RenderBody, RenderEnv, RenderNode, ScalarKind, render_value};
use window::{ROW_UNIT, WindowStates};

const DEFAULT_PLACEHOLDER: &str = "Nothing to display yet";
const DEFAULT_VISIBLE_ROWS: usize = 20;

/// Interactive tree view over a text document.
///
/// The widget owns the raw text, the parsed value, the collapse store and
/// the per-list window state. Empty text renders the placeholder; text the
/// parser cannot interpret renders verbatim, so the user never loses what
/// they typed.
pub struct TreeView {
    base: WidgetBase,
    text: String,
    parsed: Option<Value>,
    collapse: CollapseState,
    windows: WindowStates,
    placeholder: String,
    rows: Vec<Row>,
    nav: RowCursor,
}

#[derive(Debug, Clone)]
struct Row {
    depth: usize,
    label: Label,
    kind: RowKind,
    path: ValuePath,
    /// Windowed list this row was planned by, when any.
    window: Option<ValuePath>,
}

#[derive(Debug, Clone)]
enum RowKind {
    Toggle { summary: String, collapsed: bool },
    Scalar { kind: ScalarKind, text: String },
    Literal { text: &'static str },
    WindowFooter { start: usize, end: usize, len: usize },
}

impl TreeView {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(id, label),
            text: String::new(),
            parsed: None,
            collapse: CollapseState::new(),
            windows: WindowStates::new(DEFAULT_VISIBLE_ROWS as f32 * ROW_UNIT),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            rows: Vec::new(),
            nav: RowCursor::new(Some(DEFAULT_VISIBLE_ROWS)),
        }
    }

    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    pub fn with_max_visible(mut self, rows: usize) -> Self {
        self.set_max_visible(rows);
        self
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    pub fn label(&self) -> &str {
        self.base.label()
    }

    /// Replaces the document text and reparses it. Collapse and window
    /// entries are kept as-is: paths that still exist keep their state,
    /// stale ones simply stop matching anything.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.parsed = parse_document(&self.text);
        self.rebuild();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    pub fn set_max_visible(&mut self, rows: usize) {
        let rows = rows.max(1);
        self.nav.set_max_visible(Some(rows));
        self.windows.set_viewport_height(rows as f32 * ROW_UNIT);
        self.rebuild();
    }

    pub fn collapse_all(&mut self) -> bool {
        let Some(value) = &self.parsed else {
            return false;
        };
        self.collapse.collapse_all(value);
        self.rebuild();
        true
    }

    pub fn expand_all(&mut self) -> bool {
        if self.parsed.is_none() {
            return false;
        }
        self.collapse.expand_all();
        self.rebuild();
        true
    }

    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers != KeyModifiers::NONE {
            return false;
        }
        match key.code {
            KeyCode::Up => self.move_active(-1),
            KeyCode::Down => self.move_active(1),
            KeyCode::Right => self.expand_active(),
            KeyCode::Left => self.collapse_active(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_active(),
            KeyCode::Char('c') => self.collapse_all(),
            KeyCode::Char('e') => self.expand_all(),
            KeyCode::Char(']') => self.scroll_window(1.0),
            KeyCode::Char('[') => self.scroll_window(-1.0),
            _ => false,
        }
    }

    pub fn render_lines(&self, focused: bool) -> Vec<SpanLine> {
        let mut lines = Vec::new();
        if !self.base.label().is_empty() {
            lines.push(vec![Span::new(self.base.label())]);
        }

        if self.text.trim().is_empty() {
            lines.push(vec![Span::styled(
                self.placeholder.as_str(),
                Style::new().color(Color::DarkGrey),
            )]);
            return lines;
        }

        if self.parsed.is_none() {
            // Unparseable input stays on screen verbatim.
            lines.extend(self.text.lines().map(|line| vec![Span::new(line)]));
            return lines;
        }

        let total = self.rows.len();
        let (start, end) = self.nav.visible_range(total);
        for position in start..end {
            lines.push(self.render_row(position, focused));
        }
        if let Some(footer) = self.nav.footer(total) {
            lines.push(vec![Span::styled(
                footer,
                Style::new().color(Color::DarkGrey),
            )]);
        }

        lines
    }

    fn render_row(&self, position: usize, focused: bool) -> SpanLine {
        let row = &self.rows[position];
        let active = focused && position == self.nav.active();

        let dim = Style::new().color(Color::DarkGrey);
        let cursor_style = if active {
            Style::new().color(Color::Yellow)
        } else {
            dim
        };
        let mut line: SpanLine = vec![Span::styled(if active { "❯ " } else { "  " }, cursor_style)];
        line.push(Span::new("  ".repeat(row.depth)));

        if let RowKind::WindowFooter { start, end, len } = &row.kind {
            line.push(Span::styled(
                format!("[{}-{} of {}]", start + 1, end, len),
                dim,
            ));
            return line;
        }

        let icon = match &row.kind {
            RowKind::Toggle { collapsed: true, .. } => "▶ ",
            RowKind::Toggle { collapsed: false, .. } => "▼ ",
            _ => "  ",
        };
        let icon_style = if active {
            Style::new().color(Color::Cyan).bold()
        } else {
            dim
        };
        line.push(Span::styled(icon, icon_style));

        match &row.label {
            Label::None => {}
            Label::Key(key) => {
                line.push(Span::styled(
                    key.as_str(),
                    Style::new().color(Color::Blue).bold(),
                ));
                line.push(Span::styled(": ", dim));
            }
            Label::Index(index) => {
                line.push(Span::styled(format!("{index}: "), dim));
            }
        }

        match &row.kind {
            RowKind::Toggle { summary, .. } => {
                let style = if active {
                    Style::new().color(Color::Cyan).bold()
                } else {
                    dim
                };
                line.push(Span::styled(summary.as_str(), style));
            }
            RowKind::Scalar { kind, text } => {
                line.push(Span::styled(text.as_str(), scalar_style(*kind)));
            }
            RowKind::Literal { text } => line.push(Span::styled(*text, dim)),
            RowKind::WindowFooter { .. } => {}
        }

        line
    }

    fn move_active(&mut self, delta: isize) -> bool {
        self.nav.move_by(delta, self.rows.len())
    }

    fn toggle_active(&mut self) -> bool {
        let Some(row) = self.rows.get(self.nav.active()) else {
            return false;
        };
        if !matches!(row.kind, RowKind::Toggle { .. }) {
            return false;
        }
        let path = row.path.clone();
        self.collapse.toggle(path);
        self.rebuild();
        true
    }

    fn expand_active(&mut self) -> bool {
        let Some(row) = self.rows.get(self.nav.active()) else {
            return false;
        };
        if !matches!(row.kind, RowKind::Toggle { collapsed: true, .. }) {
            return false;
        }
        let path = row.path.clone();
        self.collapse.toggle(path);
        self.rebuild();
        true
    }

    /// Collapses the active branch, or walks the cursor up to the parent
    /// row when the active node has nothing left to fold.
    fn collapse_active(&mut self) -> bool {
        let active = self.nav.active();
        let Some(row) = self.rows.get(active) else {
            return false;
        };
        if matches!(row.kind, RowKind::Toggle { collapsed: false, .. }) {
            let path = row.path.clone();
            self.collapse.toggle(path);
            self.rebuild();
            return true;
        }
        if row.depth == 0 {
            return false;
        }
        let target_depth = row.depth - 1;
        let parent = (0..active).rev().find(|&i| self.rows[i].depth == target_depth);
        if let Some(parent) = parent {
            self.nav.set_active(parent, self.rows.len());
            return true;
        }
        false
    }

    /// Pages the windowed list the cursor is in (or the first one on
    /// screen) by one viewport height in the given direction.
    fn scroll_window(&mut self, direction: f32) -> bool {
        let target = self
            .rows
            .get(self.nav.active())
            .and_then(|row| row.window.clone())
            .or_else(|| self.rows.iter().find_map(|row| row.window.clone()));
        let Some(path) = target else {
            return false;
        };
        let Some(len) = self.windowed_len(&path) else {
            return false;
        };
        let page = self.windows.viewport_height();
        self.windows.scroll_by(&path, len, direction * page);
        self.rebuild();
        true
    }

    fn windowed_len(&self, path: &ValuePath) -> Option<usize> {
        match self.parsed.as_ref()?.at_path(path)? {
            Value::List(items) => Some(items.len()),
            _ => None,
        }
    }

    fn rebuild(&mut self) {
        self.rows.clear();
        let Some(value) = &self.parsed else {
            self.nav.clamp(0);
            return;
        };

        let env = RenderEnv {
            collapse: &self.collapse,
            windows: &self.windows,
        };
        let tree = render_value(value, ValuePath::root(), Label::None, &env);

        let mut measurements = Vec::new();
        flatten(&tree, 0, None, &mut self.rows, &mut measurements);
        for (path, index, rows) in measurements {
            self.windows.record(&path, index, rows as f32 * ROW_UNIT);
        }

        self.nav.clamp(self.rows.len());
    }
}

fn flatten(
    node: &RenderNode,
    depth: usize,
    window: Option<&ValuePath>,
    rows: &mut Vec<Row>,
    measurements: &mut Vec<(ValuePath, usize, usize)>,
) {
    let kind = match &node.body {
        RenderBody::Scalar { kind, text } => RowKind::Scalar {
            kind: *kind,
            text: text.clone(),
        },
        RenderBody::EmptyContainer { literal } => RowKind::Literal { text: literal },
        RenderBody::Branch { summary, collapsed, .. } => RowKind::Toggle {
            summary: summary.clone(),
            collapsed: *collapsed,
        },
    };
    rows.push(Row {
        depth,
        label: node.label.clone(),
        kind,
        path: node.path.clone(),
        window: window.cloned(),
    });

    let RenderBody::Branch { children, .. } = &node.body else {
        return;
    };
    match children {
        BranchChildren::Hidden => {}
        BranchChildren::Inline(items) => {
            for child in items {
                flatten(child, depth + 1, window, rows, measurements);
            }
        }
        BranchChildren::Windowed(windowed) => {
            for item in &windowed.items {
                let before = rows.len();
                flatten(&item.node, depth + 1, Some(&node.path), rows, measurements);
                measurements.push((node.path.clone(), item.index, rows.len() - before));
            }
            rows.push(Row {
                depth: depth + 1,
                label: Label::None,
                kind: RowKind::WindowFooter {
                    start: windowed.plan.range.start,
                    end: windowed.plan.range.end,
                    len: windowed.len,
                },
                path: node.path.clone(),
                window: Some(node.path.clone()),
            });
        }
    }
}

fn scalar_style(kind: ScalarKind) -> Style {
    match kind {
        ScalarKind::Null => Style::new().color(Color::DarkGrey),
        ScalarKind::Bool => Style::new().color(Color::Magenta),
        ScalarKind::Number => Style::new().color(Color::Yellow),
        ScalarKind::Text => Style::new().color(Color::Green),
    }
}
