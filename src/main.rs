use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use treely::terminal::{KeyCode, KeyEvent, KeyModifiers, Terminal, TerminalEvent};
use treely::ui::span::truncate_line;
use treely::widgets::tree::TreeView;

/// Terminal viewer for JSON and simple indented configuration text.
#[derive(Debug, Parser)]
#[command(name = "treely", version, about)]
struct Args {
    /// File to display; stdin is read when omitted.
    path: Option<PathBuf>,

    /// Text shown when the input is empty.
    #[arg(long)]
    placeholder: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
    }
}

fn run() -> io::Result<()> {
    let args = Args::parse();

    let (text, label) = match &args.path {
        Some(path) => {
            let label = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (fs::read_to_string(path)?, label)
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            (buffer, "stdin".to_string())
        }
    };

    let mut tree = TreeView::new("document", label);
    if let Some(placeholder) = args.placeholder {
        tree = tree.with_placeholder(placeholder);
    }
    tree.set_text(text);

    let mut terminal = Terminal::new()?;
    terminal.enter_alternate_screen()?;
    terminal.enter_raw_mode()?;
    terminal.set_line_wrap(false)?;
    terminal.hide_cursor()?;

    let result = event_loop(&mut terminal, &mut tree);

    terminal.show_cursor()?;
    terminal.set_line_wrap(true)?;
    terminal.exit_raw_mode()?;
    terminal.leave_alternate_screen()?;

    result
}

fn event_loop(terminal: &mut Terminal, tree: &mut TreeView) -> io::Result<()> {
    sync_viewport(terminal, tree);
    let mut render_requested = true;

    loop {
        if terminal.poll(Duration::from_millis(100))? {
            match terminal.read_event()? {
                TerminalEvent::Key(key) => {
                    if should_exit(key) {
                        break;
                    }
                    if tree.on_key(key) {
                        render_requested = true;
                    }
                }
                TerminalEvent::Resize { .. } => {
                    sync_viewport(terminal, tree);
                    render_requested = true;
                }
            }
        }

        if render_requested {
            draw(terminal, tree)?;
            render_requested = false;
        }
    }

    Ok(())
}

fn should_exit(key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    key.modifiers == KeyModifiers::NONE && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
}

fn sync_viewport(terminal: &Terminal, tree: &mut TreeView) {
    // One row for the label line, one spare so the footer stays on screen.
    let rows = terminal.size().height.saturating_sub(2).max(1);
    tree.set_max_visible(rows as usize);
}

fn draw(terminal: &mut Terminal, tree: &TreeView) -> io::Result<()> {
    let size = terminal.size();
    terminal.move_cursor(0, 0)?;
    terminal.clear_from_cursor_down()?;

    for (row, line) in tree.render_lines(true).into_iter().enumerate() {
        if row as u16 >= size.height {
            break;
        }
        terminal.move_cursor(0, row as u16)?;
        terminal.render_line(&truncate_line(&line, size.width as usize))?;
    }

    terminal.flush()
}
