use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{Event, KeyEventKind, poll, read};
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{cursor, execute, queue, terminal};

use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::terminal::terminal_event::TerminalEvent;
use crate::ui::span::SpanLine;
use crate::ui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

pub struct Terminal {
    stdout: Stdout,
    size: Size,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout();
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            size: Size { width, height },
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    pub fn set_line_wrap(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(self.stdout, terminal::EnableLineWrap)?;
        } else {
            execute!(self.stdout, terminal::DisableLineWrap)?;
        }
        Ok(())
    }

    pub fn enter_alternate_screen(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::EnterAlternateScreen)
    }

    pub fn leave_alternate_screen(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::LeaveAlternateScreen)
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Hide)
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Show)
    }

    pub fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(x, y))
    }

    pub fn clear_from_cursor_down(&mut self) -> io::Result<()> {
        queue!(self.stdout, terminal::Clear(terminal::ClearType::FromCursorDown))
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    /// Blocks for the next key press or resize, skipping everything else.
    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            match read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let Some(mapped) = map_key_event(key) else {
                        continue;
                    };
                    return Ok(TerminalEvent::Key(mapped));
                }
                Event::Resize(width, height) => {
                    self.size = Size { width, height };
                    return Ok(TerminalEvent::Resize { width, height });
                }
                _ => continue,
            }
        }
    }

    pub fn render_line(&mut self, line: &SpanLine) -> io::Result<()> {
        for span in line {
            if let Some(color) = span.style.color {
                queue!(self.stdout, SetForegroundColor(map_color(color)))?;
            }
            if let Some(color) = span.style.background {
                queue!(self.stdout, SetBackgroundColor(map_color(color)))?;
            }
            if span.style.bold {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            if span.style.dim {
                queue!(self.stdout, SetAttribute(Attribute::Dim))?;
            }

            queue!(self.stdout, Print(span.text.as_str()))?;

            if !span.style.is_plain() {
                queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

fn map_key_event(event: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    Some(KeyEvent {
        code: map_key_code(event.code)?,
        modifiers: map_key_modifiers(event.modifiers),
    })
}

fn map_key_code(code: crossterm::event::KeyCode) -> Option<KeyCode> {
    let mapped = match code {
        crossterm::event::KeyCode::Char(ch) => KeyCode::Char(ch),
        crossterm::event::KeyCode::Enter => KeyCode::Enter,
        crossterm::event::KeyCode::Esc => KeyCode::Esc,
        crossterm::event::KeyCode::Backspace => KeyCode::Backspace,
        crossterm::event::KeyCode::Tab => KeyCode::Tab,
        crossterm::event::KeyCode::Up => KeyCode::Up,
        crossterm::event::KeyCode::Down => KeyCode::Down,
        crossterm::event::KeyCode::Left => KeyCode::Left,
        crossterm::event::KeyCode::Right => KeyCode::Right,
        crossterm::event::KeyCode::Home => KeyCode::Home,
        crossterm::event::KeyCode::End => KeyCode::End,
        crossterm::event::KeyCode::PageUp => KeyCode::PageUp,
        crossterm::event::KeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(mapped)
}

fn map_key_modifiers(modifiers: crossterm::event::KeyModifiers) -> KeyModifiers {
    let mut mapped = KeyModifiers::NONE;
    if modifiers.contains(crossterm::event::KeyModifiers::SHIFT) {
        mapped = mapped.with(KeyModifiers::SHIFT);
    }
    if modifiers.contains(crossterm::event::KeyModifiers::CONTROL) {
        mapped = mapped.with(KeyModifiers::CONTROL);
    }
    if modifiers.contains(crossterm::event::KeyModifiers::ALT) {
        mapped = mapped.with(KeyModifiers::ALT);
    }
    mapped
}

fn map_color(color: Color) -> crossterm::style::Color {
    match color {
        Color::Black => crossterm::style::Color::Black,
        Color::DarkGrey => crossterm::style::Color::DarkGrey,
        Color::Red => crossterm::style::Color::Red,
        Color::Green => crossterm::style::Color::Green,
        Color::Yellow => crossterm::style::Color::Yellow,
        Color::Blue => crossterm::style::Color::Blue,
        Color::Magenta => crossterm::style::Color::Magenta,
        Color::Cyan => crossterm::style::Color::Cyan,
        Color::White => crossterm::style::Color::White,
    }
}
