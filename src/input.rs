//! Event loop and key handling.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use crate::app::{App, Section};
use crate::config::Config;
use crate::ui;

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running the app
    Continue,
    /// Exit the app
    Exit,
}

/// Run the main application loop.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &Config,
) -> io::Result<()> {
    let behavior = &config.behavior;
    let mut last_cursor_toggle = Instant::now();

    loop {
        // Drain stream events before drawing so fragments show up promptly
        app.process_stream();

        terminal.draw(|f| ui::ui(f, app))?;

        if last_cursor_toggle.elapsed() >= Duration::from_millis(behavior.cursor_blink_ms) {
            app.toggle_cursor();
            last_cursor_toggle = Instant::now();
        }

        // Fast polling while a pitch is in flight, slower when idle
        let timeout = if app.is_streaming() {
            Duration::from_millis(behavior.stream_frame_ms)
        } else {
            Duration::from_millis(behavior.idle_poll_ms)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.cursor_visible = true;
                    last_cursor_toggle = Instant::now();

                    if handle_key_event(app, key.code, key.modifiers, config) == HandleResult::Exit {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Handle a key event and return whether to continue or exit.
pub fn handle_key_event(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    config: &Config,
) -> HandleResult {
    let page_size = config.behavior.scroll_page_size;

    // Global shortcuts
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return HandleResult::Exit;
        }
        KeyCode::Char('t') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_theme();
            return HandleResult::Continue;
        }
        KeyCode::Tab => {
            app.next_section();
            return HandleResult::Continue;
        }
        KeyCode::BackTab => {
            app.previous_section();
            return HandleResult::Continue;
        }
        KeyCode::Up => app.scroll.scroll_up(),
        KeyCode::Down => app.scroll.scroll_down(),
        KeyCode::PageUp => app.scroll.scroll_page_up(page_size),
        KeyCode::PageDown => app.scroll.scroll_page_down(page_size),
        KeyCode::Home => app.scroll.scroll_to_top(),
        KeyCode::End => app.scroll.scroll_to_bottom(),
        _ => {
            if app.section == Section::Pitch {
                return handle_pitch_keys(app, code, modifiers);
            }
            return handle_browse_keys(app, code);
        }
    }
    HandleResult::Continue
}

/// Keys on the portfolio tabs.
fn handle_browse_keys(app: &mut App, code: KeyCode) -> HandleResult {
    match code {
        KeyCode::Char('q') => return HandleResult::Exit,
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('c') => app.open_contact(),
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            if let Some(section) = Section::all().get(index) {
                app.select_section(*section);
            }
        }
        KeyCode::Left if app.section == Section::Projects => app.select_previous_project(),
        KeyCode::Right if app.section == Section::Projects => app.select_next_project(),
        KeyCode::Char('o') if app.section == Section::Projects => app.open_selected_project(),
        _ => {}
    }
    HandleResult::Continue
}

/// Keys on the Pitch tab, where printable characters go to the input.
fn handle_pitch_keys(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> HandleResult {
    match code {
        KeyCode::Char('x') if modifiers.contains(KeyModifiers::CONTROL) => app.cancel_pitch(),
        KeyCode::Esc => {
            app.dismiss_error();
        }
        KeyCode::Enter => app.submit_pitch(),
        KeyCode::Char(c) if app.pitch.can_submit() && !modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert(c)
        }
        KeyCode::Backspace if app.pitch.can_submit() => app.input.backspace(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        _ => {}
    }
    HandleResult::Continue
}
