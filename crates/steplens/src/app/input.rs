use super::scroll::WHEEL_ROWS;
use super::{App, Focus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use steplens_core::NavInput;

/// Step-view key binding for a directional input
fn nav_input_for(code: KeyCode) -> Option<NavInput> {
    match code {
        KeyCode::Left | KeyCode::Char('h') => Some(NavInput::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(NavInput::Right),
        KeyCode::Up | KeyCode::Char('k') => Some(NavInput::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(NavInput::Down),
        _ => None,
    }
}

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Bindings that work regardless of focus
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') if ctrl => {
                self.request_decompile();
                return;
            }
            KeyCode::F(5) => {
                self.request_decompile();
                return;
            }
            KeyCode::Tab => {
                self.show_help = false;
                self.toggle_focus();
                return;
            }
            _ => {}
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        match self.focus {
            Focus::Editor => {
                if key.code == KeyCode::Esc {
                    self.focus = Focus::Steps;
                } else {
                    self.editor.input(key);
                }
            }
            Focus::Steps => self.handle_steps_key(key),
        }
    }

    fn handle_steps_key(&mut self, key: KeyEvent) {
        if let Some(input) = nav_input_for(key.code) {
            self.navigate(input);
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Char('e') | KeyCode::Char('i') => self.focus = Focus::Editor,
            KeyCode::Char('<') | KeyCode::Home => {
                self.goto_step(0);
            }
            KeyCode::Char('>') | KeyCode::End => {
                self.goto_step(self.nav.num_steps().saturating_sub(1));
            }
            KeyCode::Char('J') | KeyCode::PageDown => {
                self.scroll_panel(1, WHEEL_ROWS);
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                self.scroll_panel(1, -WHEEL_ROWS);
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.show_help {
            return;
        }
        match event.kind {
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let delta = if event.kind == MouseEventKind::ScrollDown {
                    WHEEL_ROWS
                } else {
                    -WHEEL_ROWS
                };
                if let Some(panel) = self.panel_at(event.column, event.row) {
                    self.scroll_panel(panel, delta);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let pos = Position::new(event.column, event.row);
                let hit = self.ministep_areas.iter().find(|(a, _)| a.contains(pos));
                if let Some(&(_, step)) = hit {
                    self.goto_step(step);
                }
            }
            _ => {}
        }
    }
}
