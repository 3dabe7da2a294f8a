//! Terminal renderers
//!
//! Each view is its own module with a `run()` function that owns its event
//! loop. Views consume read-only snapshots from the intel pipeline.

pub mod globe;
pub mod heatmap;
pub mod layout;
pub mod worldmap;

use crate::colors::ColorState;
use crate::help::render_help_overlay;
use crate::terminal::Terminal;
use crossterm::event::{KeyCode, KeyModifiers};

/// Runtime state for interactive controls (shared by both views)
pub struct VizState {
    pub speed: f32,        // Current speed (time per frame)
    pub colors: ColorState,
    pub paused: bool,
    pub show_help: bool,
    help_text: &'static str,
}

impl VizState {
    pub fn new(initial_speed: f32, help_text: &'static str) -> Self {
        Self {
            speed: initial_speed,
            colors: ColorState::new(0),
            paused: false,
            show_help: false,
            help_text,
        }
    }

    /// Handle keypress, returns true if should quit
    pub fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> bool {
        if self.colors.handle_key(code) {
            return false;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('?') | KeyCode::Char('h') => self.show_help = !self.show_help,
            // Number keys: change speed (1=fastest, 9=slowest, 0=very slow)
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let n = c.to_digit(10).unwrap() as u8;
                self.speed = match n {
                    0 => 0.2,
                    1 => 0.005,
                    2 => 0.01,
                    3 => 0.02,
                    4 => 0.03,
                    5 => 0.05,
                    6 => 0.07,
                    7 => 0.1,
                    8 => 0.15,
                    9 => 0.2,
                    _ => self.speed,
                };
            }
            _ => {}
        }
        false
    }

    pub fn scheme(&self) -> u8 {
        self.colors.scheme
    }

    pub fn render_help(&self, term: &mut Terminal, width: u16, height: u16) {
        if self.show_help {
            render_help_overlay(term, width, height, self.help_text);
        }
    }
}
