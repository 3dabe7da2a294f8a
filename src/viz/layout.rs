use crate::terminal::Terminal;
use crossterm::style::Color;

// Box drawing characters (rounded)
pub const BOX_TL: char = '╭';
pub const BOX_TR: char = '╮';
pub const BOX_BL: char = '╰';
pub const BOX_BR: char = '╯';
pub const BOX_H: char = '─';
pub const BOX_V: char = '│';
pub const BOX_TITLE_L: char = '┤';
pub const BOX_TITLE_R: char = '├';

// Partial block characters for smooth meters (1/8 increments)
pub const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// A bordered box with title (btop-style)
pub struct Box {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
    pub title: String,
    pub title_color: Color,
    pub border_color: Color,
}

impl Box {
    pub fn new(x: i32, y: i32, width: u16, height: u16, title: &str) -> Self {
        Self {
            x,
            y,
            width,
            height,
            title: title.to_string(),
            title_color: Color::White,
            border_color: Color::DarkGrey,
        }
    }

    /// Inner content area (excluding borders)
    pub fn inner_x(&self) -> i32 { self.x + 1 }
    pub fn inner_y(&self) -> i32 { self.y + 1 }
    pub fn inner_width(&self) -> u16 { self.width.saturating_sub(2) }
    pub fn inner_height(&self) -> u16 { self.height.saturating_sub(2) }

    /// Draw the box border and title
    pub fn draw(&self, term: &mut Terminal) {
        let w = self.width as i32;
        let h = self.height as i32;
        let bc = Some(self.border_color);

        term.set(self.x, self.y, BOX_TL, bc, false);

        // Title centered in the top border
        let title_start = if !self.title.is_empty() {
            let title_w = self.title.len() + 4; // "┤ title ├"
            let padding = ((w - 2) as usize).saturating_sub(title_w) / 2;

            for i in 1..=padding as i32 {
                term.set(self.x + i, self.y, BOX_H, bc, false);
            }

            let tx = self.x + 1 + padding as i32;
            term.set(tx, self.y, BOX_TITLE_L, bc, false);
            term.set(tx + 1, self.y, ' ', None, false);
            term.set_str(tx + 2, self.y, &self.title, Some(self.title_color), true);
            term.set(tx + 2 + self.title.len() as i32, self.y, ' ', None, false);
            term.set(tx + 3 + self.title.len() as i32, self.y, BOX_TITLE_R, bc, false);

            tx + 4 + self.title.len() as i32
        } else {
            self.x + 1
        };

        for i in title_start..(self.x + w - 1) {
            term.set(i, self.y, BOX_H, bc, false);
        }
        term.set(self.x + w - 1, self.y, BOX_TR, bc, false);

        for i in 1..(h - 1) {
            term.set(self.x, self.y + i, BOX_V, bc, false);
            term.set(self.x + w - 1, self.y + i, BOX_V, bc, false);
        }

        term.set(self.x, self.y + h - 1, BOX_BL, bc, false);
        for i in 1..(w - 1) {
            term.set(self.x + i, self.y + h - 1, BOX_H, bc, false);
        }
        term.set(self.x + w - 1, self.y + h - 1, BOX_BR, bc, false);
    }
}

/// Draw a smooth meter using partial block characters
pub fn draw_meter_smooth(
    term: &mut Terminal,
    x: i32,
    y: i32,
    width: usize,
    percent: f32,
    color: Color,
) {
    if width == 0 {
        return;
    }

    let fill = (percent / 100.0).clamp(0.0, 1.0) * width as f32;
    let full_blocks = fill as usize;
    let partial = ((fill - full_blocks as f32) * 8.0) as usize;

    for i in 0..width {
        let ch = if i < full_blocks {
            BLOCKS[8]
        } else if i == full_blocks && partial > 0 {
            BLOCKS[partial]
        } else {
            BLOCKS[0]
        };
        term.set(x + i as i32, y, ch, Some(color), false);
    }
}
