//! A sink that records draw calls instead of rasterizing them
//!
//! Used by the headless binary and by tests that assert on frame contents.

use std::collections::HashMap;

use super::{Color, RenderSink, Sheet, SrcRect};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill(Color),
    Place {
        sheet: Sheet,
        x: i32,
        y: i32,
        src: SrcRect,
        flip: bool,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
    },
}

/// Records the current frame's commands
#[derive(Debug, Clone)]
pub struct RecordingSink {
    width: i32,
    height: i32,
    /// Commands issued since the last `present`
    pub commands: Vec<DrawCommand>,
    /// Frames presented so far
    pub frames: u64,
    /// Sheets touched during the session, with how often each was drawn
    pub sheet_uses: HashMap<Sheet, u64>,
}

impl RecordingSink {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            frames: 0,
            sheet_uses: HashMap::new(),
        }
    }

    /// Text drawn this frame, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sprites placed this frame from `sheet`
    pub fn placed(&self, sheet: Sheet) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Place { sheet: s, .. } if *s == sheet))
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSink for RecordingSink {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn fill(&mut self, color: Color) {
        // A fill starts a new frame
        self.commands.clear();
        self.commands.push(DrawCommand::Fill(color));
    }

    fn place(&mut self, sheet: Sheet, dest_x: i32, dest_y: i32, src: SrcRect, flip: bool) {
        if dest_x >= self.width || dest_y >= self.height || dest_x + src.w <= 0 || dest_y + src.h <= 0 {
            return;
        }
        *self.sheet_uses.entry(sheet).or_default() += 1;
        self.commands.push(DrawCommand::Place {
            sheet,
            x: dest_x,
            y: dest_y,
            src,
            flip,
        });
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}
