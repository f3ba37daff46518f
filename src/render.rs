//! Terminal frame composition and presentation
//!
//! Composition is pure: a [`Frame`] is a character grid built from game
//! state, so tests can assert on cells without a terminal. Presentation
//! writes the grid with termion escapes to whatever `Write` the caller owns.

use std::io::{self, Write};

use termion::{clear, color, cursor};

use crate::sim::state::{GameState, Paddle, Viewport};
use crate::to_device;

const WALL_CH: char = '─';
const PADDLE_CH: char = '█';
const CAP_CH: char = 'o';
const BALL_CH: char = 'O';
const MARKER_CH: char = '·';

/// Vertical offset of the score glyphs below the top wall, in logical pixels
const SCORE_DROP: f32 = 75.0;

/// One composed terminal frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub cols: u16,
    pub rows: u16,
    cells: Vec<char>,
    /// Debug center markers, drawn in red on top of the grid
    markers: Vec<(u16, u16)>,
}

impl Frame {
    fn blank(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![' '; cols as usize * rows as usize],
            markers: Vec::new(),
        }
    }

    /// Compose a frame from the current game state
    pub fn compose(state: &GameState, cols: u16, rows: u16, debug_markers: bool) -> Self {
        let mut frame = Self::blank(cols, rows);
        let viewport = state.viewport;

        // Top and bottom walls
        for col in 0..cols as i32 {
            frame.plot(col, 0, WALL_CH);
            frame.plot(col, rows as i32 - 1, WALL_CH);
        }

        for paddle in &state.paddles {
            frame.draw_paddle(paddle, viewport, debug_markers);
        }

        let (ball_col, ball_row) = frame.cell_of(state.ball.pos.x, state.ball.pos.y, viewport);
        frame.plot(ball_col, ball_row, BALL_CH);
        if debug_markers {
            frame.mark(ball_col, ball_row);
        }

        frame
    }

    fn draw_paddle(&mut self, paddle: &Paddle, viewport: Viewport, debug_markers: bool) {
        let anchor = paddle.anchor_x();
        let half = paddle.height / 2.0;
        let (col, top) = self.cell_of(anchor, paddle.y_offset + half, viewport);
        let (_, bottom) = self.cell_of(anchor, paddle.y_offset - half, viewport);

        // Device rows grow downward, so top <= bottom
        for row in top..=bottom {
            self.plot(col, row, PADDLE_CH);
        }
        self.plot(col, top, CAP_CH);
        self.plot(col, bottom, CAP_CH);

        let (_, center_row) = self.cell_of(anchor, paddle.y_offset, viewport);
        if debug_markers {
            self.mark(col, center_row);
        }

        // Score sits just inside the paddle, below the top wall
        let score_x = anchor - paddle.width * 2.0 * anchor.signum();
        let score_y = viewport.height / 2.0 - SCORE_DROP * viewport.ratio();
        let (score_col, score_row) = self.cell_of(score_x, score_y, viewport);
        for (i, ch) in paddle.score.to_string().chars().enumerate() {
            self.plot(score_col + i as i32, score_row, ch);
        }
    }

    /// Map a logical coordinate to a terminal cell
    fn cell_of(&self, x: f32, y: f32, viewport: Viewport) -> (i32, i32) {
        let (dx, dy) = to_device(x, y, viewport);
        let col = (dx / viewport.width * self.cols as f32).floor() as i32;
        let row = (dy / viewport.height * self.rows as f32).floor() as i32;
        (col.min(self.cols as i32 - 1), row.min(self.rows as i32 - 1))
    }

    fn plot(&mut self, col: i32, row: i32, ch: char) {
        if col >= 0 && col < self.cols as i32 && row >= 0 && row < self.rows as i32 {
            self.cells[row as usize * self.cols as usize + col as usize] = ch;
        }
    }

    fn mark(&mut self, col: i32, row: i32) {
        if col >= 0 && col < self.cols as i32 && row >= 0 && row < self.rows as i32 {
            self.markers.push((col as u16, row as u16));
        }
    }

    /// Cell contents, for assertions and row assembly
    pub fn cell(&self, col: u16, row: u16) -> char {
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    /// Write the frame to the terminal
    pub fn present<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "{}{}", clear::All, cursor::Goto(1, 1))?;
        for row in 0..self.rows {
            write!(w, "{}", cursor::Goto(1, row + 1))?;
            let line: String = (0..self.cols).map(|col| self.cell(col, row)).collect();
            w.write_all(line.as_bytes())?;
        }
        for &(col, row) in &self.markers {
            write!(
                w,
                "{}{}{MARKER_CH}{}",
                cursor::Goto(col + 1, row + 1),
                color::Fg(color::Red),
                color::Fg(color::Reset)
            )?;
        }
        w.flush()
    }
}
