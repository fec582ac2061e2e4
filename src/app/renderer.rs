use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    engine::Snapshot,
    maze::CellKind,
    solvers::{Outcome, Solver},
};

/// The width of each cell when rendered, in character widths.
const CELL_WIDTH: u16 = 2;

/// Colored glyph drawn for a cell of the given kind.
fn cell_symbol(kind: CellKind) -> StyledContent<&'static str> {
    let styled_symbol = match kind {
        CellKind::Wall => "⬛".with(Color::White),
        CellKind::Open => "  ".with(Color::Reset),
        CellKind::Frontier => "🟧".with(Color::DarkYellow),
        CellKind::Visited => "🟨".with(Color::Yellow),
        CellKind::Route => "🟪".with(Color::Magenta),
        CellKind::Start => "🟩".with(Color::Green),
        CellKind::End => "🟥".with(Color::Red),
    };

    #[cfg(debug_assertions)]
    {
        use unicode_width::UnicodeWidthStr;
        assert_eq!(
            styled_symbol.content().width(),
            CELL_WIDTH as usize,
            "Each cell must occupy exactly two character widths."
        );
    }

    styled_symbol
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    solver: Solver,
}

impl Renderer {
    /// Rows reserved below the grid for the status line and hints
    pub const NUM_STATUS_ROWS: u16 = 2;

    pub fn new(solver: Solver) -> Self {
        Self {
            stdout: std::io::stdout(),
            solver,
        }
    }

    /// Whether the terminal can show a `rows` x `cols` grid plus the status rows.
    pub fn fits_terminal(rows: u16, cols: u16) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        Ok(term_width >= cols.saturating_mul(CELL_WIDTH)
            && term_height >= rows.saturating_add(Renderer::NUM_STATUS_ROWS))
    }

    pub fn clear(&mut self) -> std::io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        self.stdout.flush()
    }

    /// Draws every cell of the snapshot followed by a status line.
    pub fn draw(&mut self, snapshot: &Snapshot) -> std::io::Result<()> {
        for (y, row) in snapshot.rows_iter().enumerate() {
            self.stdout.queue(cursor::MoveTo(0, y as u16))?;
            for &kind in row {
                self.stdout.queue(style::PrintStyledContent(cell_symbol(kind)))?;
            }
        }

        let status = match snapshot.outcome {
            _ if snapshot.running => "searching...".with(Color::Cyan),
            Some(Outcome::RouteFound) => "Route found!".with(Color::Green),
            Some(Outcome::NoRoute) => "No route found.".with(Color::Red),
            Some(Outcome::Cancelled) => "Search cancelled.".with(Color::DarkYellow),
            None => "Not started.".with(Color::Grey),
        };
        queue!(
            self.stdout,
            cursor::MoveTo(0, snapshot.rows()),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(
                format!(
                    "{} | visited: {} | frontier: {} | route: {} | ",
                    self.solver,
                    snapshot.count(CellKind::Visited),
                    snapshot.count(CellKind::Frontier),
                    snapshot.count(CellKind::Route),
                )
                .with(Color::Yellow)
            ),
            style::PrintStyledContent(status.attribute(Attribute::Bold)),
        )?;
        self.stdout.flush()
    }

    pub fn hint(&mut self, row: u16, text: &str) -> std::io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(text.with(Color::Blue).attribute(Attribute::Bold)),
        )?;
        self.stdout.flush()
    }
}
