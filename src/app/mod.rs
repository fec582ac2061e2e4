mod renderer;

use std::{
    io::{Stdout, Write},
    sync::Arc,
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    terminal::{self, ClearType},
};

use crate::{
    config::Config,
    engine::SearchEngine,
    solvers::{Outcome, Pacing, Solver},
};
pub use renderer::Renderer;

/// Terminal driver: runs one search on a background thread and polls the engine for display.
pub struct App {
    solver: Solver,
    pacing: Pacing,
    /// How often to redraw and check for Esc while the search runs
    refresh_interval: Duration,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            solver: config.solver,
            pacing: config.pacing(),
            refresh_interval: config.refresh_interval(),
        }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Runs the search on `engine` and animates it until it ends and the user presses Esc.
    /// Esc while the search is running cancels it.
    ///
    /// Configuration errors and run conflicts are returned before the terminal is touched.
    pub fn run(&self, engine: Arc<SearchEngine>, stdout: &mut Stdout) -> std::io::Result<Outcome> {
        if !Renderer::fits_terminal(engine.rows(), engine.cols())? {
            tracing::warn!(
                rows = engine.rows(),
                cols = engine.cols(),
                "terminal is smaller than the grid, drawing will be clipped"
            );
        }

        let handle = engine
            .spawn(self.solver, self.pacing)
            .map_err(std::io::Error::other)?;

        let watched = App::setup_terminal(stdout).and_then(|_| self.watch(&engine));
        if watched.is_err() {
            // Stop the search so the thread can be joined
            engine.cancel();
        }
        App::restore_terminal(stdout)?;

        let outcome = handle
            .join()
            .map_err(|_| std::io::Error::other("search thread panicked"))?;
        watched?;
        tracing::info!(?outcome, "app finished");
        Ok(outcome)
    }

    /// Redraws the engine state until the run ends, then waits for Esc.
    fn watch(&self, engine: &SearchEngine) -> std::io::Result<()> {
        let mut renderer = Renderer::new(self.solver);
        renderer.clear()?;
        let hint_row = engine.rows() + 1;
        renderer.hint(hint_row, "Esc: cancel search")?;

        loop {
            let snapshot = engine.snapshot();
            renderer.draw(&snapshot)?;
            if !snapshot.running {
                break;
            }
            if event::poll(self.refresh_interval)? {
                if let event::Event::Key(event::KeyEvent {
                    code: KeyCode::Esc,
                    kind: event::KeyEventKind::Press,
                    ..
                }) = event::read()?
                {
                    tracing::debug!("[app loop] Esc key pressed, cancelling search");
                    engine.cancel();
                }
            }
        }

        // The run may have ended between the snapshot and now; draw the final state
        renderer.draw(&engine.snapshot())?;
        renderer.hint(hint_row, "Press Esc to exit...")?;
        App::wait_for_esc()
    }

    /// Wait for the user to press the Esc key
    /// This function blocks until Esc is pressed
    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if code == KeyCode::Esc && kind == event::KeyEventKind::Press {
                    break;
                }
            }
        }
        Ok(())
    }
}
