#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

use std::fs::File;
use std::io;
use std::ops::ControlFlow;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use reactive_grid::simulation::{
    params::{LINGER_MS, LOG_FILE, TICKS_PER_SECOND},
    RunSummary, Simulation, Termination, TickObserver, TickView,
};
use reactive_grid::ui::{compute_field_grid, draw_ui, hud_line, setup_or_restore, FramePacer};

/// Draws every tick and paces the loop; `q` or `Esc` quits.
///
/// Pacing and quit polling happen before a tick is drawn, so a quit never
/// cancels a tick that is already on screen.
struct TerminalObserver<B: ratatui::backend::Backend> {
    terminal: Terminal<B>,
    pacer: FramePacer,
}

impl<B: ratatui::backend::Backend> TerminalObserver<B> {
    fn draw(&mut self, view: &TickView<'_>, hud: &str) -> io::Result<()> {
        let grid = compute_field_grid(view.world, view.position);
        self.terminal.draw(|f| draw_ui(f, &grid, hud))?;
        self.pacer.mark(Instant::now());
        Ok(())
    }

    /// Waits up to `timeout` for a key. Returns true if it was a quit key.
    fn wait_for_key(timeout: Duration, any_key: bool) -> io::Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(false);
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if any_key || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(true);
                }
            }
        }
    }
}

impl<B: ratatui::backend::Backend> TickObserver for TerminalObserver<B> {
    type Error = io::Error;

    fn on_tick(&mut self, view: &TickView<'_>) -> io::Result<ControlFlow<()>> {
        if Self::wait_for_key(self.pacer.remaining(Instant::now()), false)? {
            return Ok(ControlFlow::Break(()));
        }
        self.draw(view, &hud_line(view))?;
        Ok(ControlFlow::Continue(()))
    }

    fn on_finish(&mut self, view: &TickView<'_>, summary: &RunSummary) -> io::Result<()> {
        if summary.termination == Termination::Quit {
            return Ok(());
        }
        Self::wait_for_key(self.pacer.remaining(Instant::now()), false)?;
        let hud = format!("{} | {}", hud_line(view), summary.termination);
        self.draw(view, &hud)?;
        Self::wait_for_key(Duration::from_millis(LINGER_MS), true)?;
        Ok(())
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(LOG_FILE)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reactive_grid=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let seed: u64 = rand::rng().random();
    let mut sim = Simulation::new(seed)?;

    // Setup Terminal
    enable_raw_mode()?;
    let terminal = setup_or_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        || {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)
        },
    )?;
    let mut observer = TerminalObserver {
        terminal,
        pacer: FramePacer::new(Duration::from_millis(1000 / TICKS_PER_SECOND)),
    };

    let res = sim.run_with(&mut observer);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(observer.terminal.backend_mut(), LeaveAlternateScreen)?;
    observer.terminal.show_cursor()?;

    match res {
        Ok(summary) => {
            if summary.termination == Termination::Trapped {
                println!("The agent is trapped at {}.", summary.final_position);
            }
            println!(
                "Finished after {} steps ({}) at {} [seed {}]",
                summary.steps, summary.termination, summary.final_position, summary.seed
            );
        }
        Err(err) => {
            tracing::error!(%err, "terminal error");
            println!("{err:?}");
        }
    }

    Ok(())
}
