//! Terminal front end: terminal setup, the event loop and drawing.

pub(crate) mod keys;
pub(crate) mod render;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::app::coordinator::{Coordinator, Flow};

type Backend = CrosstermBackend<Stdout>;

/// Run `enter`, then `rest`; when `rest` fails, `undo` reverts `enter`.
fn staged<T>(
    enter: impl FnOnce() -> Result<()>,
    rest: impl FnOnce() -> Result<T>,
    undo: impl FnOnce(),
) -> Result<T> {
    enter()?;
    rest().inspect_err(|_| undo())
}

/// A failure part way leaves the terminal as it was found.
fn setup_terminal() -> Result<Terminal<Backend>> {
    staged(
        || enable_raw_mode().context("failed to enable raw mode"),
        || {
            staged(
                || {
                    execute!(io::stdout(), EnterAlternateScreen)
                        .context("failed to enter alternate screen")
                },
                || {
                    Terminal::new(CrosstermBackend::new(io::stdout()))
                        .context("failed to initialise terminal")
                },
                || {
                    let _ = execute!(io::stdout(), LeaveAlternateScreen);
                },
            )
        },
        || {
            let _ = disable_raw_mode();
        },
    )
}

fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Run the interactive client until the user quits.
///
/// The terminal is restored even when the loop fails.
pub(crate) async fn run(coordinator: Coordinator, poll_interval: Duration) -> Result<()> {
    let mut terminal = setup_terminal()?;
    coordinator.refresh().await;
    let poll = coordinator.spawn_poll(poll_interval);
    info!(poll_ms = poll_interval.as_millis(), "interactive session started");

    let outcome = event_loop(&mut terminal, &coordinator).await;

    poll.abort();
    coordinator.stop_peers().await;
    let restored = restore_terminal(&mut terminal);
    info!("interactive session ended");
    outcome.and(restored)
}

async fn draw(terminal: &mut Terminal<Backend>, coordinator: &Coordinator) -> Result<()> {
    let state = coordinator.state().lock().await;
    terminal
        .draw(|frame| render::draw(frame, &state))
        .context("failed to draw frame")?;
    Ok(())
}

async fn event_loop(terminal: &mut Terminal<Backend>, coordinator: &Coordinator) -> Result<()> {
    let mut events = EventStream::new();
    draw(terminal, coordinator).await?;
    loop {
        tokio::select! {
            () = coordinator.redraw().notified() => {}
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let view = coordinator.view_kind().await;
                    if let Some(intent) = keys::intent(view, key) {
                        debug!(?intent, "key");
                        if coordinator.dispatch(intent).await == Flow::Quit {
                            return Ok(());
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("failed to read terminal event"),
                None => return Ok(()),
            },
        }
        draw(terminal, coordinator).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use anyhow::anyhow;

    #[test]
    fn failed_later_step_undoes_the_earlier_one() {
        let log = RefCell::new(Vec::new());
        let result: Result<()> = staged(
            || {
                log.borrow_mut().push("raw on");
                Ok(())
            },
            || Err(anyhow!("no terminal")),
            || log.borrow_mut().push("raw off"),
        );
        assert_eq!(result.map_err(|err| err.to_string()), Err("no terminal".to_string()));
        assert_eq!(*log.borrow(), vec!["raw on", "raw off"]);
    }

    #[test]
    fn nested_stages_unwind_newest_first() {
        let log = RefCell::new(Vec::new());
        let result: Result<()> = staged(
            || {
                log.borrow_mut().push("raw on");
                Ok(())
            },
            || {
                staged(
                    || {
                        log.borrow_mut().push("screen on");
                        Ok(())
                    },
                    || Err(anyhow!("backend failed")),
                    || log.borrow_mut().push("screen off"),
                )
            },
            || log.borrow_mut().push("raw off"),
        );
        assert!(result.is_err());
        assert_eq!(
            *log.borrow(),
            vec!["raw on", "screen on", "screen off", "raw off"]
        );
    }

    #[test]
    fn failed_first_step_has_nothing_to_undo() {
        let log = RefCell::new(Vec::new());
        let result = staged(
            || Err(anyhow!("not a tty")),
            || {
                log.borrow_mut().push("rest");
                Ok(1)
            },
            || log.borrow_mut().push("undo"),
        );
        assert!(result.is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn success_keeps_every_step() -> Result<()> {
        let log = RefCell::new(Vec::new());
        let value = staged(
            || Ok(()),
            || Ok(7),
            || log.borrow_mut().push("undo"),
        )?;
        assert_eq!(value, 7);
        assert!(log.borrow().is_empty());
        Ok(())
    }
}
