//! Terminal setup, event streaming, and frame scheduling.
//!
//! `Tui` wraps ratatui's terminal: raw mode and alternate screen on init,
//! restored on drop and on panic. Draws are demand-driven: anything that
//! changes state schedules a frame through a `FrameRequester`, and a small
//! background task coalesces requests into single `Draw` events at the
//! earliest requested deadline.

use anyhow::Result;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent, KeyEvent,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::pin::Pin;
use std::time::{Duration, Instant};
use tokio::select;
use tokio::sync::broadcast;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_stream::{Stream, StreamExt};

pub type TerminalBackend = CrosstermBackend<Stdout>;

/// Events the terminal side of the app reacts to.
#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    Paste(String),
    Draw,
}

pub struct Tui {
    terminal: Terminal<TerminalBackend>,
    frame_tx: UnboundedSender<Instant>,
    draw_tx: broadcast::Sender<()>,
}

impl Tui {
    /// Enter raw mode and the alternate screen, and install the panic hook.
    pub fn init() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnableBracketedPaste, EnterAlternateScreen)?;
        set_panic_hook();

        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        let (frame_tx, frame_rx) = unbounded_channel();
        let (draw_tx, _) = broadcast::channel(1);
        tokio::spawn(run_frame_scheduler(frame_rx, draw_tx.clone()));

        Ok(Self {
            terminal,
            frame_tx,
            draw_tx,
        })
    }

    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn frame_requester(&self) -> FrameRequester {
        FrameRequester {
            frame_tx: self.frame_tx.clone(),
        }
    }

    /// Merge terminal input and scheduled draws into one event stream.
    pub fn event_stream(&self) -> Pin<Box<dyn Stream<Item = TuiEvent> + Send + 'static>> {
        let mut input = crossterm::event::EventStream::new();
        let mut draw_rx = self.draw_tx.subscribe();

        Box::pin(async_stream::stream! {
            loop {
                select! {
                    Some(Ok(event)) = input.next() => {
                        match event {
                            CrosstermEvent::Key(key) => yield TuiEvent::Key(key),
                            CrosstermEvent::Paste(pasted) => yield TuiEvent::Paste(pasted),
                            CrosstermEvent::Resize(_, _) => yield TuiEvent::Draw,
                            _ => {}
                        }
                    }
                    result = draw_rx.recv() => {
                        match result {
                            // Lagged requests collapse into one draw
                            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                                yield TuiEvent::Draw;
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                }
            }
        })
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Cloneable handle for scheduling draws.
#[derive(Clone, Debug)]
pub struct FrameRequester {
    frame_tx: UnboundedSender<Instant>,
}

impl FrameRequester {
    pub fn schedule_frame(&self) {
        let _ = self.frame_tx.send(Instant::now());
    }

    pub fn schedule_frame_in(&self, delay: Duration) {
        let _ = self.frame_tx.send(Instant::now() + delay);
    }
}

/// Collapse frame requests into single draw notifications.
///
/// Holds the earliest requested deadline; when it passes, one draw is
/// broadcast and the deadline clears.
async fn run_frame_scheduler(
    mut frame_rx: UnboundedReceiver<Instant>,
    draw_tx: broadcast::Sender<()>,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        let target = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));
        let sleep = tokio::time::sleep_until(tokio::time::Instant::from_std(target));
        tokio::pin!(sleep);

        select! {
            request = frame_rx.recv() => {
                match request {
                    Some(at) => {
                        if deadline.map_or(true, |current| at < current) {
                            deadline = Some(at);
                        }
                    }
                    None => break,
                }
            }
            () = &mut sleep => {
                if deadline.take().is_some() {
                    let _ = draw_tx.send(());
                }
            }
        }
    }
}

/// Restore the terminal before the default panic output runs.
fn set_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original(info);
    }));
}
