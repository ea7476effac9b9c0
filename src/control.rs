//! Main controller.
//!
//! The controller drives a single-threaded loop in which each input event is run to
//! completion by the workspace before the next is read. Drawing is decoupled from
//! editing: any event marks the frame dirty, and a dirty frame is drawn no more
//! often than the configured frame rate permits.

use crate::error::Result;
use crate::input::InputEvent;
use crate::operation::Action;
use crate::render::{self, Row};
use crate::size::Size;
use crate::workspace::Workspace;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A source of input events.
pub trait EventSource {
    /// Returns the next event, or `None` if no event arrived within a short period
    /// of time.
    fn read(&mut self) -> Result<Option<InputEvent>>;
}

/// A surface on which frames are drawn.
pub trait Surface {
    fn size(&mut self) -> Result<Size>;

    /// Draws `rows` starting at the top of the surface.
    fn draw(&mut self, rows: &[Row]) -> Result<()>;

    /// Erases the entire surface.
    fn clear(&mut self) -> Result<()> {
        Ok(())
    }

    /// Returns `true` if the size of the surface changed since the prior call.
    fn resized(&mut self) -> bool {
        false
    }
}

/// Gates drawing to at most once per period.
pub struct Ticker {
    period: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Ticker {
        Ticker { period, last: None }
    }

    pub fn from_millis(millis: u64) -> Ticker {
        Ticker::new(Duration::from_millis(millis))
    }

    /// Returns `true` and restarts the period if at least one full period has
    /// elapsed as of `now`, or if the ticker has never fired.
    pub fn ready(&mut self, now: Instant) -> bool {
        let ready = match self.last {
            Some(last) => now.saturating_duration_since(last) >= self.period,
            None => true,
        };
        if ready {
            self.last = Some(now);
        }
        ready
    }
}

/// The primary control point for coordinating user interaction and editing
/// operations.
pub struct Controller<E: EventSource, S: Surface> {
    source: E,
    surface: S,
    workspace: Workspace,
    ticker: Ticker,

    /// Indicates that the frame must be drawn on the next tick.
    dirty: bool,
}

impl<E: EventSource, S: Surface> Controller<E, S> {
    pub fn new(source: E, surface: S, workspace: Workspace) -> Controller<E, S> {
        let ticker = Ticker::from_millis(workspace.config().settings.frame_millis());
        Controller {
            source,
            surface,
            workspace,
            ticker,
            dirty: true,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Runs the main processing loop until the workspace asks to quit.
    pub fn run(&mut self) -> Result<()> {
        info!("controller started");
        while self.step()? {}
        info!("controller stopped");
        Ok(())
    }

    /// Runs a single iteration of the loop, returning `false` if the workspace asked
    /// to quit.
    pub fn step(&mut self) -> Result<bool> {
        if let Some(event) = self.source.read()? {
            if let Some(Action::Quit) = self.workspace.handle(&event) {
                return Ok(false);
            }
            self.dirty = true;
        }
        if self.surface.resized() {
            debug!("surface resized");
            self.surface.clear()?;
            self.dirty = true;
        }
        if self.dirty && self.ticker.ready(Instant::now()) {
            self.draw()?;
        }
        Ok(true)
    }

    fn draw(&mut self) -> Result<()> {
        let size = self.surface.size()?;
        let rows = render::frame(&self.workspace, size);
        self.surface.draw(&rows)?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Clipboard;
    use crate::config::Configuration;
    use crate::input::Scancode;
    use crate::render::row_text;
    use crate::syntax::Registry;
    use std::collections::VecDeque;

    struct Script(VecDeque<Option<InputEvent>>);

    impl EventSource for Script {
        fn read(&mut self) -> Result<Option<InputEvent>> {
            Ok(self.0.pop_front().flatten())
        }
    }

    struct Recorder {
        size: Size,
        frames: Vec<Vec<String>>,
        resize_once: bool,
        clears: usize,
    }

    impl Surface for Recorder {
        fn size(&mut self) -> Result<Size> {
            Ok(self.size)
        }

        fn draw(&mut self, rows: &[Row]) -> Result<()> {
            self.frames.push(rows.iter().map(row_text).collect());
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            self.clears += 1;
            Ok(())
        }

        fn resized(&mut self) -> bool {
            std::mem::take(&mut self.resize_once)
        }
    }

    fn build_controller(events: Vec<Option<InputEvent>>, fps: u32) -> Controller<Script, Recorder> {
        let mut config = Configuration::default();
        config.settings.fps = fps;
        let workspace = Workspace::new(config, Registry::load().unwrap().to_ref(), Clipboard::local())
            .without_persistence();
        let surface = Recorder {
            size: Size::new(10, 40),
            frames: Vec::new(),
            resize_once: false,
            clears: 0,
        };
        Controller::new(Script(events.into()), surface, workspace)
    }

    #[test]
    fn ticker_gates_by_period() {
        let mut ticker = Ticker::from_millis(100);
        let t0 = Instant::now();
        assert!(ticker.ready(t0));
        assert!(!ticker.ready(t0 + Duration::from_millis(50)));
        assert!(ticker.ready(t0 + Duration::from_millis(100)));
        assert!(!ticker.ready(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn quits_when_last_tab_closes() {
        let events = vec![Some(InputEvent::text("a")), Some(InputEvent::ctrl('w'))];
        let mut controller = build_controller(events, 1000);
        controller.run().unwrap();
        assert!(!controller.surface().frames.is_empty());
    }

    #[test]
    fn draws_only_when_dirty() {
        let mut controller = build_controller(vec![None, None, Some(InputEvent::text("x"))], 1000);
        assert!(controller.step().unwrap());
        assert_eq!(controller.surface().frames.len(), 1);
        assert!(controller.step().unwrap());
        assert_eq!(controller.surface().frames.len(), 1);
        std::thread::sleep(Duration::from_millis(2));
        assert!(controller.step().unwrap());
        assert_eq!(controller.surface().frames.len(), 2);
        let frame = controller.surface().frames.last().unwrap();
        assert_eq!(frame.len(), 10);
        assert_eq!(frame[0], " untitled* ");
    }

    #[test]
    fn events_run_to_completion_between_frames() {
        let events = vec![
            Some(InputEvent::text("a")),
            Some(InputEvent::text("b")),
            Some(InputEvent::key(Scancode::Return)),
        ];
        let mut controller = build_controller(events, 1);
        for _ in 0..3 {
            controller.step().unwrap();
        }
        // First frame is drawn immediately, and the rest wait for the next tick.
        assert_eq!(controller.surface().frames.len(), 1);
        assert_eq!(controller.workspace().active().buffer().lines(), &["ab", ""]);
    }

    #[test]
    fn resize_clears_and_redraws() {
        let mut controller = build_controller(vec![None], 1000);
        controller.step().unwrap();
        controller.surface.resize_once = true;
        std::thread::sleep(Duration::from_millis(2));
        controller.step().unwrap();
        assert_eq!(controller.surface().clears, 1);
        assert_eq!(controller.surface().frames.len(), 2);
    }
}
