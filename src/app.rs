use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use flume::{Receiver, Sender, TryRecvError};
use log::{debug, info, warn};

use crate::{
    config::{Config, TickMode},
    driver::{HostContext, IndevType},
    gui::{demo, DisplayDescriptor, Gui, InputDescriptor},
    windowing::{Host, HostEvent, Surface},
};

pub enum LifecycleEvent {
    Exit,
}

/// Turns wall-clock time into tick increments for the rendering core.
struct Clock {
    mode: TickMode,
    last: Instant,
    /// Time already measured but not yet handed out as whole milliseconds.
    carry: Duration,
}

impl Clock {
    fn new(mode: TickMode) -> Self {
        Self {
            mode,
            last: Instant::now(),
            carry: Duration::ZERO,
        }
    }

    fn advance(&mut self) -> u32 {
        self.advance_at(Instant::now())
    }

    /// Milliseconds to add to the tick for an iteration ending at `now`.
    fn advance_at(&mut self, now: Instant) -> u32 {
        match self.mode {
            TickMode::Fixed { ms } => ms,
            TickMode::Elapsed => {
                let elapsed = now.saturating_duration_since(self.last) + self.carry;
                self.last = now;
                let ms = elapsed.as_millis().min(u32::MAX as u128) as u32;
                self.carry = elapsed.saturating_sub(Duration::from_millis(ms as u64));
                ms
            }
        }
    }
}

/// Drives the rendering core from host events, one step at a time.
struct EventLoop<S> {
    gui: Gui,
    context: HostContext<S>,
    clock: Clock,
    lifecycle_receiver: Receiver<LifecycleEvent>,
    idle_sleep: Duration,
}

impl<S: Surface> EventLoop<S> {
    /// Handles every pending host event. Returns the exit code once the host quits.
    fn drain<H: Host>(&mut self, host: &mut H) -> Option<i32> {
        while let Some(event) = host.poll_event() {
            match event {
                HostEvent::Quit(code) => return Some(code),
                HostEvent::PointerPressed { x, y } => self.context.press(x, y),
                HostEvent::Exposed => self.gui.invalidate_screen(),
            }
        }
        None
    }

    /// One iteration: drain the host, check for shutdown, run the core, advance the tick.
    fn step<H: Host>(&mut self, host: &mut H) -> anyhow::Result<Option<i32>> {
        if let Some(code) = self.drain(host) {
            info!("host quit with code {}", code);
            return Ok(Some(code));
        }

        match self.lifecycle_receiver.try_recv() {
            Ok(LifecycleEvent::Exit) | Err(TryRecvError::Disconnected) => {
                info!("exit requested");
                return Ok(Some(0));
            }
            Err(TryRecvError::Empty) => {}
        }

        self.gui.task_handler(&mut self.context)?;
        self.gui.tick_inc(self.clock.advance());
        Ok(None)
    }

    fn run<H: Host>(mut self, host: &mut H) -> anyhow::Result<i32> {
        loop {
            if let Some(code) = self.step(host)? {
                return Ok(code);
            }
            if !self.idle_sleep.is_zero() {
                thread::sleep(self.idle_sleep);
            }
        }
    }
}

/// A helper object for creating the application.
pub struct AppBuilder {
    config_path: Option<PathBuf>,
    interrupts: bool,
}

impl AppBuilder {
    /// Creates a new AppBuilder that reads the config from its default place.
    pub fn new() -> Self {
        Self {
            config_path: Config::default_path(),
            interrupts: true,
        }
    }

    #[cfg(test)]
    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Leaves Ctrl+C to the default handler.
    #[cfg(test)]
    pub fn without_interrupts(mut self) -> Self {
        self.interrupts = false;
        self
    }

    pub fn build(self) -> anyhow::Result<App> {
        let config = match &self.config_path {
            Some(path) => {
                let (config, found) = Config::read_or_default(path)?;
                if found {
                    info!("config read from {}", path.display());
                } else {
                    debug!("no config at {}, using defaults", path.display());
                }
                config
            }
            None => {
                warn!("no config directory on this system, using defaults");
                Config::default()
            }
        };
        config.validate().context("invalid config")?;

        let (s, r) = flume::unbounded::<LifecycleEvent>();
        let app = App {
            config,
            lifecycle_sender: s,
            lifecycle_receiver: r,
        };
        if self.interrupts {
            app.setup_interrupts()?;
        }
        Ok(app)
    }
}

pub struct App {
    config: Config,
    /// A template for a lifecycle sender.
    /// Clone it to stop the loop from a different thread.
    lifecycle_sender: Sender<LifecycleEvent>,
    lifecycle_receiver: Receiver<LifecycleEvent>,
}

impl App {
    /// Registers SIGINT and SIGTERM listeners for graceful shutdown invocation.
    fn setup_interrupts(&self) -> anyhow::Result<()> {
        let sender = self.lifecycle_sender.clone();
        ctrlc::set_handler(move || {
            // The loop may already be gone
            let _ = sender.send(LifecycleEvent::Exit);
        })
        .context("cannot set the interrupt handler")
    }

    #[cfg(test)]
    pub fn lifecycle_sender(&self) -> Sender<LifecycleEvent> {
        self.lifecycle_sender.clone()
    }

    /// Opens the window and runs until it is closed.
    #[cfg(target_os = "windows")]
    pub fn run(self) -> anyhow::Result<i32> {
        let (hor_res, ver_res) = self.config.resolution();
        let mut host = crate::windowing::GdiHost::create(self.config.title(), hor_res, ver_res)
            .context("cannot open the window")?;
        self.run_on(&mut host)
    }

    #[cfg(not(target_os = "windows"))]
    pub fn run(self) -> anyhow::Result<i32> {
        anyhow::bail!("the GDI host is only available on Windows")
    }

    /// Wires the rendering core to `host` and runs the loop until it stops.
    /// Returns the exit code the loop ended with.
    pub fn run_on<H: Host>(self, host: &mut H) -> anyhow::Result<i32> {
        // Held until the loop ends, dropping it would disconnect the channel
        let App {
            config,
            lifecycle_sender: _lifecycle_sender,
            lifecycle_receiver,
        } = self;
        let (hor_res, ver_res) = config.resolution();

        let surface = host
            .acquire_surface()
            .context("cannot acquire the drawing surface")?;
        let mut context = HostContext::new(surface, hor_res, ver_res);
        if config.gpu() {
            context = context.with_gpu();
        }

        let mut gui = Gui::new();
        gui.register_display(
            DisplayDescriptor::new(hor_res, ver_res)
                .buffered(config.vdb_size())
                .accelerated(config.gpu())
                .refresh_period(config.refresh_period()),
        )?;
        gui.register_input(
            InputDescriptor::new(IndevType::Pointer).read_period(config.indev_read_period()),
        )?;
        gui.screen_mut().set_background(config.background());
        demo::create(&mut gui);

        let event_loop = EventLoop {
            gui,
            context,
            clock: Clock::new(config.tick()),
            lifecycle_receiver,
            idle_sleep: Duration::from_millis(config.idle_sleep_ms()),
        };
        info!("entering the event loop");
        let code = event_loop.run(host)?;
        info!("event loop finished with code {}", code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gui::{Color, DEFAULT_READ_PERIOD},
        windowing::{
            memory::{MemorySurface, ScriptedHost},
            ColorRef,
        },
    };

    fn test_app() -> App {
        let path = std::env::temp_dir().join("gdi-bridge-app-test-missing.json");
        AppBuilder::new()
            .with_config_path(path)
            .without_interrupts()
            .build()
            .unwrap()
    }

    fn scripted_host() -> ScriptedHost {
        ScriptedHost::new(MemorySurface::new(320, 240, ColorRef::from(Color::BLACK)))
    }

    fn demo_loop(tick: TickMode) -> (EventLoop<MemorySurface>, demo::Demo, Sender<LifecycleEvent>) {
        let mut gui = Gui::new();
        gui.register_display(DisplayDescriptor::new(320, 240).buffered(320 * 20))
            .unwrap();
        gui.register_input(InputDescriptor::new(IndevType::Pointer))
            .unwrap();
        let demo = demo::create(&mut gui);
        let (s, r) = flume::unbounded();
        let event_loop = EventLoop {
            gui,
            context: HostContext::new(MemorySurface::new(320, 240, ColorRef::from(Color::BLACK)), 320, 240),
            clock: Clock::new(tick),
            lifecycle_receiver: r,
            idle_sleep: Duration::ZERO,
        };
        (event_loop, demo, s)
    }

    #[test_log::test]
    fn quit_code_is_returned() {
        let mut host = scripted_host();
        host.push_idle();
        host.push(HostEvent::Exposed);
        host.push(HostEvent::Quit(3));
        assert_eq!(test_app().run_on(&mut host).unwrap(), 3);
    }

    #[test_log::test]
    fn lifecycle_exit_stops_the_loop() {
        let app = test_app();
        app.lifecycle_sender().send(LifecycleEvent::Exit).unwrap();
        let mut host = scripted_host();
        assert_eq!(app.run_on(&mut host).unwrap(), 0);
    }

    #[test_log::test]
    fn missing_surface_is_an_error() {
        let mut host = ScriptedHost::without_surface();
        assert!(test_app().run_on(&mut host).is_err());
    }

    #[test_log::test]
    fn presses_reach_the_core() {
        let (mut event_loop, demo, _sender) = demo_loop(TickMode::Fixed {
            ms: DEFAULT_READ_PERIOD,
        });
        let mut host = scripted_host();
        host.push(HostEvent::PointerPressed { x: 30, y: 80 });

        assert_eq!(event_loop.step(&mut host).unwrap(), None);
        assert_eq!(event_loop.step(&mut host).unwrap(), None);

        assert!(event_loop.gui.screen().is_toggled(demo.button));
        assert!(!event_loop.gui.screen().is_hidden(demo.overlay));
    }

    #[test_log::test]
    fn exposure_repaints_the_screen() {
        let (mut event_loop, _, _sender) = demo_loop(TickMode::Fixed { ms: 30 });
        let mut host = scripted_host();
        event_loop.step(&mut host).unwrap();
        let writes = event_loop.context.surface().writes();

        event_loop.step(&mut host).unwrap();
        assert_eq!(event_loop.context.surface().writes(), writes);

        host.push(HostEvent::Exposed);
        event_loop.step(&mut host).unwrap();
        assert!(event_loop.context.surface().writes() >= writes + 320 * 240);
    }

    #[test_log::test]
    fn dropped_sender_stops_the_loop() {
        let (mut event_loop, _, sender) = demo_loop(TickMode::Elapsed);
        drop(sender);
        let mut host = scripted_host();
        assert_eq!(event_loop.step(&mut host).unwrap(), Some(0));
    }

    #[test_log::test]
    fn fixed_clock_ignores_real_time() {
        let mut clock = Clock::new(TickMode::Fixed { ms: 5 });
        let later = clock.last + Duration::from_secs(1);
        assert_eq!(clock.advance_at(later), 5);
    }

    #[test_log::test]
    fn elapsed_clock_carries_fractions() {
        let mut clock = Clock::new(TickMode::Elapsed);
        let start = clock.last;
        assert_eq!(clock.advance_at(start + Duration::from_micros(1500)), 1);
        assert_eq!(clock.advance_at(start + Duration::from_micros(2000)), 1);
        assert_eq!(clock.advance_at(start + Duration::from_micros(2400)), 0);
    }
}
