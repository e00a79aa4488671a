//! A compact rendering core.
//!
//! It owns the widget tree, the dirty areas, the optional frame buffer and
//! the millisecond tick. All I/O goes through the host's drivers, which are
//! lent to [`Gui::task_handler`] on every call.

use log::{debug, info, warn};
use thiserror::Error;

use crate::driver::{HostDrivers, IndevData, IndevState, IndevType};

mod area;
mod color;
pub mod demo;
mod render;
mod screen;
mod task;
mod widget;

pub use area::{Area, Point};
pub use color::{Color, Opa, OPA_50, OPA_COVER, OPA_TRANSP};
pub use screen::{Screen, WidgetId};
pub use task::{TaskFn, TaskId};
pub use widget::Widget;

use render::Refresh;
use task::TaskList;

pub const DEFAULT_REFRESH_PERIOD: u32 = 30;
pub const DEFAULT_READ_PERIOD: u32 = 50;

/// Reads per poll before a driver that keeps reporting more data is cut off.
const MAX_READS_PER_POLL: usize = 16;

/// Milliseconds between two tick values, correct across wrap-around.
pub(crate) fn tick_elapsed(now: u32, prev: u32) -> u32 {
    now.wrapping_sub(prev)
}

/// True if a job last run at `last` is due again. Never-run jobs are due.
fn due(now: u32, last: &mut Option<u32>, period: u32) -> bool {
    let is_due = last.map_or(true, |prev| tick_elapsed(now, prev) >= period);
    if is_due {
        *last = Some(now);
    }
    is_due
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuiError {
    #[error("no display driver has been registered")]
    NoDisplay,
    #[error("a display driver is already registered")]
    DisplayAlreadyRegistered,
    #[error("an input driver is already registered")]
    InputAlreadyRegistered,
    #[error("{0:?} input devices are not supported")]
    UnsupportedInput(IndevType),
    #[error("display resolution {0}x{1} must be positive")]
    BadResolution(i32, i32),
    #[error("frame buffer of {vdb_size} pixels cannot hold a row of {hor_res} pixels")]
    BufferTooSmall { vdb_size: usize, hor_res: i32 },
}

/// What the host declares about its display when registering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayDescriptor {
    pub hor_res: i32,
    pub ver_res: i32,
    /// Frame buffer size in pixels, zero for unbuffered drawing.
    pub vdb_size: usize,
    /// Route buffer fills and blends through the host's memory hooks.
    pub accelerated: bool,
    pub refresh_period: u32,
}

impl DisplayDescriptor {
    pub fn new(hor_res: i32, ver_res: i32) -> Self {
        Self {
            hor_res,
            ver_res,
            vdb_size: 0,
            accelerated: false,
            refresh_period: DEFAULT_REFRESH_PERIOD,
        }
    }

    pub fn buffered(mut self, vdb_size: usize) -> Self {
        self.vdb_size = vdb_size;
        self
    }

    pub fn accelerated(mut self, accelerated: bool) -> Self {
        self.accelerated = accelerated;
        self
    }

    pub fn refresh_period(mut self, period: u32) -> Self {
        self.refresh_period = period;
        self
    }
}

/// What the host declares about its input device when registering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    pub kind: IndevType,
    pub read_period: u32,
}

impl InputDescriptor {
    pub fn new(kind: IndevType) -> Self {
        Self {
            kind,
            read_period: DEFAULT_READ_PERIOD,
        }
    }

    pub fn read_period(mut self, period: u32) -> Self {
        self.read_period = period;
        self
    }
}

struct DisplayState {
    descriptor: DisplayDescriptor,
    /// Empty when unbuffered.
    vdb: Vec<Color>,
    last_refresh: Option<u32>,
    awaiting_flush: bool,
    stall_reported: bool,
    missing_gpu_reported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    Idle,
    /// The pointer went down, possibly on a clickable widget.
    Active(Option<WidgetId>),
}

struct InputState {
    descriptor: InputDescriptor,
    last_read: Option<u32>,
    press: Press,
    last: IndevData,
}

impl InputState {
    fn poll<H: HostDrivers + ?Sized>(&mut self, host: &mut H, screen: &mut Screen) {
        let Some(driver) = host.input() else {
            return;
        };
        for _ in 0..MAX_READS_PER_POLL {
            let mut data = self.last;
            let more = driver.read(&mut data);
            self.process(data, screen);
            if !more {
                return;
            }
        }
        warn!("input driver still has data after {MAX_READS_PER_POLL} reads");
    }

    fn process(&mut self, data: IndevData, screen: &mut Screen) {
        match (data.state, self.press) {
            (IndevState::Pressed, Press::Idle) => {
                let target = screen.clickable_at(data.point);
                if let Some(id) = target {
                    screen.set_pressing(id, true);
                }
                debug!("pointer pressed at {:?}", data.point);
                self.press = Press::Active(target);
            }
            (IndevState::Released, Press::Active(target)) => {
                if let Some(id) = target {
                    screen.set_pressing(id, false);
                    let still_on = screen.clickable_at(data.point) == Some(id);
                    if still_on {
                        screen.click(id);
                    }
                }
                self.press = Press::Idle;
            }
            (IndevState::Pressed, Press::Active(_)) | (IndevState::Released, Press::Idle) => {}
        }
        self.last = data;
    }
}

pub struct Gui {
    tick: u32,
    display: Option<DisplayState>,
    input: Option<InputState>,
    screen: Screen,
    tasks: TaskList,
}

impl Default for Gui {
    fn default() -> Self {
        Self::new()
    }
}

impl Gui {
    pub fn new() -> Self {
        Self {
            tick: 0,
            display: None,
            input: None,
            screen: Screen::new(Area::new(0, 0, -1, -1), Color::WHITE),
            tasks: TaskList::default(),
        }
    }

    pub fn register_display(&mut self, descriptor: DisplayDescriptor) -> Result<(), GuiError> {
        if self.display.is_some() {
            return Err(GuiError::DisplayAlreadyRegistered);
        }
        let DisplayDescriptor {
            hor_res,
            ver_res,
            vdb_size,
            ..
        } = descriptor;
        if hor_res <= 0 || ver_res <= 0 {
            return Err(GuiError::BadResolution(hor_res, ver_res));
        }
        if vdb_size != 0 && vdb_size < hor_res as usize {
            return Err(GuiError::BufferTooSmall { vdb_size, hor_res });
        }

        info!(
            "display registered: {}x{}, {}",
            hor_res,
            ver_res,
            match vdb_size {
                0 => "unbuffered".to_string(),
                n => format!("{n} pixel frame buffer"),
            }
        );
        self.screen.resize(Area::with_size(0, 0, hor_res, ver_res));
        self.display = Some(DisplayState {
            vdb: vec![Color::BLACK; vdb_size],
            descriptor,
            last_refresh: None,
            awaiting_flush: false,
            stall_reported: false,
            missing_gpu_reported: false,
        });
        Ok(())
    }

    pub fn register_input(&mut self, descriptor: InputDescriptor) -> Result<(), GuiError> {
        if self.input.is_some() {
            return Err(GuiError::InputAlreadyRegistered);
        }
        if descriptor.kind != IndevType::Pointer {
            return Err(GuiError::UnsupportedInput(descriptor.kind));
        }
        info!("{:?} input registered", descriptor.kind);
        self.input = Some(InputState {
            descriptor,
            last_read: None,
            press: Press::Idle,
            last: IndevData::default(),
        });
        Ok(())
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn add_task(&mut self, period: u32, callback: TaskFn) -> TaskId {
        self.tasks.add(period, self.tick, callback)
    }

    pub fn remove_task(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id)
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Advances the clock. Call it with the real time elapsed.
    pub fn tick_inc(&mut self, ms: u32) {
        self.tick = self.tick.wrapping_add(ms);
    }

    pub fn tick_elapsed(&self, prev: u32) -> u32 {
        tick_elapsed(self.tick, prev)
    }

    pub fn invalidate(&mut self, area: &Area) {
        self.screen.invalidate(area);
    }

    pub fn invalidate_screen(&mut self) {
        self.screen.invalidate_all();
    }

    /// Acknowledges a flush that was not acknowledged during the call.
    pub fn flush_ready(&mut self) {
        if let Some(display) = self.display.as_mut() {
            display.awaiting_flush = false;
            display.stall_reported = false;
        }
    }

    pub fn is_awaiting_flush(&self) -> bool {
        self.display.as_ref().map_or(false, |d| d.awaiting_flush)
    }

    /// Reads input, runs due tasks and refreshes dirty areas.
    pub fn task_handler<H: HostDrivers + ?Sized>(&mut self, host: &mut H) -> Result<(), GuiError> {
        let now = self.tick;
        let Some(display) = self.display.as_mut() else {
            return Err(GuiError::NoDisplay);
        };

        if let Some(input) = self.input.as_mut() {
            if due(now, &mut input.last_read, input.descriptor.read_period) {
                input.poll(host, &mut self.screen);
            }
        }

        self.tasks.run_due(now, &mut self.screen);

        if !due(now, &mut display.last_refresh, display.descriptor.refresh_period) {
            return Ok(());
        }
        if display.awaiting_flush {
            if !display.stall_reported {
                warn!("display has not acknowledged the last flush, refresh is on hold");
                display.stall_reported = true;
            }
            return Ok(());
        }
        if self.screen.invalid_areas().is_empty() {
            return Ok(());
        }

        if display.vdb.is_empty() {
            render::refresh_unbuffered(&mut self.screen, host);
            return Ok(());
        }

        let mut accelerated = display.descriptor.accelerated;
        if accelerated && host.gpu().is_none() {
            if !display.missing_gpu_reported {
                warn!("acceleration requested but the host offers no memory hooks");
                display.missing_gpu_reported = true;
            }
            accelerated = false;
        }
        let refresh = render::refresh_buffered(&mut display.vdb, accelerated, &mut self.screen, host);
        if refresh == Refresh::AwaitingFlush {
            display.awaiting_flush = true;
        }
        Ok(())
    }
}
