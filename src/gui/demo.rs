//! The demo screen shown by the program.

use log::info;

use super::{Area, Color, Gui, Screen, Widget, WidgetId, OPA_50, OPA_COVER};

const HEADER_HEIGHT: i32 = 40;
const ICON_SIZE: i32 = 32;
const BAR_STEP_PERIOD: u32 = 50;

/// Handles to the interactive parts of the demo.
#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub button: WidgetId,
    pub overlay: WidgetId,
    pub bar: WidgetId,
}

/// Populates the active screen: a header with an icon, a toggle button that
/// shows a translucent overlay, and a progress bar that keeps filling up.
pub fn create(gui: &mut Gui) -> Demo {
    let area = gui.screen().area();
    let (width, height) = (area.width(), area.height());
    let screen = gui.screen_mut();

    screen.add(Widget::panel(
        Area::with_size(0, 0, width, HEADER_HEIGHT),
        Color::NAVY,
        OPA_COVER,
    ));
    screen.add(Widget::image(
        Area::with_size(4, (HEADER_HEIGHT - ICON_SIZE) / 2, ICON_SIZE, ICON_SIZE),
        gradient(ICON_SIZE),
    ));

    let button = screen.add(Widget::button(
        Area::with_size(20, HEADER_HEIGHT + 30, 120, 50),
        Color::SILVER,
        Color::rgb(0x40, 0xa0, 0x40),
    ));
    let overlay = screen.add(
        Widget::panel(
            Area::with_size(width / 2, HEADER_HEIGHT / 2, width / 2 - 20, 100),
            Color::RED,
            OPA_50,
        )
        .hidden(),
    );
    screen.set_on_click(
        button,
        Box::new(move |screen: &mut Screen| {
            let hidden = screen.is_hidden(overlay);
            screen.set_hidden(overlay, !hidden);
        }),
    );

    let bar = screen.add(Widget::bar(
        Area::with_size(20, height - 40, width - 40, 20),
        Color::SILVER,
        Color::BLUE,
    ));
    gui.add_task(
        BAR_STEP_PERIOD,
        Box::new(move |screen: &mut Screen| {
            let next = match screen.bar_value(bar) {
                Some(value) if value < 100 => value + 1,
                _ => 0,
            };
            screen.set_bar_value(bar, next);
        }),
    );

    info!("demo screen created on a {}x{} display", width, height);
    Demo {
        button,
        overlay,
        bar,
    }
}

/// A square icon fading from red to blue horizontally and gaining green
/// toward the bottom.
fn gradient(size: i32) -> Vec<Color> {
    let step = |i: i32| (i * 255 / (size - 1).max(1)) as u8;
    (0..size)
        .flat_map(|y| (0..size).map(move |x| Color::rgb(255 - step(x), step(y), step(x))))
        .collect()
}
