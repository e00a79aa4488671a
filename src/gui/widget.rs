use super::{screen::Screen, Area, Color, Opa, OPA_COVER};

/// Called when a widget is clicked.
pub type ClickAction = Box<dyn FnMut(&mut Screen)>;

/// Thickness of the frame drawn around buttons.
const BUTTON_BORDER: i32 = 2;

pub enum WidgetKind {
    /// A plain rectangle, optionally translucent.
    Panel { color: Color, opa: Opa },
    /// A toggle button.
    Button {
        released: Color,
        pressed: Color,
        toggled: bool,
        /// The pointer is currently held down on it.
        pressing: bool,
    },
    /// A horizontal progress bar, `value` in percent.
    Bar {
        background: Color,
        indicator: Color,
        value: u8,
    },
    /// A row-major pixel map covering the widget's area.
    Image { pixels: Vec<Color> },
}

pub struct Widget {
    pub(crate) area: Area,
    pub(crate) kind: WidgetKind,
    pub(crate) hidden: bool,
    pub(crate) on_click: Option<ClickAction>,
}

/// A primitive the renderer knows how to put into a buffer or on screen.
#[derive(Debug, PartialEq)]
pub(crate) enum DrawOp<'a> {
    Fill { area: Area, color: Color, opa: Opa },
    Map { area: Area, pixels: &'a [Color] },
}

impl Widget {
    fn new(area: Area, kind: WidgetKind) -> Self {
        Self {
            area,
            kind,
            hidden: false,
            on_click: None,
        }
    }

    pub fn panel(area: Area, color: Color, opa: Opa) -> Self {
        Self::new(area, WidgetKind::Panel { color, opa })
    }

    pub fn button(area: Area, released: Color, pressed: Color) -> Self {
        Self::new(
            area,
            WidgetKind::Button {
                released,
                pressed,
                toggled: false,
                pressing: false,
            },
        )
    }

    pub fn bar(area: Area, background: Color, indicator: Color) -> Self {
        Self::new(
            area,
            WidgetKind::Bar {
                background,
                indicator,
                value: 0,
            },
        )
    }

    /// Missing pixels are padded with black, extra ones are dropped.
    pub fn image(area: Area, mut pixels: Vec<Color>) -> Self {
        pixels.resize(area.size(), Color::BLACK);
        Self::new(area, WidgetKind::Image { pixels })
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub(crate) fn is_clickable(&self) -> bool {
        matches!(self.kind, WidgetKind::Button { .. })
    }

    pub(crate) fn draw_ops(&self) -> Vec<DrawOp<'_>> {
        let area = self.area;
        match &self.kind {
            WidgetKind::Panel { color, opa } => vec![DrawOp::Fill {
                area,
                color: *color,
                opa: *opa,
            }],
            WidgetKind::Button {
                released,
                pressed,
                toggled,
                pressing,
            } => {
                let body = match (*pressing, *toggled) {
                    (true, _) => pressed.darken(60),
                    (false, true) => *pressed,
                    (false, false) => *released,
                };
                let inner = Area::new(
                    area.x1 + BUTTON_BORDER,
                    area.y1 + BUTTON_BORDER,
                    area.x2 - BUTTON_BORDER,
                    area.y2 - BUTTON_BORDER,
                );
                let mut ops = vec![DrawOp::Fill {
                    area,
                    color: body.darken(100),
                    opa: OPA_COVER,
                }];
                if !inner.is_empty() {
                    ops.push(DrawOp::Fill {
                        area: inner,
                        color: body,
                        opa: OPA_COVER,
                    });
                }
                ops
            }
            WidgetKind::Bar {
                background,
                indicator,
                value,
            } => {
                let mut ops = vec![DrawOp::Fill {
                    area,
                    color: *background,
                    opa: OPA_COVER,
                }];
                let filled = area.width() * *value as i32 / 100;
                if filled > 0 {
                    ops.push(DrawOp::Fill {
                        area: Area::new(area.x1, area.y1, area.x1 + filled - 1, area.y2),
                        color: *indicator,
                        opa: OPA_COVER,
                    });
                }
                ops
            }
            WidgetKind::Image { pixels } => vec![DrawOp::Map { area, pixels }],
        }
    }
}
