use log::trace;

use super::{
    widget::{ClickAction, Widget, WidgetKind},
    Area, Color, Point,
};

/// Upper bound on tracked dirty areas before the whole screen is redrawn.
const MAX_INVALID_AREAS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetId(usize);

/// The widget tree of the active screen plus its dirty areas.
pub struct Screen {
    area: Area,
    background: Color,
    widgets: Vec<Widget>,
    invalid: Vec<Area>,
}

impl Screen {
    pub(crate) fn new(area: Area, background: Color) -> Self {
        Self {
            area,
            background,
            widgets: Vec::new(),
            invalid: Vec::new(),
        }
    }

    pub fn area(&self) -> Area {
        self.area
    }

    /// Changes the screen size and schedules a full redraw.
    pub(crate) fn resize(&mut self, area: Area) {
        self.area = area;
        self.invalidate_all();
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
        self.invalidate_all();
    }

    /// Adds a widget on top of the existing ones.
    pub fn add(&mut self, widget: Widget) -> WidgetId {
        if !widget.hidden {
            self.invalidate(&widget.area);
        }
        self.widgets.push(widget);
        WidgetId(self.widgets.len() - 1)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    pub fn set_hidden(&mut self, id: WidgetId, hidden: bool) {
        if let Some(widget) = self.widgets.get_mut(id.0) {
            if widget.hidden != hidden {
                widget.hidden = hidden;
                let area = widget.area;
                self.invalidate(&area);
            }
        }
    }

    pub fn is_hidden(&self, id: WidgetId) -> bool {
        self.widget(id).map_or(true, Widget::is_hidden)
    }

    pub fn set_on_click(&mut self, id: WidgetId, action: ClickAction) {
        if let Some(widget) = self.widgets.get_mut(id.0) {
            widget.on_click = Some(action);
        }
    }

    /// Sets a bar's value, clamped to 100.
    pub fn set_bar_value(&mut self, id: WidgetId, new_value: u8) {
        let Some(widget) = self.widgets.get_mut(id.0) else {
            return;
        };
        if let WidgetKind::Bar { value, .. } = &mut widget.kind {
            let new_value = new_value.min(100);
            if *value != new_value {
                *value = new_value;
                let area = widget.area;
                self.invalidate(&area);
            }
        }
    }

    pub fn bar_value(&self, id: WidgetId) -> Option<u8> {
        match self.widget(id)?.kind {
            WidgetKind::Bar { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_toggled(&self, id: WidgetId) -> bool {
        matches!(
            self.widget(id).map(Widget::kind),
            Some(WidgetKind::Button { toggled: true, .. })
        )
    }

    /// Topmost visible widget under `point` that reacts to clicks.
    pub(crate) fn clickable_at(&self, point: Point) -> Option<WidgetId> {
        self.widgets
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| !w.hidden && w.is_clickable() && w.area.contains_point(point))
            .map(|(i, _)| WidgetId(i))
    }

    pub(crate) fn set_pressing(&mut self, id: WidgetId, now_pressing: bool) {
        let Some(widget) = self.widgets.get_mut(id.0) else {
            return;
        };
        if let WidgetKind::Button { pressing, .. } = &mut widget.kind {
            if *pressing != now_pressing {
                *pressing = now_pressing;
                let area = widget.area;
                self.invalidate(&area);
            }
        }
    }

    /// Toggles a button and runs its click action.
    pub(crate) fn click(&mut self, id: WidgetId) {
        let Some(widget) = self.widgets.get_mut(id.0) else {
            return;
        };
        if let WidgetKind::Button { toggled, .. } = &mut widget.kind {
            *toggled = !*toggled;
        }
        let area = widget.area;
        let action = widget.on_click.take();
        self.invalidate(&area);
        trace!("clicked widget {} at {:?}", id.0, area);

        if let Some(mut action) = action {
            action(self);
            // The action may not remove widgets, so the slot is still ours
            if let Some(widget) = self.widgets.get_mut(id.0) {
                widget.on_click.get_or_insert(action);
            }
        }
    }

    pub(crate) fn visible_widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| !w.hidden)
    }

    /// Marks an area for redraw. Clipped to the screen and merged with
    /// overlapping areas when that saves pixels.
    pub fn invalidate(&mut self, area: &Area) {
        let Some(area) = area.intersect(&self.area) else {
            return;
        };
        if self.invalid.iter().any(|a| a.contains(&area)) {
            return;
        }
        self.invalid.retain(|a| !area.contains(a));

        let mergeable = self
            .invalid
            .iter()
            .position(|a| a.join(&area).size() < a.size() + area.size());
        if let Some(index) = mergeable {
            // The union may now overlap or cover other listed areas
            let joined = self.invalid.remove(index).join(&area);
            self.invalidate(&joined);
            return;
        }

        if self.invalid.len() >= MAX_INVALID_AREAS {
            self.invalid.clear();
            self.invalid.push(self.area);
            return;
        }
        self.invalid.push(area);
    }

    pub fn invalidate_all(&mut self) {
        self.invalid.clear();
        self.invalid.push(self.area);
    }

    pub fn invalid_areas(&self) -> &[Area] {
        &self.invalid
    }

    pub(crate) fn take_invalid(&mut self) -> Vec<Area> {
        std::mem::take(&mut self.invalid)
    }
}
