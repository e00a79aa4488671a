use std::mem;

use crate::gui::Point;

use super::{IndevData, IndevState, InputDriver};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Latch {
    #[default]
    Idle,
    Latched,
}

/// Last known pointer position plus a one-shot press flag.
///
/// A press moves the latch to `Latched`; the next read reports it and moves
/// it back to `Idle`. Presses are not queued, so a second press before a
/// read only updates the position.
#[derive(Debug, Default, Clone)]
pub struct PointerLatch {
    position: Point,
    latch: Latch,
}

impl PointerLatch {
    pub fn press(&mut self, position: Point) {
        self.position = position;
        self.latch = Latch::Latched;
    }

    #[cfg(test)]
    pub fn is_latched(&self) -> bool {
        self.latch == Latch::Latched
    }

    /// Reports the current sample and consumes a pending press.
    pub fn take(&mut self) -> IndevData {
        let state = match mem::take(&mut self.latch) {
            Latch::Latched => IndevState::Pressed,
            Latch::Idle => IndevState::Released,
        };
        IndevData {
            point: self.position,
            state,
        }
    }
}

/// An [InputDriver] backed by a [PointerLatch].
#[derive(Debug, Default)]
pub struct PointerInput {
    latch: PointerLatch,
}

impl PointerInput {
    pub fn latch_mut(&mut self) -> &mut PointerLatch {
        &mut self.latch
    }
}

impl InputDriver for PointerInput {
    fn read(&mut self, data: &mut IndevData) -> bool {
        *data = self.latch.take();
        // One sample per read, nothing is buffered
        false
    }
}
