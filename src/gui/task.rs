use super::{screen::Screen, tick_elapsed};

pub type TaskFn = Box<dyn FnMut(&mut Screen)>;

/// Handle to a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(usize);

struct Task {
    period: u32,
    last_run: u32,
    callback: TaskFn,
}

/// Callbacks run from the task handler every `period` milliseconds.
#[derive(Default)]
pub(crate) struct TaskList {
    tasks: Vec<Option<Task>>,
}

impl TaskList {
    /// The first run happens one period after `now`.
    pub(crate) fn add(&mut self, period: u32, now: u32, callback: TaskFn) -> TaskId {
        self.tasks.push(Some(Task {
            period,
            last_run: now,
            callback,
        }));
        TaskId(self.tasks.len() - 1)
    }

    pub(crate) fn remove(&mut self, id: TaskId) -> bool {
        self.tasks
            .get_mut(id.0)
            .and_then(Option::take)
            .is_some()
    }

    /// Runs every task whose period has elapsed, in registration order.
    pub(crate) fn run_due(&mut self, now: u32, screen: &mut Screen) -> usize {
        let mut ran = 0;
        for task in self.tasks.iter_mut().flatten() {
            if tick_elapsed(now, task.last_run) >= task.period {
                task.last_run = now;
                (task.callback)(screen);
                ran += 1;
            }
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::{Area, Color};
    use std::{cell::Cell, rc::Rc};

    fn counting(counter: &Rc<Cell<u32>>) -> TaskFn {
        let counter = counter.clone();
        Box::new(move |_: &mut Screen| counter.set(counter.get() + 1))
    }

    #[test_log::test]
    fn tasks_run_once_per_period() {
        let mut screen = Screen::new(Area::with_size(0, 0, 10, 10), Color::WHITE);
        let mut tasks = TaskList::default();
        let runs = Rc::new(Cell::new(0));
        tasks.add(50, 0, counting(&runs));

        assert_eq!(tasks.run_due(49, &mut screen), 0);
        assert_eq!(tasks.run_due(50, &mut screen), 1);
        assert_eq!(tasks.run_due(60, &mut screen), 0);
        assert_eq!(tasks.run_due(100, &mut screen), 1);
        assert_eq!(runs.get(), 2);
    }

    #[test_log::test]
    fn periods_survive_tick_wrap_around() {
        let mut screen = Screen::new(Area::with_size(0, 0, 10, 10), Color::WHITE);
        let mut tasks = TaskList::default();
        let runs = Rc::new(Cell::new(0));
        tasks.add(10, u32::MAX - 4, counting(&runs));

        assert_eq!(tasks.run_due(3, &mut screen), 0);
        assert_eq!(tasks.run_due(5, &mut screen), 1);
    }

    #[test_log::test]
    fn removed_tasks_stop_running() {
        let mut screen = Screen::new(Area::with_size(0, 0, 10, 10), Color::WHITE);
        let mut tasks = TaskList::default();
        let runs = Rc::new(Cell::new(0));
        let id = tasks.add(1, 0, counting(&runs));

        assert!(tasks.remove(id));
        assert!(!tasks.remove(id));
        assert_eq!(tasks.run_due(10, &mut screen), 0);
    }
}
