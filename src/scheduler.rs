//! Deferred execution.
//!
//! The driver needs exactly one thing from an event loop: run a callback later,
//! in submission order, never from inside the call that scheduled it. That is the
//! [`Scheduler`] trait. [`Queue`] is a minimal single-threaded FIFO that
//! satisfies it, enough to embed the driver or test it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// A deferred callback.
pub type Task = Box<dyn FnOnce()>;

/// Runs callbacks later, in the order they were deferred.
///
/// Implementations must never run `task` before `defer` returns.
pub trait Scheduler {
    fn defer(&self, task: Task);
}

impl<S> Scheduler for Rc<S>
where
    S: Scheduler + ?Sized,
{
    fn defer(&self, task: Task) {
        (**self).defer(task)
    }
}

/// Single-threaded FIFO of deferred tasks.
///
/// Clones share the same queue, so one handle can be given to coroutines while
/// another drains it.
///
/// ```rust
/// use sans_await::prelude::*;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let queue = Queue::new();
/// let order = Rc::new(RefCell::new(Vec::new()));
/// for i in 0..3 {
///     let order = Rc::clone(&order);
///     queue.defer(Box::new(move || order.borrow_mut().push(i)));
/// }
///
/// assert!(order.borrow().is_empty());
/// assert_eq!(queue.run_until_idle(), 3);
/// assert_eq!(&*order.borrow(), &[0, 1, 2]);
/// ```
#[derive(Clone, Default)]
pub struct Queue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Run the oldest task, if any. Returns whether a task ran.
    pub fn run_once(&self) -> bool {
        // Released before running: the task may defer more work.
        let task = self.tasks.borrow_mut().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty, including tasks deferred while
    /// draining. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_once() {
            ran += 1;
        }
        trace!(ran, "queue idle");
        ran
    }
}

impl Scheduler for Queue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defer_does_not_run_task() {
        let queue = Queue::new();
        let ran = Rc::new(RefCell::new(false));
        queue.defer(Box::new({
            let ran = Rc::clone(&ran);
            move || *ran.borrow_mut() = true
        }));

        assert!(!*ran.borrow());
        assert_eq!(queue.len(), 1);
        assert!(queue.run_once());
        assert!(*ran.borrow());
        assert!(queue.is_empty());
        assert!(!queue.run_once());
    }

    #[test]
    fn test_tasks_deferred_while_draining_run_after_earlier_ones() {
        let queue = Queue::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        queue.defer(Box::new({
            let queue = queue.clone();
            let order = Rc::clone(&order);
            move || {
                order.borrow_mut().push("first");
                let order = Rc::clone(&order);
                queue.defer(Box::new(move || order.borrow_mut().push("nested")));
            }
        }));
        queue.defer(Box::new({
            let order = Rc::clone(&order);
            move || order.borrow_mut().push("second")
        }));

        assert_eq!(queue.run_until_idle(), 3);
        assert_eq!(&*order.borrow(), &["first", "second", "nested"]);
    }

    #[test]
    fn test_rc_scheduler_forwards() {
        let queue = Queue::new();
        let shared: Rc<dyn Scheduler> = Rc::new(queue.clone());
        shared.defer(Box::new(|| {}));
        assert_eq!(queue.len(), 1);
    }
}
