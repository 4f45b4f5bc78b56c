//! Single-threaded deferred work.
//!
//! Command actions and document insertions are queued here instead of being
//! run inline, so a slow action never blocks the keystroke that triggered it.
//! The host drains the queue from its event loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

pub type Task = Box<dyn FnOnce()>;

/// Handle to a queue of deferred tasks. Clones share the same queue, so a
/// running task may hold a clone and defer follow-up work.
#[derive(Clone, Default)]
pub struct TaskQueue {
    pending: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run on the next drain.
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.pending.borrow_mut().push_back(Box::new(task));
    }

    /// Run every task that was queued before this call, in FIFO order.
    /// Tasks deferred while the batch runs wait for the next call.
    /// Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let batch: Vec<Task> = self.pending.borrow_mut().drain(..).collect();
        let count = batch.len();
        for task in batch {
            task();
        }
        if count > 0 {
            log::debug!("ran {count} deferred task(s)");
        }
        count
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_defer_does_not_run_inline() {
        let hits = Rc::new(RefCell::new(0));
        let queue = TaskQueue::new();
        let h = Rc::clone(&hits);
        queue.defer(move || *h.borrow_mut() += 1);
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(*hits.borrow(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_runs_in_fifo_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let queue = TaskQueue::new();
        for i in 0..3 {
            let log = Rc::clone(&log);
            queue.defer(move || log.borrow_mut().push(i));
        }
        queue.run_pending();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_task_can_defer_follow_up() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let queue = TaskQueue::new();

        let handle = queue.clone();
        let outer_log = Rc::clone(&log);
        queue.defer(move || {
            outer_log.borrow_mut().push("first");
            let inner_log = Rc::clone(&outer_log);
            handle.defer(move || inner_log.borrow_mut().push("follow-up"));
        });

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(*log.borrow(), vec!["first"]);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(*log.borrow(), vec!["first", "follow-up"]);
        assert!(queue.is_empty());
    }
}
