//! Work deferred to the next paint boundary.
//!
//! Highlight notifications may be delivered on the next frame instead of
//! synchronously. The host owns the frame loop and drains the queue with
//! [`SharedFrameQueue::process_all`] when it is about to paint; tasks run in
//! the order they were posted.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::Signal;
use crate::logging::{span_names, targets};

/// A unique identifier for a frame task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTaskId(u64);

impl FrameTaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_FRAME_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> FrameTaskId {
    FrameTaskId(NEXT_FRAME_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: FrameTaskId,
    task: BoxedTask,
}

/// FIFO queue of tasks waiting for the next frame.
#[derive(Default)]
pub struct FrameQueue {
    tasks: VecDeque<TaskData>,
}

impl FrameQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a task to run at the next frame.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn post<F>(&mut self, task: F) -> FrameTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            task: Box::new(task),
        });
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: FrameTaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            crate::rubberband_trace!(task = id.as_u64(), "frame task cancelled");
            true
        } else {
            false
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    fn drain(&mut self) -> VecDeque<TaskData> {
        std::mem::take(&mut self.tasks)
    }
}

/// A cloneable, thread-safe handle to a [`FrameQueue`].
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct SharedFrameQueue {
    inner: Arc<Mutex<FrameQueue>>,
}

impl SharedFrameQueue {
    /// Create a new, empty shared queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a task to run at the next frame.
    pub fn post<F>(&self, task: F) -> FrameTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.lock().post(task)
    }

    /// Cancel a pending task.
    pub fn cancel(&self, id: FrameTaskId) -> bool {
        self.inner.lock().cancel(id)
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        self.inner.lock().has_pending()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending_count()
    }

    /// Run every task that was pending when the call started.
    ///
    /// Tasks posted while draining wait for the following frame. Returns the
    /// number of tasks run.
    pub fn process_all(&self) -> usize {
        let batch = self.inner.lock().drain();
        let count = batch.len();
        let _span = tracing::trace_span!(target: targets::FRAME, span_names::FRAME, tasks = count).entered();
        for task_data in batch {
            (task_data.task)();
        }
        count
    }
}

impl std::fmt::Debug for SharedFrameQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedFrameQueue")
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// When notifications reach their observers.
///
/// Correctness never depends on the choice: the sequence of values delivered
/// is the same, only the moment of delivery differs.
#[derive(Debug, Clone, Default)]
pub enum NotifyStrategy {
    /// Emit synchronously, inside the call that produced the value.
    #[default]
    Immediate,
    /// Post the emission to a frame queue drained by the host at paint time.
    NextFrame(SharedFrameQueue),
}

impl NotifyStrategy {
    /// Deliver `args` to `signal` according to this strategy.
    pub fn notify<Args>(&self, signal: &Arc<Signal<Args>>, args: Args)
    where
        Args: Clone + Send + 'static,
    {
        match self {
            Self::Immediate => signal.emit(args),
            Self::NextFrame(queue) => {
                let signal = Arc::clone(signal);
                let id = queue.post(move || signal.emit(args));
                tracing::trace!(target: targets::FRAME, task = id.as_u64(), "notification deferred to next frame");
            }
        }
    }

    /// Whether notifications are deferred.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::NextFrame(_))
    }
}

static_assertions::assert_impl_all!(SharedFrameQueue: Send, Sync);
