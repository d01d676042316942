use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::runtime::Event;

/// Identifies one countdown. Every presented question gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountdownId(u64);

impl CountdownId {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl Default for CountdownId {
    fn default() -> Self {
        Self(0)
    }
}

impl fmt::Display for CountdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "countdown#{}", self.0)
    }
}

/// Host-side repeating timer. Each started countdown must deliver
/// `QuizController::tick(id)` once per `period` until cancelled.
pub trait Scheduler {
    fn start(&mut self, id: CountdownId, period: Duration);
    /// Cancelling an unknown or already cancelled id is a no-op.
    fn cancel(&mut self, id: CountdownId);
}

/// Runs each countdown as a tokio task posting `Event::Tick` into the runtime queue.
#[derive(Debug)]
pub struct TokioScheduler {
    events: mpsc::UnboundedSender<Event>,
    tasks: HashMap<CountdownId, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            events,
            tasks: HashMap::new(),
        }
    }

    pub fn active(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn start(&mut self, id: CountdownId, period: Duration) {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if events.send(Event::Tick(id)).is_err() {
                    break;
                }
            }
        });
        if let Some(previous) = self.tasks.insert(id, task) {
            previous.abort();
        }
        log::debug!("Started {} every {:?}", id, period);
    }

    fn cancel(&mut self, id: CountdownId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
            log::debug!("Cancelled {}", id);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
