//! Producer/consumer job queue between callers and the single worker.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

use super::message::CompassMessage;

/// Unbounded FIFO with a blocking consumer side.
///
/// Any number of threads may post; exactly one worker drains. Shutdown is a
/// silent wake: no poison message enters the queue, and messages still
/// queued when the flag is observed are abandoned.
pub struct JobQueue {
    jobs: Mutex<VecDeque<CompassMessage>>,
    available: Condvar,
    shutdown: AtomicBool,
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Append a message and wake the worker. Never blocks under load.
    pub fn post(&self, message: CompassMessage) {
        let mut jobs = self.jobs.lock();
        jobs.push_back(message);
        self.available.notify_one();
    }

    /// Pop the next message, suspending while the queue is empty.
    ///
    /// Returns `None` once shutdown has been requested. The flag is checked
    /// before the queue, so shutdown abandons anything still queued.
    pub fn take_blocking(&self) -> Option<CompassMessage> {
        let mut jobs = self.jobs.lock();
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }
            if let Some(message) = jobs.pop_front() {
                return Some(message);
            }
            self.available.wait(&mut jobs);
        }
    }

    /// Set the shutdown flag and wake any waiting consumer, without
    /// enqueuing anything.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        // Holding the lock orders the store against a consumer that is
        // between its flag check and its wait.
        let _jobs = self.jobs.lock();
        self.available.notify_all();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ChunkColumn, WorldId};
    use std::sync::Arc;
    use std::thread;

    fn update(x: i32) -> CompassMessage {
        CompassMessage::UpdatePost {
            world: WorldId(0),
            column: ChunkColumn::new(x, 0),
            band: 0,
            present: true,
        }
    }

    fn column_x(message: CompassMessage) -> i32 {
        match message {
            CompassMessage::UpdatePost { column, .. } => column.x,
            CompassMessage::DirectionRequest { .. } => panic!("unexpected request"),
        }
    }

    #[test]
    fn drains_in_fifo_order() {
        let queue = JobQueue::new();
        queue.post(update(1));
        queue.post(update(2));
        queue.post(update(3));

        assert_eq!(column_x(queue.take_blocking().expect("first")), 1);
        assert_eq!(column_x(queue.take_blocking().expect("second")), 2);
        assert_eq!(column_x(queue.take_blocking().expect("third")), 3);
    }

    #[test]
    fn shutdown_wakes_a_blocked_consumer() {
        let queue = Arc::new(JobQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.take_blocking())
        };

        // Give the consumer time to block on the empty queue.
        thread::sleep(std::time::Duration::from_millis(50));
        queue.request_shutdown();

        assert!(consumer.join().expect("join").is_none());
    }

    #[test]
    fn shutdown_abandons_queued_messages() {
        let queue = JobQueue::new();
        queue.post(update(1));
        queue.request_shutdown();
        assert!(queue.take_blocking().is_none());
    }

    #[test]
    fn many_producers_never_block() {
        let queue = Arc::new(JobQueue::new());
        let producers: Vec<_> = (0..8)
            .map(|i| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for j in 0..100 {
                        queue.post(update(i * 100 + j));
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().expect("producer join");
        }

        let mut drained = 0;
        while drained < 800 {
            queue.take_blocking().expect("message");
            drained += 1;
        }
    }
}
