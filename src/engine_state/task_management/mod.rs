//! # Task Management System
//!
//! This module provides `TaskWorker`, a single long-lived background thread
//! that runs one `Task` over a stream of requests.
//!
//! ## Architecture Overview
//!
//! Each worker owns:
//! - a request channel (consuming thread to worker)
//! - a result channel (worker to consuming thread)
//! - a stop flag checked once per loop iteration
//! - the join handle of its thread
//!
//! There is no other state shared with the worker thread.
//!
//! ## Worker Loop
//!
//! **Idle** (request queue empty, sleeping for the idle interval) and
//! **Processing** (draining the request queue in FIFO order). A request that
//! has started always runs to completion; the stop flag is only checked
//! between requests.
//!
//! ## Consuming Side
//!
//! `has_update()` never blocks. It moves every finished output into a local
//! queue and reports whether one is waiting. `get_update()` pops the oldest
//! output and is an error when nothing is waiting. Once the worker thread has
//! ended, whether from an error, a panic or `stop()`, every call reports
//! `WorkerError::NotAlive` after any outputs it already produced are drained.
//!
//! ## Example Usage
//! ```rust
//! use chunk_pipeline::engine_state::task_management::{task::Task, TaskWorker};
//! use std::time::Duration;
//!
//! struct Doubler;
//!
//! impl Task for Doubler {
//!     type Request = u32;
//!     type Output = u32;
//!     const NAME: &'static str = "doubler";
//!
//!     fn process(&mut self, request: u32) -> chunk_pipeline::core::error::Result<u32> {
//!         Ok(request * 2)
//!     }
//! }
//!
//! let mut worker = TaskWorker::spawn(Doubler, Duration::from_millis(1))?;
//! worker.push_request(21)?;
//! while !worker.has_update()? {
//!     std::thread::yield_now();
//! }
//! assert_eq!(worker.get_update()?, 42);
//! # Ok::<(), chunk_pipeline::core::error::EngineError>(())
//! ```

pub mod task;

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, Receiver, Sender, TryRecvError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{error, info, warn};
use task::Task;

use crate::core::error::{Result, WorkerError};

/// A background thread running one `Task`.
///
/// Dropping the worker sets its stop flag and joins the thread.
pub struct TaskWorker<T: Task> {
    request_sender: Sender<T::Request>,
    result_receiver: Receiver<T::Output>,
    /// Outputs already received but not yet handed out.
    pending: VecDeque<T::Output>,
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Task> TaskWorker<T> {
    /// Moves `task` onto a new, named thread and starts its loop.
    ///
    /// # Arguments
    /// * `task` - The work to run; owned by the worker thread from now on
    /// * `idle_interval` - How long the thread sleeps when it finds no requests
    ///
    /// # Returns
    /// The running worker, or `WorkerError::Spawn` if the OS refused the thread
    pub fn spawn(task: T, idle_interval: Duration) -> Result<Self> {
        let (request_sender, request_receiver) = channel::<T::Request>();
        let (result_sender, result_receiver) = channel::<T::Output>();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_stop_flag = stop_flag.clone();

        let handle = thread::Builder::new()
            .name(T::NAME.to_string())
            .spawn(move || {
                info!("{} worker started", T::NAME);
                run_loop(
                    task,
                    &request_receiver,
                    &result_sender,
                    &thread_stop_flag,
                    idle_interval,
                );
                info!("{} worker stopped", T::NAME);
            })
            .map_err(|err| WorkerError::Spawn {
                worker: T::NAME,
                reason: err.to_string(),
            })?;

        Ok(TaskWorker {
            request_sender,
            result_receiver,
            pending: VecDeque::new(),
            stop_flag,
            handle: Some(handle),
        })
    }

    /// Whether the worker thread is still running.
    pub fn is_alive(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn not_alive() -> WorkerError {
        WorkerError::NotAlive { worker: T::NAME }
    }

    /// Queues a request for the worker.
    ///
    /// Requests are processed in the order they are pushed. Pushing the same
    /// request twice is allowed and processes it twice.
    pub fn push_request(&self, request: T::Request) -> Result<()> {
        if self.stop_flag.load(Ordering::Acquire) {
            return Err(WorkerError::Stopped { worker: T::NAME }.into());
        }
        if !self.is_alive() {
            return Err(Self::not_alive().into());
        }

        self.request_sender
            .send(request)
            .map_err(|_| Self::not_alive().into())
    }

    fn drain_results(&mut self) {
        while let Ok(output) = self.result_receiver.try_recv() {
            self.pending.push_back(output);
        }
    }

    /// Non-blocking check for finished work.
    ///
    /// # Returns
    /// * `Ok(true)` - an output is ready for `get_update()`
    /// * `Ok(false)` - nothing has finished yet
    /// * `Err(NotAlive)` - nothing is ready and the worker thread has ended
    pub fn has_update(&mut self) -> Result<bool> {
        self.drain_results();
        if !self.pending.is_empty() {
            return Ok(true);
        }
        if !self.is_alive() {
            return Err(Self::not_alive().into());
        }
        Ok(false)
    }

    /// Takes the oldest finished output.
    ///
    /// Must only be called after `has_update()` returned `true`; an empty
    /// queue is reported as `WorkerError::NoPendingUpdate` rather than waited on.
    pub fn get_update(&mut self) -> Result<T::Output> {
        self.drain_results();
        match self.pending.pop_front() {
            Some(output) => Ok(output),
            None if !self.is_alive() => Err(Self::not_alive().into()),
            None => Err(WorkerError::NoPendingUpdate { worker: T::NAME }.into()),
        }
    }

    /// Asks the worker to stop after its current request. Does not wait.
    pub fn stop(&self) {
        if !self.stop_flag.swap(true, Ordering::AcqRel) {
            info!("Stopping {} worker", T::NAME);
        }
    }

    /// Stops the worker and waits for its thread to end.
    pub fn join(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("{} worker thread panicked", T::NAME);
            }
        }
    }
}

impl<T: Task> Drop for TaskWorker<T> {
    fn drop(&mut self) {
        self.join();
    }
}

fn run_loop<T: Task>(
    mut task: T,
    requests: &Receiver<T::Request>,
    results: &Sender<T::Output>,
    stop_flag: &AtomicBool,
    idle_interval: Duration,
) {
    while !stop_flag.load(Ordering::Acquire) {
        let mut processed = false;

        loop {
            match requests.try_recv() {
                Ok(request) => {
                    processed = true;
                    match task.process(request) {
                        Ok(output) => {
                            if results.send(output).is_err() {
                                warn!("{} worker lost its consumer", T::NAME);
                                return;
                            }
                        }
                        Err(err) => {
                            error!("{} worker failed: {}", T::NAME, err);
                            return;
                        }
                    }
                    if stop_flag.load(Ordering::Acquire) {
                        return;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            }
        }

        if !processed {
            thread::sleep(idle_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{EngineError, GridError};
    use web_time::Instant;

    struct Doubler;

    impl Task for Doubler {
        type Request = u32;
        type Output = u32;
        const NAME: &'static str = "doubler";

        fn process(&mut self, request: u32) -> Result<u32> {
            Ok(request * 2)
        }
    }

    /// Fails on the request equal to `fail_on`.
    struct Fragile {
        fail_on: u32,
    }

    impl Task for Fragile {
        type Request = u32;
        type Output = u32;
        const NAME: &'static str = "fragile";

        fn process(&mut self, request: u32) -> Result<u32> {
            if request == self.fail_on {
                return Err(GridError::IndexOutOfBounds {
                    index: request as usize,
                }
                .into());
            }
            Ok(request)
        }
    }

    fn wait_for<T: Task>(worker: &mut TaskWorker<T>) -> Result<T::Output> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if worker.has_update()? {
                return worker.get_update();
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("worker produced nothing before the deadline");
    }

    fn wait_until_dead<T: Task>(worker: &TaskWorker<T>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while worker.is_alive() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(!worker.is_alive());
    }

    #[test]
    fn requests_are_answered_in_order() {
        let mut worker = TaskWorker::spawn(Doubler, Duration::from_millis(1)).unwrap();
        for request in 1..=5 {
            worker.push_request(request).unwrap();
        }

        let outputs: Vec<u32> = (0..5).map(|_| wait_for(&mut worker).unwrap()).collect();
        assert_eq!(outputs, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn get_update_on_an_empty_queue_is_an_error() {
        let mut worker = TaskWorker::spawn(Doubler, Duration::from_millis(1)).unwrap();
        assert!(!worker.has_update().unwrap());
        assert!(matches!(
            worker.get_update(),
            Err(EngineError::Worker(WorkerError::NoPendingUpdate { worker: "doubler" }))
        ));
    }

    #[test]
    fn a_failed_worker_reports_not_alive() {
        let mut worker =
            TaskWorker::spawn(Fragile { fail_on: 2 }, Duration::from_millis(1)).unwrap();
        worker.push_request(1).unwrap();
        worker.push_request(2).unwrap();

        wait_until_dead(&worker);

        assert!(worker.has_update().unwrap());
        assert_eq!(worker.get_update().unwrap(), 1);

        assert!(matches!(
            worker.has_update(),
            Err(EngineError::Worker(WorkerError::NotAlive { worker: "fragile" }))
        ));
        assert!(matches!(
            worker.get_update(),
            Err(EngineError::Worker(WorkerError::NotAlive { .. }))
        ));
        assert!(matches!(
            worker.push_request(3),
            Err(EngineError::Worker(WorkerError::NotAlive { .. }))
        ));
    }

    #[test]
    fn stopped_workers_refuse_requests() {
        let mut worker = TaskWorker::spawn(Doubler, Duration::from_millis(1)).unwrap();
        worker.stop();
        assert!(matches!(
            worker.push_request(1),
            Err(EngineError::Worker(WorkerError::Stopped { .. }))
        ));

        worker.join();
        assert!(!worker.is_alive());
    }
}
