//! # Task System Core Trait
//!
//! This module defines the unit of work run by a `TaskWorker`.
//!
//! ## Task Lifecycle
//! 1. The task is built on the consuming thread, taking ownership of everything it
//!    needs (for example a definitions duplicate)
//! 2. `TaskWorker::spawn` moves it onto its own long-lived thread
//! 3. `process()` is called once per request, in arrival order
//! 4. Each output is sent back to the consuming thread
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be moved onto the worker thread
//! - Requests and outputs must be `Send` to cross the channels
//! - A task is only ever touched by its own worker thread, so `process` takes `&mut self`

use crate::core::error::Result;

/// A long-lived unit of background work.
///
/// # Implementation Guidelines
/// - Should own all of its data; no references to state shared with other threads
/// - Should fail with an error rather than panic; an error ends the worker
pub trait Task: Send + 'static {
    /// What the consuming thread sends in.
    type Request: Send + 'static;
    /// What the worker sends back.
    type Output: Send + 'static;

    /// Name used for the worker thread, log lines and errors.
    const NAME: &'static str;

    /// Processes one request on the worker thread.
    ///
    /// # Returns
    /// The output to send back, or an error. An error is logged and stops the worker;
    /// further calls into the worker then report it as not alive.
    fn process(&mut self, request: Self::Request) -> Result<Self::Output>;
}
