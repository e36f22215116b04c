//! Task contract between protocol tasks and the per-session scheduler

use crate::WardenResult;

/// Outcome of a successful `build` or `process` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskStatus {
    /// The task has completed and can be retired
    Success,
    /// The task expects further rounds
    NeedMore,
}

impl TaskStatus {
    /// Check if the task has completed
    pub fn is_complete(self) -> bool {
        matches!(self, TaskStatus::Success)
    }
}

/// Protocol task interface
///
/// A scheduler owns a queue of tasks per session and alternates `build` (to
/// fill an outgoing message) and `process` (to consume an inbound message)
/// according to its role. Exactly one call runs at a time for a session.
///
/// Failures are returned as `Err`; the scheduler is expected to abort the
/// exchange when it sees one.
pub trait Task: Send {
    /// Shared state the task reads and mutates during a call
    type Context: ?Sized;

    /// Message type exchanged with the peer
    type Message;

    /// Non-owning reference to the session this task works for
    type Handle: Copy;

    /// Identifier type for task kinds
    type Kind: Copy;

    /// Add payloads for this task to an outgoing message
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot run in this direction
    fn build(
        &mut self,
        ctx: &mut Self::Context,
        message: &mut Self::Message,
    ) -> WardenResult<TaskStatus>;

    /// Consume the payloads relevant to this task from an inbound message
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot run in this direction
    fn process(
        &mut self,
        ctx: &mut Self::Context,
        message: &Self::Message,
    ) -> WardenResult<TaskStatus>;

    /// Constant identifier for this kind of task
    fn kind(&self) -> Self::Kind;

    /// Rebind the task to a different session, keeping all other state
    fn migrate(&mut self, handle: Self::Handle);

    /// Retire the task
    ///
    /// Releases task-owned state only; session-owned state outlives the task.
    fn destroy(self: Box<Self>) {}
}
