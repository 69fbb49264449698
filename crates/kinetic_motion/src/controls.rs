//! Imperative animation controls
//!
//! [`AnimationControls`] lets code outside the element tree drive elements
//! bound to it (`Animate::Controls`). Commands are queued and picked up by
//! the scene on its next update; every bound element sees every command.
//!
//! Each bound element holds a [`ControlsReader`]. A command is dropped from
//! the queue once every live reader has taken it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A command issued through [`AnimationControls`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    /// Animate bound elements to a variant
    Start(String),
    /// Jump bound elements to a variant without animating
    Set(String),
    /// Stop running animations on bound elements
    Stop,
}

/// Read position of one bound element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlsReader(usize);

#[derive(Debug, Default)]
struct ControlsState {
    queue: VecDeque<ControlCommand>,
    /// Sequence number of the front of `queue`
    head: u64,
    /// Next sequence number per reader; `None` once released
    readers: Vec<Option<u64>>,
    starts: u32,
}

impl ControlsState {
    fn push(&mut self, command: ControlCommand) {
        self.queue.push_back(command);
    }

    /// Drop commands every live reader has taken
    fn trim(&mut self) {
        let Some(oldest) = self.readers.iter().flatten().min().copied() else {
            return;
        };
        while self.head < oldest && self.queue.pop_front().is_some() {
            self.head += 1;
        }
    }
}

/// Shared, single-threaded handle for starting and stopping animations
#[derive(Clone, Debug, Default)]
pub struct AnimationControls {
    inner: Rc<RefCell<ControlsState>>,
}

impl AnimationControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, label: impl Into<String>) {
        let label = label.into();
        tracing::debug!(%label, "controls start");
        let mut state = self.inner.borrow_mut();
        state.starts += 1;
        state.push(ControlCommand::Start(label));
    }

    pub fn set(&self, label: impl Into<String>) {
        self.inner
            .borrow_mut()
            .push(ControlCommand::Set(label.into()));
    }

    pub fn stop(&self) {
        self.inner.borrow_mut().push(ControlCommand::Stop);
    }

    /// How many times `start` has been called
    pub fn start_count(&self) -> u32 {
        self.inner.borrow().starts
    }

    /// Commands still queued for at least one reader
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Register a reader; it first sees every command still queued
    pub fn subscribe(&self) -> ControlsReader {
        let mut state = self.inner.borrow_mut();
        let head = state.head;
        state.readers.push(Some(head));
        ControlsReader(state.readers.len() - 1)
    }

    /// Commands `reader` has not seen yet
    pub fn take(&self, reader: ControlsReader) -> Vec<ControlCommand> {
        let mut state = self.inner.borrow_mut();
        let end = state.head + state.queue.len() as u64;
        let Some(Some(next)) = state.readers.get(reader.0).copied() else {
            return Vec::new();
        };
        let skip = next.saturating_sub(state.head) as usize;
        let commands: Vec<ControlCommand> = state.queue.iter().skip(skip).cloned().collect();
        state.readers[reader.0] = Some(end);
        state.trim();
        commands
    }

    /// Stop tracking `reader`; its unread commands no longer hold the queue
    pub fn release(&self, reader: ControlsReader) {
        let mut state = self.inner.borrow_mut();
        if let Some(slot) = state.readers.get_mut(reader.0) {
            *slot = None;
        }
        state.trim();
    }

    /// Whether two handles control the same elements
    pub fn ptr_eq(&self, other: &AnimationControls) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_are_seen_once_per_reader() {
        let controls = AnimationControls::new();
        let handle = controls.clone();
        assert!(controls.ptr_eq(&handle));

        let reader = controls.subscribe();
        handle.start("visible");
        assert_eq!(
            controls.take(reader),
            vec![ControlCommand::Start("visible".into())]
        );
        assert!(controls.take(reader).is_empty());

        handle.stop();
        assert_eq!(controls.take(reader), vec![ControlCommand::Stop]);
        assert_eq!(controls.start_count(), 1);
    }

    #[test]
    fn test_queued_before_subscribe_is_replayed() {
        let controls = AnimationControls::new();
        controls.set("hidden");

        let reader = controls.subscribe();
        assert_eq!(
            controls.take(reader),
            vec![ControlCommand::Set("hidden".into())]
        );
    }

    #[test]
    fn test_queue_drains_once_every_reader_has_taken() {
        let controls = AnimationControls::new();
        let first = controls.subscribe();
        let second = controls.subscribe();

        for _ in 0..1000 {
            controls.start("open");
            controls.stop();
            assert_eq!(controls.take(first).len(), 2);
        }
        // `second` has not read yet
        assert_eq!(controls.pending(), 2000);
        assert_eq!(controls.take(second).len(), 2000);
        assert_eq!(controls.pending(), 0);
        assert_eq!(controls.start_count(), 1000);

        controls.set("closed");
        controls.release(second);
        assert_eq!(controls.pending(), 1);
        assert_eq!(controls.take(first).len(), 1);
        assert_eq!(controls.pending(), 0);
        assert!(controls.take(second).is_empty());
    }
}
