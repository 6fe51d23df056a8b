//! Portable bounded channel for `no_std` environments.
//!
//! A simple SPSC-style channel built on `critical-section` and
//! `heapless::Deque`. The producer side never blocks: when the queue is
//! full the oldest entry is dropped, so a slow consumer costs stale
//! events rather than scan-loop latency.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// A bounded, thread-safe channel with drop-oldest overflow.
///
/// This channel uses critical sections for synchronization, making it
/// suitable for embedded environments. The channel is backed by a
/// fixed-size `heapless::Deque`.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a receiver handle for this channel.
    ///
    /// Typically only one receiver should drain the queue, but multiple
    /// receivers are allowed (they will compete for messages).
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Send a value into the channel.
    ///
    /// If the channel is full, the oldest queued value is dropped to
    /// make room. Returns the dropped value, if any.
    pub fn send(&self, value: T) -> Option<T> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            let dropped = if queue.is_full() {
                queue.pop_front()
            } else {
                None
            };
            let _ = queue.push_back(value);
            dropped
        })
    }

    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A receiver handle for a [`Channel`].
///
/// This is a lightweight reference that can be cloned and passed around.
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.channel.try_receive()
    }
}
