//! Input dispatch.
//!
//! Uses a bounded `embassy-sync` channel to bridge input producers (GPIO
//! poller, stdin, tests) to the controller.  A single dispatcher thread
//! drains it, so button presses are serialized before they reach the lock.
//!
//! ```text
//! ┌──────────────┐  InputEvent  ┌──────────────────┐  handle()  ┌────────────┐
//! │ Buttons/stdin│─────────────▶│ InputDispatcher  │───────────▶│ Controller │
//! └──────────────┘  (bounded)   └──────────────────┘            └────────────┘
//! ```

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel as EventChannel;
use embassy_sync::signal::Signal;
use futures_lite::future;
use log::{debug, info, warn};

use super::commands::InputEvent;
use super::controller::Controller;
use super::ports::IndicatorPort;

/// Pending presses before new ones are dropped.
pub const INPUT_QUEUE_DEPTH: usize = 8;

/// Queue shared by input producers and the dispatcher.
pub struct InputQueue {
    events: EventChannel<CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_DEPTH>,
    stop: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub const fn new() -> Self {
        Self {
            events: EventChannel::new(),
            stop: Signal::new(),
        }
    }

    /// Enqueue a press.  Returns `false` if the queue is full (press dropped).
    pub fn press(&self, event: InputEvent) -> bool {
        match self.events.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("Input queue full, dropped {}", event.name());
                false
            }
        }
    }

    /// Ask the dispatcher to return once the queue is drained.
    pub fn stop(&self) {
        self.stop.signal(());
    }

    /// Presses waiting to be handled.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Delivers queued input events to the controller.
pub struct InputDispatcher<I> {
    queue: Arc<InputQueue>,
    controller: Arc<Controller<I>>,
}

impl<I: IndicatorPort> InputDispatcher<I> {
    pub fn new(queue: Arc<InputQueue>, controller: Arc<Controller<I>>) -> Self {
        Self { queue, controller }
    }

    /// Block handling events until [`InputQueue::stop`] is called.
    /// Returns the number of events handled.
    pub fn run(&self) -> u64 {
        let mut handled = 0u64;
        loop {
            let next = future::block_on(future::or(
                async { Some(self.queue.events.receive().await) },
                async {
                    self.queue.stop.wait().await;
                    None
                },
            ));
            match next {
                Some(event) => {
                    self.dispatch(event);
                    handled += 1;
                }
                None => break,
            }
        }
        info!("Input dispatcher stopped after {} events", handled);
        handled
    }

    /// Handle whatever is queued right now without blocking.
    pub fn drain(&self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.queue.events.try_receive() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    fn dispatch(&self, event: InputEvent) {
        debug!("Input: {}", event.name());
        self.controller.handle(event);
    }
}
