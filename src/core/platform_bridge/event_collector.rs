//=========================================================================
// Channel Event Source
//=========================================================================
//
// Core-side end of the platform → scheduler event channel.
//
// Architecture:
//   Platform ─ Sender<Event> ─→ Receiver<Event> → drain_into() → frame batch
//
// Each frame takes a snapshot of how many events are queued and drains
// exactly that many, so a flood of input cannot keep one frame from ever
// finishing. A platform that hangs up is reported as a close request.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::EventSource;
use crate::core::input::Event;

//=== ChannelEventSource ==================================================

/// [`EventSource`] fed by a crossbeam channel.
pub struct ChannelEventSource {
    receiver: Receiver<Event>,
    disconnected: bool,
}

impl ChannelEventSource {
    /// Warn when a single frame has to work through this many events.
    const BACKLOG_WARNING: usize = 256;

    pub fn new(receiver: Receiver<Event>) -> Self {
        Self {
            receiver,
            disconnected: false,
        }
    }

    /// Returns true once every sender has been dropped.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn report_disconnect(&mut self, out: &mut Vec<Event>) {
        if !self.disconnected {
            warn!(target: "platform", "Event channel disconnected, treating as close request");
            self.disconnected = true;
            out.push(Event::Closed);
        }
    }
}

impl EventSource for ChannelEventSource {
    fn drain_into(&mut self, out: &mut Vec<Event>) {
        let pending = self.receiver.len();

        if pending >= Self::BACKLOG_WARNING {
            warn!(target: "platform", "Event queue backlog: {} events this frame", pending);
        }

        // At least one attempt, so a hang-up is noticed on an idle channel.
        for _ in 0..pending.max(1) {
            match self.receiver.try_recv() {
                Ok(event) => out.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.report_disconnect(out);
                    break;
                }
            }
        }

        trace!(target: "platform", "Collected {} events", out.len());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
