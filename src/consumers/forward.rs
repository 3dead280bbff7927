use std::sync::mpsc::SyncSender;

use crate::error::{Error, Result};
use crate::memory::Task;
use crate::record::TraceRecord;

use super::EventCallback;

/// Sends a copy of each record to a channel, for consumption on another thread.
///
/// Sending blocks while the channel is full, and the tracee stays stopped until the send
/// completes. A slow receiver thus stalls the whole traced process tree. Use a bound large
/// enough to absorb bursts, or a rendezvous channel for lockstep consumption.
///
/// If the receiver hangs up, the session ends with [`Error::RecordsClosed`].
#[derive(Debug)]
pub struct Forwarder {
    tx: SyncSender<TraceRecord>,
}

impl Forwarder {
    pub fn new(tx: SyncSender<TraceRecord>) -> Self {
        Self { tx }
    }
}

impl EventCallback for Forwarder {
    fn on_event(&mut self, _task: &dyn Task, record: &TraceRecord) -> Result<()> {
        self.tx.send(record.clone()).map_err(|_| Error::RecordsClosed)
    }
}
