//! Consumers of trace records, driven by the run loop's callback interface.

use crate::error::Result;
use crate::memory::Task;
use crate::record::TraceRecord;

pub mod filter;
pub mod forward;
pub mod printer;

pub use filter::{Action, FaultInjector, Rule};
pub use forward::Forwarder;
pub use printer::Printer;

/// Invoked once per record, before the stopped tracee is resumed.
///
/// `task` is the thread the record is about, and may be used to read its memory. Returning
/// an error ends the trace session: every tracee is killed, and the error is returned from
/// [`Session::trace()`](crate::ptracer::Session::trace).
pub trait EventCallback: Send {
    fn on_event(&mut self, task: &dyn Task, record: &TraceRecord) -> Result<()>;
}

impl<F> EventCallback for F
where
    F: FnMut(&dyn Task, &TraceRecord) -> Result<()> + Send,
{
    fn on_event(&mut self, task: &dyn Task, record: &TraceRecord) -> Result<()> {
        self(task, record)
    }
}
