use std::io::Write;

use crate::error::Result;
use crate::format::LOG_MAXIMUM_SIZE;
use crate::memory::Task;
use crate::record::{Event, TraceRecord};

use super::EventCallback;

/// Writes one line of text per record.
#[derive(Debug)]
pub struct Printer<W> {
    out: W,
    max: usize,
    raw: bool,
}

impl<W: Write + Send> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out, max: LOG_MAXIMUM_SIZE, raw: false }
    }

    /// Bound the bytes dumped from any one buffer argument.
    pub fn with_max_size(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// Print records undecoded, as their event name, serial, and `Debug` payload.
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render `record` as one line, without a trailing newline.
    pub fn render(&self, task: &dyn Task, record: &TraceRecord) -> String {
        if self.raw {
            return format!(
                "{} {}#{}: {:?}",
                record.event_name(),
                record.pid,
                record.serial,
                record.event,
            );
        }

        let name = task.name();

        match &record.event {
            Event::SyscallEnter(syscall) => {
                syscall.info().print_enter(task, &syscall.args, self.max)
            },
            Event::SyscallExit(syscall) => syscall.info().print_exit(
                task,
                syscall.duration,
                &syscall.args,
                syscall.ret[0],
                syscall.errno,
                self.max,
            ),
            Event::SignalExit { signal, core_dumped: true } => {
                format!("{name} +++ killed by {} (core dumped) +++", signal.as_str())
            },
            Event::SignalExit { signal, .. } => {
                format!("{name} +++ killed by {} +++", signal.as_str())
            },
            Event::Exit { exit_code } => format!("{name} +++ exited with {exit_code} +++"),
            Event::SignalStop { signal } => format!("{name} --- stopped by {} ---", signal.as_str()),
            Event::NewChild { pid } => format!("{name} --- new child {pid} ---"),
            Event::Unknown => format!("{name} --- unknown event ---"),
        }
    }
}

impl<W: Write + Send> EventCallback for Printer<W> {
    fn on_event(&mut self, task: &dyn Task, record: &TraceRecord) -> Result<()> {
        let line = self.render(task, record);
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}
