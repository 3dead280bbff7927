//! Records of observed tracee events, as delivered to event callbacks.

use std::fmt;
use std::time::{Duration, SystemTime};

use nix::errno::Errno;

use crate::args::{SyscallArgument, SyscallArguments};
use crate::ptracer::{Pid, Registers, Signal};
use crate::syscalls::{self, SyscallInfo};

/// The kind of an [`Event`], without its payload.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventType {
    SyscallEnter,
    SyscallExit,
    SignalExit,
    Exit,
    SignalStop,
    NewChild,
    Unknown,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One syscall-stop: the register state and what was read from it.
#[derive(Clone, Debug)]
pub struct SyscallEvent {
    /// Register snapshot at the stop.
    pub regs: Registers,

    pub sysno: u64,

    /// Argument slots. At syscall-exit, these are the arguments captured at the matching
    /// syscall-enter, since argument registers may be clobbered by the return value.
    pub args: SyscallArguments,

    /// Return value registers. Only meaningful at syscall-exit.
    pub ret: [SyscallArgument; 2],

    /// Set at syscall-exit if the syscall failed.
    pub errno: Option<Errno>,

    /// Time from the matching syscall-enter to this stop. Zero at syscall-enter.
    pub duration: Duration,
}

impl SyscallEvent {
    pub fn info(&self) -> SyscallInfo {
        syscalls::lookup(self.sysno)
    }
}

/// What happened to a tracee, with exactly the payload that kind of event carries.
#[derive(Clone, Debug)]
pub enum Event {
    SyscallEnter(SyscallEvent),
    SyscallExit(SyscallEvent),

    /// The tracee was killed by a signal.
    SignalExit { signal: Signal, core_dumped: bool },

    /// The tracee exited normally.
    Exit { exit_code: i32 },

    /// The tracee stopped for a signal, which is re-injected on resume unless it was an
    /// expected attach-stop.
    SignalStop { signal: Signal },

    /// The tracee created a new thread or process, which is now traced.
    NewChild { pid: Pid },

    Unknown,
}

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Event::SyscallEnter(_) => EventType::SyscallEnter,
            Event::SyscallExit(_) => EventType::SyscallExit,
            Event::SignalExit { .. } => EventType::SignalExit,
            Event::Exit { .. } => EventType::Exit,
            Event::SignalStop { .. } => EventType::SignalStop,
            Event::NewChild { .. } => EventType::NewChild,
            Event::Unknown => EventType::Unknown,
        }
    }

    pub fn syscall(&self) -> Option<&SyscallEvent> {
        match self {
            Event::SyscallEnter(syscall) | Event::SyscallExit(syscall) => Some(syscall),
            _ => None,
        }
    }
}

/// One observable event of one tracee.
#[derive(Clone, Debug)]
pub struct TraceRecord {
    pub pid: Pid,

    /// Count of records previously produced for `pid`.
    pub serial: u64,

    pub time: SystemTime,
    pub event: Event,
}

impl TraceRecord {
    pub fn event_type(&self) -> EventType {
        self.event.event_type()
    }

    /// The canonical name used to match rules against this record.
    ///
    /// Syscall stops are named by an `E` or `X` prefix on the syscall name, e.g. `Eopenat`
    /// or `Xwrite`. Syscalls missing from the table use their number as four hex digits.
    /// Other events use their type name, e.g. `NewChild`.
    pub fn event_name(&self) -> String {
        let (prefix, syscall) = match &self.event {
            Event::SyscallEnter(syscall) => ("E", syscall),
            Event::SyscallExit(syscall) => ("X", syscall),
            event => return event.event_type().to_string(),
        };

        match syscalls::get(syscall.sysno) {
            Some(info) => format!("{}{}", prefix, info.name),
            None => format!("{}{:04x}", prefix, syscall.sysno),
        }
    }
}
