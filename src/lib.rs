#[macro_use]
pub mod error;

pub mod abi;
pub mod args;
pub mod consumers;
pub mod format;
pub mod memory;
pub mod ptracer;
pub mod record;
pub mod syscalls;

mod cmd;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;

#[cfg(target_arch = "x86_64")]
pub mod x86;

pub use args::{Addr, SyscallArgument, SyscallArguments};
pub use consumers::{Action, EventCallback, FaultInjector, Forwarder, Printer, Rule};
pub use error::{Error, Result};
pub use format::{FormatSpecifier, LOG_MAXIMUM_SIZE};
pub use memory::Task;
pub use ptracer::{AttachStop, Outcome, Pid, Registers, Session, Signal, TraceOptions};
pub use record::{Event, EventType, SyscallEvent, TraceRecord};
pub use syscalls::SyscallInfo;
