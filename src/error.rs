use std::io;

use crate::ptracer::{Pid, Restart};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("A trace session is already active in this process")]
    SessionActive,

    #[error("Could not spawn traced command")]
    Spawn(#[source] io::Error),

    #[error("Could not set up tracee = {pid}: {reason}")]
    Setup { pid: Pid, reason: String },

    #[error("ptrace request {op} failed for tracee = {pid}")]
    Ptrace {
        pid: Pid,
        op: &'static str,
        source: nix::Error,
    },

    #[error("Could not restart tracee = {pid} with mode = {mode:?}")]
    Restart { pid: Pid, mode: Restart, source: nix::Error },

    #[error("Could not wait for tracees")]
    Wait(#[source] nix::Error),

    #[error("Could not read tracee memory at {addr:#x}")]
    Memory { addr: u64, source: nix::Error },

    #[error("Short read at {addr:#x}: wanted {wanted} bytes, got {got}")]
    ShortRead { addr: u64, wanted: usize, got: usize },

    #[error("{0}")]
    Decode(String),

    #[error("Invalid rule: {0}")]
    Rule(String),

    #[error("Injected fault on {event} (intended return value {value})")]
    FaultInjected { event: String, value: i64 },

    #[error("Event callback failed")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Trace record receiver hung up")]
    RecordsClosed,

    #[error("Input/output error")]
    IO(#[from] io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub(crate) trait ResultExt<T> {
    /// Attribute a failed ptrace request to the tracee it was issued for.
    fn with_pid(self, pid: Pid, op: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, nix::Error> {
    fn with_pid(self, pid: Pid, op: &'static str) -> Result<T> {
        self.map_err(|source| Error::Ptrace { pid, op, source })
    }
}

macro_rules! internal_error {
    ($msg: expr) => {
        return Err($crate::error::Error::Internal($msg.into()))
    };
}

