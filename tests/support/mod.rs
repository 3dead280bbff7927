use std::collections::{BTreeMap, HashMap};
use std::convert::TryInto;
use std::fs;
use std::io;
use std::mem;
use std::process::Command;
use std::slice;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use nix::errno::Errno;
use pretty_assertions::assert_eq;
use strace::{
    Addr,
    Error,
    Event,
    EventCallback,
    Outcome,
    Pid,
    Registers,
    Result,
    Session,
    Signal,
    SyscallEvent,
    Task,
    TraceOptions,
    TraceRecord,
};

#[allow(unused)]
macro_rules! pid {
    ($raw: expr) => {
        strace::Pid::from_raw($raw)
    };
}

/// Address of the first byte of a [`FakeTask`]'s memory.
#[allow(unused)]
pub const BASE: Addr = 0x1000;

/// A task whose memory is a local buffer mapped at [`BASE`].
///
/// Reads that run off the end of the buffer come up short. Reads that start outside of it
/// fail with `EFAULT`.
#[allow(unused)]
#[derive(Default)]
pub struct FakeTask {
    memory: Vec<u8>,
}

#[allow(unused)]
impl FakeTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into memory at the next 8-byte aligned address, and return it.
    pub fn push(&mut self, bytes: &[u8]) -> Addr {
        while self.memory.len() % 8 != 0 {
            self.memory.push(0);
        }

        let addr = self.end();
        self.memory.extend_from_slice(bytes);
        addr
    }

    /// Copy `s` and a NUL terminator into memory.
    pub fn push_str(&mut self, s: &str) -> Addr {
        let mut bytes = s.as_bytes().to_vec();
        bytes.push(0);
        self.push(&bytes)
    }

    /// Copy the in-memory representation of `value` into memory.
    pub fn push_value<T: Copy>(&mut self, value: &T) -> Addr {
        let bytes = unsafe {
            slice::from_raw_parts(value as *const T as *const u8, mem::size_of::<T>())
        };
        self.push(bytes)
    }

    /// First address past the end of memory.
    pub fn end(&self) -> Addr {
        BASE + self.memory.len() as Addr
    }
}

impl Task for FakeTask {
    fn name(&self) -> String {
        "fake(1)".into()
    }

    fn read(&self, addr: Addr, buf: &mut [u8]) -> Result<usize> {
        let offset = match addr.checked_sub(BASE) {
            Some(offset) if (offset as usize) < self.memory.len() => offset as usize,
            _ => return Err(Error::Memory { addr, source: Errno::EFAULT }),
        };

        let len = buf.len().min(self.memory.len() - offset);
        buf[..len].copy_from_slice(&self.memory[offset..offset + len]);

        Ok(len)
    }
}

/// Build a syscall record with zeroed registers.
#[allow(unused)]
pub fn syscall_record(pid: Pid, sysno: u64, enter: bool) -> TraceRecord {
    let regs: Registers = unsafe { mem::zeroed() };

    let syscall = SyscallEvent {
        regs,
        sysno,
        args: Default::default(),
        ret: Default::default(),
        errno: None,
        duration: Duration::ZERO,
    };

    let event = if enter {
        Event::SyscallEnter(syscall)
    } else {
        Event::SyscallExit(syscall)
    };

    record(pid, event)
}

#[allow(unused)]
pub fn record(pid: Pid, event: Event) -> TraceRecord {
    TraceRecord { pid, serial: 0, time: SystemTime::now(), event }
}

/// Serialize tests that trace, since only one session may be active per process.
#[allow(unused)]
pub fn exclusive() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());

    // A failed test poisons the lock, but leaves no session behind.
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Return `false` if `pid` has exited, even if it has not been reaped yet.
#[allow(unused)]
pub fn is_running(pid: Pid) -> io::Result<bool> {
    let stat = match fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    // The state follows the parenthesized command name, which may itself contain `)`.
    let state = stat.rsplit_once(") ").and_then(|(_, rest)| rest.chars().next());

    Ok(!matches!(state, Some('Z' | 'X')))
}

/// Trace `cmd` with `options`, collecting every record.
///
/// The caller must hold [`exclusive()`].
#[allow(unused)]
pub fn trace_with(cmd: Command, options: &TraceOptions) -> Result<(Outcome, Vec<TraceRecord>)> {
    let session = Session::new();
    let mut records = vec![];

    let outcome = {
        let mut collect = |_task: &dyn Task, record: &TraceRecord| -> Result<()> {
            records.push(record.clone());
            Ok(())
        };

        let mut callbacks: [&mut dyn EventCallback; 1] = [&mut collect];
        session.trace(cmd, options, &mut callbacks)?
    };

    Ok((outcome, records))
}

#[allow(unused)]
pub fn trace(cmd: Command) -> Result<(Outcome, Vec<TraceRecord>)> {
    trace_with(cmd, &TraceOptions::new())
}

/// A record reduced to what a test can predict: syscall stops by name, other events with
/// their payload.
#[allow(unused)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step {
    Enter(String),
    Exit(String),
    Killed(Signal),
    Exited(i32),
    Stopped(Signal),
    NewChild(Pid),
    Unknown,
}

/// Assert that two step traces are equivalent modulo PID normalization.
#[allow(unused)]
pub fn assert_equivalent(left: &[(Pid, Step)], right: &[(Pid, Step)]) {
    let normed_left = Normalizer::default().normalize_steps(left);
    let normed_right = Normalizer::default().normalize_steps(right);
    assert_eq!(normed_left, normed_right)
}

/// Reduce `records` to steps, substituting each concrete raw PID value with one that
/// matches its ordinal of appearance in the trace.
#[allow(unused)]
pub fn normalize(records: &[TraceRecord]) -> Vec<(Pid, Step)> {
    let steps: Vec<(Pid, Step)> = records.iter().map(|r| (r.pid, step(r))).collect();
    Normalizer::default().normalize_steps(&steps)
}

/// Group normalized steps by tracee, keeping their order.
#[allow(unused)]
pub fn by_pid(steps: &[(Pid, Step)]) -> BTreeMap<Pid, Vec<Step>> {
    let mut map: BTreeMap<Pid, Vec<Step>> = BTreeMap::new();

    for (pid, step) in steps {
        map.entry(*pid).or_default().push(step.clone());
    }

    map
}

/// Assert that the syscall stops of one tracee alternate, starting with an enter.
#[allow(unused)]
pub fn assert_syscalls_alternate(steps: &[Step]) {
    let mut in_syscall: Option<&str> = None;

    for step in steps {
        match step {
            Step::Enter(name) => {
                assert!(in_syscall.is_none(), "enter `{name}` during `{in_syscall:?}`");
                in_syscall = Some(name.as_str());
            },
            Step::Exit(name) => {
                assert!(in_syscall.is_some(), "exit `{name}` without enter");
                in_syscall = None;
            },
            _ => {},
        }
    }
}

#[allow(unused)]
fn step(record: &TraceRecord) -> Step {
    match &record.event {
        Event::SyscallEnter(syscall) => Step::Enter(syscall.info().name.into_owned()),
        Event::SyscallExit(syscall) => Step::Exit(syscall.info().name.into_owned()),
        Event::SignalExit { signal, .. } => Step::Killed(*signal),
        Event::Exit { exit_code } => Step::Exited(*exit_code),
        Event::SignalStop { signal } => Step::Stopped(*signal),
        Event::NewChild { pid } => Step::NewChild(*pid),
        Event::Unknown => Step::Unknown,
    }
}

#[allow(unused)]
#[derive(Default)]
struct Normalizer {
    map: HashMap<Pid, Pid>,
}

impl Normalizer {
    fn normalize_steps(&mut self, steps: &[(Pid, Step)]) -> Vec<(Pid, Step)> {
        steps
            .iter()
            .map(|(pid, step)| {
                let normed_pid = self.normalize_pid(*pid);
                let normed_step = self.normalize_step(step);
                (normed_pid, normed_step)
            })
            .collect()
    }

    fn normalize_step(&mut self, step: &Step) -> Step {
        match step {
            Step::NewChild(new) => Step::NewChild(self.normalize_pid(*new)),
            step => step.clone(),
        }
    }

    fn normalize_pid(&mut self, pid: Pid) -> Pid {
        // Avoid borrowck error in `default` fn.
        let next_free = self.map.len();

        let entry = self.map.entry(pid).or_insert_with(|| {
            let raw: i32 = next_free.try_into().expect("exhausted free test PIDs");
            Pid::from_raw(raw)
        });

        *entry
    }
}
