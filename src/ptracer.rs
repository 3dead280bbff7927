//! Tracing a command and its descendants, and interpreting their ptrace-stops as records.

use std::collections::BTreeMap;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use nix::{
    errno::Errno,
    sys::{
        ptrace,
        signal,
        wait::{self, WaitPidFlag, WaitStatus},
    },
};
use tracing::{debug, info, trace, warn};

use crate::args::{Addr, SyscallArgument, SyscallArguments};
use crate::cmd;
use crate::consumers::EventCallback;
use crate::error::{Error, Result, ResultExt};
use crate::memory::{Task, WORD_SIZE};
use crate::record::{Event, SyscallEvent, TraceRecord};

#[cfg(target_arch = "aarch64")]
use crate::aarch64 as arch;

#[cfg(target_arch = "x86_64")]
use crate::x86 as arch;

pub use nix::unistd::Pid;
pub use nix::sys::ptrace::Options;

/// POSIX signal.
pub use nix::sys::signal::Signal;

/// Register state of a tracee.
pub use arch::Registers;

/// How a stopped tracee is resumed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Restart {
    /// Run until the next syscall-stop or other ptrace-stop.
    Syscall,

    /// Run until the next ptrace-stop that is not a syscall-stop.
    Continue,
}

/// Options required for the run loop to interpret stops. These are:
/// - [`PTRACE_O_TRACESYSGOOD`](Options::PTRACE_O_TRACESYSGOOD)
/// - [`PTRACE_O_TRACEEXEC`](Options::PTRACE_O_TRACEEXEC)
/// - [`PTRACE_O_TRACESECCOMP`](Options::PTRACE_O_TRACESECCOMP)
/// - [`PTRACE_O_EXITKILL`](Options::PTRACE_O_EXITKILL)
/// - [`PTRACE_O_TRACEFORK`](Options::PTRACE_O_TRACEFORK)
/// - [`PTRACE_O_TRACEVFORK`](Options::PTRACE_O_TRACEVFORK)
/// - [`PTRACE_O_TRACECLONE`](Options::PTRACE_O_TRACECLONE)
pub const REQUIRED_OPTIONS: Options = Options::empty()
    .union(Options::PTRACE_O_TRACESYSGOOD)
    .union(Options::PTRACE_O_TRACEEXEC)
    .union(Options::PTRACE_O_TRACESECCOMP)
    .union(Options::PTRACE_O_EXITKILL)
    .union(Options::PTRACE_O_TRACEFORK)
    .union(Options::PTRACE_O_TRACEVFORK)
    .union(Options::PTRACE_O_TRACECLONE);

// Wait for any tracee, but only those of the calling thread: other threads of the host
// process may have children of their own.
const WAIT_FLAGS: WaitPidFlag = WaitPidFlag::__WALL.union(WaitPidFlag::__WNOTHREAD);

/// What to do with the `SIGSTOP` a new child reports when it is first auto-attached.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AttachStop {
    /// Report the stop, but do not deliver the `SIGSTOP` to the child.
    #[default]
    Suppress,

    /// Report the stop and deliver the `SIGSTOP`, as for any other signal.
    Reinject,
}

/// Configuration of one trace session.
#[derive(Clone, Debug)]
pub struct TraceOptions {
    seccomp: bool,
    options: Options,
    attach_stop: AttachStop,
}

impl TraceOptions {
    pub fn new() -> Self {
        Self {
            seccomp: false,
            options: REQUIRED_OPTIONS,
            attach_stop: AttachStop::default(),
        }
    }

    /// Return `true` if tracees are resumed with `PTRACE_CONT` instead of `PTRACE_SYSCALL`.
    ///
    /// In this mode, syscalls are only observed if the tracee installs a seccomp filter
    /// which returns `SECCOMP_RET_TRACE`.
    pub fn seccomp(&self) -> bool {
        self.seccomp
    }

    pub fn set_seccomp(&mut self, seccomp: bool) {
        self.seccomp = seccomp;
    }

    /// Return the ptrace options set on the root tracee, and inherited by its children.
    pub fn ptrace_options(&self) -> Options {
        self.options
    }

    /// Set the ptrace options set on the root tracee.
    ///
    /// **NOTE:** [`REQUIRED_OPTIONS`] are always set, even if unset in the passed value.
    pub fn set_ptrace_options(&mut self, options: Options) {
        self.options = options | REQUIRED_OPTIONS;
    }

    pub fn attach_stop(&self) -> AttachStop {
        self.attach_stop
    }

    pub fn set_attach_stop(&mut self, attach_stop: AttachStop) {
        self.attach_stop = attach_stop;
    }
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// How the root tracee of a session ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Exited(i32),
    Signaled(Signal),
}

impl Outcome {
    /// The exit code a shell would report for the root tracee.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Outcome::Exited(code) => code,
            Outcome::Signaled(signal) => 128 + signal as i32,
        }
    }
}

// Set while any session of this process is tracing.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Entry point for tracing a command.
///
/// Only one session may be active per process at a time, across every `Session` value and
/// every thread.
#[derive(Debug, Default)]
pub struct Session {
    _private: (),
}

struct ActiveSession;

impl Drop for ActiveSession {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `true` if a call to [`Session::trace()`] is in progress anywhere in this
    /// process.
    pub fn is_active(&self) -> bool {
        ACTIVE.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<ActiveSession> {
        ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::SessionActive)?;

        Ok(ActiveSession)
    }

    /// Spawn `cmd` as a tracee and trace it and all of its descendants until they exit.
    ///
    /// Every record is passed to each of `callbacks` in order before the tracee is resumed,
    /// so a slow callback stalls the traced process tree. If a callback returns an error,
    /// every tracee is killed and the error is returned.
    ///
    /// The session runs on a dedicated worker thread, which is the tracer of every tracee.
    /// The caller must not wait on `cmd` or its children.
    pub fn trace(
        &self,
        cmd: Command,
        options: &TraceOptions,
        callbacks: &mut [&mut dyn EventCallback],
    ) -> Result<Outcome> {
        let _active = self.acquire()?;

        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("tracer".into())
                .spawn_scoped(scope, || Tracer::new(options, callbacks).run(cmd))?;

            match worker.join() {
                Ok(res) => res,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum StopKind {
    Enter,
    Exit,
}

/// The last syscall-stop of a thread, used to tell the next syscall-stop's kind.
#[derive(Clone, Copy, Debug)]
struct SyscallStop {
    kind: StopKind,
    time: Instant,
    sysno: u64,
    args: SyscallArguments,
}

impl SyscallStop {
    // Seed state for a new thread, whose next syscall-stop is an enter.
    fn initial() -> Self {
        Self {
            kind: StopKind::Exit,
            time: Instant::now(),
            sysno: 0,
            args: SyscallArguments::default(),
        }
    }
}

// A traced thread, as seen by event callbacks through [`Task`].
#[derive(Debug)]
struct Thread {
    pid: Pid,
    name: String,

    // Records produced for this thread so far.
    serial: u64,

    last: SyscallStop,
    seccomp: bool,

    // Expecting the `SIGSTOP` of a new auto-attached child.
    attach_stop_pending: bool,

    // A `NewChild` record has been emitted for this thread.
    announced: bool,
}

impl Thread {
    fn new(pid: Pid, name: String, seccomp: bool) -> Self {
        Self {
            pid,
            name,
            serial: 0,
            last: SyscallStop::initial(),
            seccomp,
            attach_stop_pending: false,
            announced: false,
        }
    }
}

impl Task for Thread {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read(&self, addr: Addr, buf: &mut [u8]) -> Result<usize> {
        peek(self.pid, addr, buf)
    }
}

// Read tracee memory one aligned word at a time with `PTRACE_PEEKDATA`.
//
// An aligned word never straddles a page, so a read that runs into unmapped memory keeps
// every byte before it.
fn peek(pid: Pid, addr: Addr, buf: &mut [u8]) -> Result<usize> {
    let mut done = 0;

    while done < buf.len() {
        let cursor = addr + done as u64;
        let aligned = cursor & !(WORD_SIZE as u64 - 1);
        let offset = (cursor - aligned) as usize;

        let word = match ptrace::read(pid, aligned as ptrace::AddressType) {
            Ok(word) => word,
            Err(source) if done == 0 => return Err(Error::Memory { addr: cursor, source }),
            Err(_) => break,
        };

        let bytes = word.to_ne_bytes();
        let len = (WORD_SIZE - offset).min(buf.len() - done);
        buf[done..done + len].copy_from_slice(&bytes[offset..offset + len]);

        done += len;
    }

    Ok(done)
}

/// Decode the errno of a raw syscall return value, if it is one.
///
/// The kernel returns `-errno` for errors, and never returns a value in `[-4095, -1]`
/// on success.
pub fn errno(rval: SyscallArgument) -> Option<Errno> {
    let rval = rval.int64();

    if (-4095..0).contains(&rval) {
        Some(Errno::from_i32(-rval as i32))
    } else {
        None
    }
}

// A classified stop: the event to report, and the signal to deliver on resume.
struct Stop {
    event: Event,
    inject: Option<Signal>,
}

impl Stop {
    fn new(event: Event) -> Self {
        Self { event, inject: None }
    }
}

// The run loop of one session. Owns the table of traced threads.
struct Tracer<'o, 'c, 'cb> {
    options: &'o TraceOptions,
    callbacks: &'c mut [&'cb mut dyn EventCallback],
    threads: BTreeMap<i32, Thread>,
    root: Option<Pid>,
    outcome: Option<Outcome>,
}

impl<'o, 'c, 'cb> Tracer<'o, 'c, 'cb> {
    fn new(options: &'o TraceOptions, callbacks: &'c mut [&'cb mut dyn EventCallback]) -> Self {
        Self {
            options,
            callbacks,
            threads: BTreeMap::new(),
            root: None,
            outcome: None,
        }
    }

    fn run(mut self, mut cmd: Command) -> Result<Outcome> {
        let argv0 = cmd::argv0(&cmd);

        // The `Child` is dropped without waiting: the run loop reaps the root tracee.
        let (_child, pid) = cmd::spawn(&mut cmd)?;

        let res = self.setup(pid, argv0).and_then(|_| self.run_loop());

        if res.is_err() {
            self.teardown();
        }

        res
    }

    fn setup(&mut self, pid: Pid, argv0: String) -> Result<()> {
        let status = wait::waitpid(pid, Some(WAIT_FLAGS)).map_err(Error::Wait)?;
        trace!(?status, "initial wait status");

        match status {
            WaitStatus::Stopped(stopped, Signal::SIGTRAP) if stopped == pid => {},
            WaitStatus::Exited(..) | WaitStatus::Signaled(..) => {
                let reason = format!("tracee ended before exec: {status:?}");
                return Err(Error::Setup { pid, reason });
            },
            status => {
                // Still alive and ours, so make sure it doesn't outlive the session.
                let _ = signal::kill(pid, Signal::SIGKILL);
                let _ = wait::waitpid(pid, Some(WAIT_FLAGS));

                let reason = format!("expected post-exec SIGTRAP, saw {status:?}");
                return Err(Error::Setup { pid, reason });
            },
        }

        let name = format!("{argv0}({pid})");
        self.register(pid, Thread::new(pid, name, self.options.seccomp()));
        self.root = Some(pid);

        ptrace::setoptions(pid, self.options.ptrace_options()).map_err(|err| {
            let reason = format!("could not set ptrace options: {err}");
            Error::Setup { pid, reason }
        })?;

        self.resume(pid, None)
    }

    fn run_loop(&mut self) -> Result<Outcome> {
        while !self.threads.is_empty() {
            let status = match wait::waitpid(None, Some(WAIT_FLAGS)) {
                Ok(status) => status,
                Err(Errno::ECHILD) => {
                    warn!(tracees = self.threads.len(), "no tracees left to wait on");
                    break;
                },
                Err(err) => return Err(Error::Wait(err)),
            };

            trace!(?status, "wait status");

            let pid = match status.pid() {
                Some(pid) => pid,
                None => internal_error!("unreachable `wait()` status"),
            };

            if !self.threads.contains_key(&pid.as_raw()) {
                match status {
                    WaitStatus::Stopped(_, Signal::SIGSTOP) => {
                        // We may see an attach-stop out-of-order, before the ptrace-event-stop
                        // which would otherwise have us register the new child. Register it now
                        // and announce it when the parent's event arrives.
                        let mut thread = Thread::new(pid, pid.to_string(), self.options.seccomp());
                        thread.attach_stop_pending = true;
                        self.register(pid, thread);
                    },
                    status => {
                        warn!(pid = pid.as_raw(), ?status, "ignoring status of untraced pid");
                        continue;
                    },
                }
            }

            let stop = match self.classify(status)? {
                Some(stop) => stop,
                None => {
                    self.resume(pid, None)?;
                    continue;
                },
            };

            let terminal = matches!(stop.event, Event::Exit { .. } | Event::SignalExit { .. });

            self.dispatch(pid, stop.event)?;

            if terminal {
                self.remove(pid);
            } else {
                self.resume(pid, stop.inject)?;
            }
        }

        match self.outcome {
            Some(outcome) => Ok(outcome),
            None => internal_error!("root tracee ended without an exit status"),
        }
    }

    // Interpret a wait status of a registered thread. Returns `None` for stops that are
    // resumed without a record.
    fn classify(&mut self, status: WaitStatus) -> Result<Option<Stop>> {
        let stop = match status {
            WaitStatus::Exited(pid, exit_code) => {
                if Some(pid) == self.root {
                    self.outcome = Some(Outcome::Exited(exit_code));
                }

                Stop::new(Event::Exit { exit_code })
            },
            WaitStatus::Signaled(pid, signal, core_dumped) => {
                if Some(pid) == self.root {
                    self.outcome = Some(Outcome::Signaled(signal));
                }

                Stop::new(Event::SignalExit { signal, core_dumped })
            },
            // A signal-delivery-stop never happens between syscall-enter-stop and syscall-exit-stop,
            // so a per-thread toggle is enough to tell them apart. From the manual:
            //
            //     Syscall-enter-stop and syscall-exit-stop are indistinguishable from
            //     each other by the tracer.  The tracer needs to keep track of the
            //     sequence of ptrace-stops in order to not misinterpret syscall-enter-
            //     stop as syscall-exit-stop or vice versa.
            //
            WaitStatus::PtraceSyscall(pid) => Stop::new(self.syscall_stop(pid)?),
            WaitStatus::Stopped(pid, signal) => self.signal_stop(pid, signal)?,
            WaitStatus::PtraceEvent(pid, signal, code) => {
                match self.ptrace_event(pid, signal, code)? {
                    Some(event) => Stop::new(event),
                    None => return Ok(None),
                }
            },
            // Assume `!WNOHANG`, `!WCONTINUED`.
            WaitStatus::Continued(_) |
            WaitStatus::StillAlive => Stop::new(Event::Unknown),
        };

        Ok(Some(stop))
    }

    fn syscall_stop(&mut self, pid: Pid) -> Result<Event> {
        let regs = arch::registers(pid)?;
        let sysno = arch::sysno(&regs);
        let now = Instant::now();

        let thread = self.thread_mut(pid)?;
        let last = thread.last;

        let event = match last.kind {
            StopKind::Exit => {
                let args = arch::syscall_args(&regs);
                thread.last = SyscallStop { kind: StopKind::Enter, time: now, sysno, args };

                Event::SyscallEnter(SyscallEvent {
                    regs,
                    sysno,
                    args,
                    ret: Default::default(),
                    errno: None,
                    duration: Duration::ZERO,
                })
            },
            StopKind::Enter => {
                // Argument registers may be clobbered by now, so report those seen at enter.
                let args = last.args;
                let ret = arch::return_values(&regs);
                thread.last = SyscallStop { kind: StopKind::Exit, time: now, sysno, args };

                if sysno != last.sysno {
                    debug!(pid = pid.as_raw(), sysno, enter = last.sysno, "syscall number changed");
                }

                Event::SyscallExit(SyscallEvent {
                    regs,
                    sysno,
                    args,
                    ret,
                    errno: errno(ret[0]),
                    duration: now.saturating_duration_since(last.time),
                })
            },
        };

        Ok(event)
    }

    fn signal_stop(&mut self, pid: Pid, signal: Signal) -> Result<Stop> {
        let attach_stop = self.options.attach_stop();
        let thread = self.thread_mut(pid)?;

        if signal == Signal::SIGSTOP && thread.attach_stop_pending {
            thread.attach_stop_pending = false;
            debug!(pid = pid.as_raw(), ?attach_stop, "attach-stop");

            let inject = match attach_stop {
                AttachStop::Suppress => None,
                AttachStop::Reinject => Some(signal),
            };

            return Ok(Stop { event: Event::SignalStop { signal }, inject });
        }

        // A group-stop has already delivered its signal, and there is nothing to re-inject.
        let inject = if is_group_stop(pid, signal)? {
            debug!(pid = pid.as_raw(), ?signal, "group-stop");
            None
        } else {
            Some(signal)
        };

        Ok(Stop { event: Event::SignalStop { signal }, inject })
    }

    // Interpret a ptrace-event-stop. Its `SIGTRAP` is an artifact of tracing, so it is
    // never re-injected.
    fn ptrace_event(&mut self, pid: Pid, signal: Signal, code: i32) -> Result<Option<Event>> {
        let event = match code {
            libc::PTRACE_EVENT_FORK |
            libc::PTRACE_EVENT_VFORK |
            libc::PTRACE_EVENT_CLONE => {
                let evt_data = ptrace::getevent(pid).with_pid(pid, "PTRACE_GETEVENTMSG")?;
                let new = Pid::from_raw(evt_data as u32 as i32);

                self.new_child(new);

                Event::NewChild { pid: new }
            },
            libc::PTRACE_EVENT_EXEC => {
                // The current `pid` is now equal to the tgid of `old`.
                let evt_data = ptrace::getevent(pid).with_pid(pid, "PTRACE_GETEVENTMSG")?;
                let old = Pid::from_raw(evt_data as u32 as i32);

                if old != pid {
                    // A thread other than the leader exec'd. Its tid is gone, and its
                    // syscall-exit-stop for `execve()` will be reported under the leader's
                    // tid. Move its in-progress syscall there so the stops still pair.
                    debug!(pid = pid.as_raw(), old = old.as_raw(), "off-leader exec");

                    if let Some(old_thread) = self.remove(old) {
                        self.thread_mut(pid)?.last = old_thread.last;
                    }
                }

                Event::SignalStop { signal }
            },
            libc::PTRACE_EVENT_SECCOMP => {
                // Let the syscall proceed. If it is traced, its syscall-stops follow.
                trace!(pid = pid.as_raw(), "seccomp event");
                return Ok(None);
            },
            _ => {
                debug!(pid = pid.as_raw(), code, "other ptrace-event-stop");
                Event::SignalStop { signal }
            },
        };

        Ok(Some(event))
    }

    // Register a child auto-attached by fork, vfork, or clone.
    fn new_child(&mut self, pid: Pid) {
        match self.threads.get_mut(&pid.as_raw()) {
            Some(thread) if !thread.announced => {
                // Registered early, on its attach-stop.
                thread.announced = true;
            },
            Some(_) => {
                warn!(pid = pid.as_raw(), "new child already traced");
            },
            None => {
                let mut thread = Thread::new(pid, pid.to_string(), self.options.seccomp());
                thread.attach_stop_pending = true;
                thread.announced = true;
                self.register(pid, thread);
            },
        }
    }

    fn dispatch(&mut self, pid: Pid, event: Event) -> Result<()> {
        let thread = match self.threads.get_mut(&pid.as_raw()) {
            Some(thread) => thread,
            None => internal_error!("event for unregistered tracee"),
        };

        let record = TraceRecord {
            pid,
            serial: thread.serial,
            time: SystemTime::now(),
            event,
        };

        thread.serial += 1;

        let thread = &*thread;
        for callback in self.callbacks.iter_mut() {
            callback.on_event(thread, &record)?;
        }

        Ok(())
    }

    fn resume(&self, pid: Pid, signal: Option<Signal>) -> Result<()> {
        let mode = match self.threads.get(&pid.as_raw()) {
            Some(thread) if thread.seccomp => Restart::Continue,
            _ => Restart::Syscall,
        };

        let res = match mode {
            Restart::Continue => ptrace::cont(pid, signal),
            Restart::Syscall => ptrace::syscall(pid, signal),
        };

        match res {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => {
                // Killed while stopped, e.g. by another thread's `exit_group()`. Its
                // termination status is still to come.
                debug!(pid = pid.as_raw(), "tracee vanished before restart");
                Ok(())
            },
            Err(source) => Err(Error::Restart { pid, mode, source }),
        }
    }

    // Kill every tracee and reap them all, so none is left in a ptrace-stop. The wait only
    // sees this thread's tracees: the registered threads, and children auto-attached before
    // their creation event was seen.
    fn teardown(&mut self) {
        for pid in self.threads.keys() {
            let _ = signal::kill(Pid::from_raw(*pid), Signal::SIGKILL);
        }

        loop {
            match wait::waitpid(None, Some(WAIT_FLAGS)) {
                Ok(WaitStatus::Exited(..) | WaitStatus::Signaled(..)) => {},
                Ok(status) => {
                    // A child we never registered, stopped before its first event.
                    if let Some(pid) = status.pid() {
                        let _ = signal::kill(pid, Signal::SIGKILL);
                    }
                },
                Err(_) => break,
            }
        }

        info!(tracees = self.threads.len(), "killed all tracees");
        self.threads.clear();
    }

    fn register(&mut self, pid: Pid, thread: Thread) {
        info!(pid = pid.as_raw(), name = %thread.name, "registering tracee");
        self.threads.insert(pid.as_raw(), thread);
    }

    fn remove(&mut self, pid: Pid) -> Option<Thread> {
        info!(pid = pid.as_raw(), "removing tracee");
        self.threads.remove(&pid.as_raw())
    }

    fn thread_mut(&mut self, pid: Pid) -> Result<&mut Thread> {
        self.threads
            .get_mut(&pid.as_raw())
            .ok_or_else(|| Error::Internal(format!("no tracee state for {pid}")))
    }
}

// Check if a wait stop with signal delivery is a group-stop.
//
// Assumes attach-stop has already been ruled out.
fn is_group_stop(pid: Pid, sig: Signal) -> Result<bool> {
    use Signal::*;

    match sig {
        SIGSTOP | SIGTSTP | SIGTTIN | SIGTTOU => {
            // Possible group-stop. Check `siginfo` to disambiguate.
            //
            // From the manual:
            //
            //     If PTRACE_GETSIGINFO fails with EINVAL, then it is definitely a
            //     group-stop.  (Other failure codes are possible, such as ESRCH
            //     ("no such process") if a SIGKILL killed the tracee.)
            //
            match ptrace::getsiginfo(pid) {
                Err(Errno::EINVAL) =>
                    Ok(true),
                res =>
                    res.map(|_| false).with_pid(pid, "PTRACE_GETSIGINFO"),
            }
        },
        // Only the four stopping signals can cause a group-stop.
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_range() {
        assert_eq!(errno(SyscallArgument(0)), None);
        assert_eq!(errno(SyscallArgument(3)), None);
        assert_eq!(errno(SyscallArgument(-2i64 as u64)), Some(Errno::ENOENT));
        assert_eq!(errno(SyscallArgument(-4095i64 as u64)), Some(Errno::from_i32(4095)));
        assert_eq!(errno(SyscallArgument(-4096i64 as u64)), None);
    }

    #[test]
    fn test_required_options_are_kept() {
        let mut options = TraceOptions::new();
        options.set_ptrace_options(Options::PTRACE_O_TRACEEXIT);

        assert!(options.ptrace_options().contains(REQUIRED_OPTIONS));
        assert!(options.ptrace_options().contains(Options::PTRACE_O_TRACEEXIT));
    }

    #[test]
    fn test_outcome_exit_code() {
        assert_eq!(Outcome::Exited(3).exit_code(), 3);
        assert_eq!(Outcome::Signaled(Signal::SIGKILL).exit_code(), 137);
    }

    #[test]
    fn test_session_is_exclusive_per_process() {
        let session = Session::new();
        let active = session.acquire().unwrap();

        assert!(session.is_active());
        assert!(matches!(session.acquire(), Err(Error::SessionActive)));

        let other = Session::new();
        assert!(other.is_active());
        assert!(matches!(other.acquire(), Err(Error::SessionActive)));

        drop(active);

        assert!(!other.is_active());
        assert!(session.acquire().is_ok());
    }
}
