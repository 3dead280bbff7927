//! Rendering syscall arguments as human-readable strings.
//!
//! Every syscall is rendered twice: once at syscall-enter, from the arguments alone, and once
//! at syscall-exit, when output buffers and the return value are known. Each argument slot is
//! described by a [`FormatSpecifier`], which maps to a [`Decoder`] holding the functions that
//! render that slot before and after execution.

use std::time::Duration;

use nix::errno::Errno;

use crate::args::{SyscallArgument, SyscallArguments};
use crate::memory::Task;
use crate::syscalls::SyscallInfo;

pub mod decode;
pub mod sockaddr;

pub use sockaddr::{decode_sockaddr, SockAddr, UnixAddr};

/// Default bound on the bytes dumped from any one buffer or iovec array.
pub const LOG_MAXIMUM_SIZE: usize = 1024;

/// Bound on the length of each `argv`/`envp` string.
pub const EXEC_MAX_ELEM_SIZE: usize = 32 * 4096;

/// Bound on the number of `argv`/`envp` entries.
pub const EXEC_MAX_VECTOR_LEN: usize = 4096;

/// Bound on the number of entries in an iovec array, from `uapi/linux/uio.h`.
pub const UIO_MAXIOV: usize = 1024;

/// Marker appended to content that was cut short.
pub const TRUNCATED: &str = "...";

/// How one syscall argument slot is rendered.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FormatSpecifier {
    Hex,
    Oct,
    FD,
    Signal,
    Path,
    // Rendered only after the syscall has filled it in.
    PostPath,
    ExecveStringVector,
    PipeFDs,
    // Content known only after execution, sized by the return value.
    ReadBuffer,
    // Content sized by the following argument.
    WriteBuffer,
    ReadIOVec,
    WriteIOVec,
    // An iovec array whose content is not dumped.
    IOVec,
    SendMsgHdr,
    RecvMsgHdr,
    // A sockaddr whose length is the following argument.
    SockAddr,
    // A sockaddr filled in by the syscall, whose length is behind the following pointer.
    PostSockAddr,
    SockLen,
    SockFamily,
    SockType,
    // Interpreted relative to the family two slots earlier.
    SockProtocol,
    SockFlags,
    Timespec,
    PostTimespec,
    UTimeTimespec,
    ItimerVal,
    PostItimerVal,
    ItimerSpec,
    PostItimerSpec,
    Timeval,
    Utimbuf,
    Stat,
    Uname,
    Rusage,
    CloneFlags,
    OpenFlags,
    Mode,
    FutexOp,
    PtraceRequest,
    ItimerType,
}

/// Everything a decode function may consult to render one argument slot.
pub struct Arg<'a> {
    pub task: &'a dyn Task,
    pub args: &'a SyscallArguments,
    pub index: usize,

    /// Primary return value. Zero at syscall-enter.
    pub rval: SyscallArgument,

    /// Bound on dumped content bytes.
    pub max: usize,
}

impl<'a> Arg<'a> {
    pub fn this(&self) -> SyscallArgument {
        self.args[self.index]
    }

    /// The slot `offset` positions after this one, or zero past the last slot.
    pub fn after(&self, offset: usize) -> SyscallArgument {
        self.args.get(self.index + offset).copied().unwrap_or_default()
    }

    /// The slot `offset` positions before this one, or zero before the first slot.
    pub fn before(&self, offset: usize) -> SyscallArgument {
        self.index
            .checked_sub(offset)
            .and_then(|i| self.args.get(i).copied())
            .unwrap_or_default()
    }
}

pub type DecodeFn = fn(&Arg) -> String;

/// The pre- and post-execution renderers of one [`FormatSpecifier`].
///
/// A missing `pre` renders the raw value in hex. A missing `post` keeps the pre rendering.
#[derive(Clone, Copy)]
pub struct Decoder {
    pub pre: Option<DecodeFn>,
    pub post: Option<DecodeFn>,
}

const fn pre(f: DecodeFn) -> Decoder {
    Decoder { pre: Some(f), post: None }
}

const fn post(f: DecodeFn) -> Decoder {
    Decoder { pre: None, post: Some(f) }
}

const fn both(pre: DecodeFn, post: DecodeFn) -> Decoder {
    Decoder { pre: Some(pre), post: Some(post) }
}

impl FormatSpecifier {
    pub fn decoder(self) -> Decoder {
        use decode::*;
        use FormatSpecifier::*;

        match self {
            Hex => pre(hex),
            Oct => pre(oct),
            FD => pre(fd),
            Signal => pre(signal),
            Path => pre(path),
            PostPath => post(path),
            ExecveStringVector => pre(string_vector),
            PipeFDs => post(pipe_fds),
            ReadBuffer => post(read_buffer),
            WriteBuffer => both(write_buffer, elided),
            ReadIOVec => post(read_iovecs),
            WriteIOVec => both(write_iovecs, elided),
            IOVec => both(iovecs_no_content, elided),
            SendMsgHdr => both(msghdr_with_content, msghdr_no_content),
            RecvMsgHdr => both(msghdr_no_content, msghdr_with_content),
            SockAddr => pre(sockaddr),
            PostSockAddr => post(post_sockaddr),
            SockLen => both(sock_len, sock_len),
            SockFamily => pre(sock_family),
            SockType => pre(sock_type),
            SockProtocol => pre(sock_protocol),
            SockFlags => pre(sock_flags),
            Timespec => pre(timespec),
            PostTimespec => post(timespec),
            UTimeTimespec => pre(utimens_timespecs),
            ItimerVal => pre(itimerval),
            PostItimerVal => post(itimerval),
            ItimerSpec => pre(itimerspec),
            PostItimerSpec => post(itimerspec),
            Timeval => both(timeval, timeval),
            Utimbuf => pre(utimbuf),
            Stat => post(stat),
            Uname => post(uname),
            Rusage => post(rusage),
            CloneFlags => pre(clone_flags),
            OpenFlags => pre(open_flags),
            Mode => pre(mode),
            FutexOp => pre(futex_op),
            PtraceRequest => pre(ptrace_request),
            ItimerType => pre(itimer_type),
        }
    }
}

impl SyscallInfo {
    /// Render every argument slot described by this syscall's format, as known before
    /// execution.
    pub fn pre(&self, task: &dyn Task, args: &SyscallArguments, max: usize) -> Vec<String> {
        self.format
            .iter()
            .take(args.len())
            .enumerate()
            .map(|(index, spec)| {
                let arg = Arg { task, args, index, rval: SyscallArgument(0), max };
                match spec.decoder().pre {
                    Some(decode) => decode(&arg),
                    None => decode::hex(&arg),
                }
            })
            .collect()
    }

    /// Overwrite the slots of `output` that can only be rendered after execution.
    pub fn post(
        &self,
        task: &dyn Task,
        args: &SyscallArguments,
        rval: SyscallArgument,
        output: &mut [String],
        max: usize,
    ) {
        for (index, slot) in output.iter_mut().enumerate() {
            let spec = match self.format.get(index) {
                Some(spec) => spec,
                None => break,
            };

            if let Some(decode) = spec.decoder().post {
                let arg = Arg { task, args, index, rval, max };
                *slot = decode(&arg);
            }
        }
    }

    /// Render a syscall-enter line: `name E syscall(arg, ...)`.
    pub fn print_enter(&self, task: &dyn Task, args: &SyscallArguments, max: usize) -> String {
        let output = self.pre(task, args, max);
        format!("{} E {}({})", task.name(), self.name, output.join(", "))
    }

    /// Render a syscall-exit line: `name X syscall(arg, ...) = retval (duration)`.
    ///
    /// Post-execution rendering is only done for successful syscalls, since failed ones
    /// leave their output arguments untouched.
    pub fn print_exit(
        &self,
        task: &dyn Task,
        elapsed: Duration,
        args: &SyscallArguments,
        rval: SyscallArgument,
        errno: Option<Errno>,
        max: usize,
    ) -> String {
        let mut output = self.pre(task, args, max);

        let rval = match errno {
            None => {
                self.post(task, args, rval, &mut output, max);
                format!("{:#x} ({:?})", rval.uint64(), elapsed)
            },
            Some(errno) => {
                format!("{} ({:#x}) ({:?})", errno, errno as i32, elapsed)
            },
        };

        format!("{} X {}({}) = {}", task.name(), self.name, output.join(", "), rval)
    }
}
