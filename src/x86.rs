use nix::sys::ptrace;

use crate::args::{arguments, SyscallArgument, SyscallArguments};
use crate::error::{Result, ResultExt};
use crate::ptracer::Pid;

/// Register state of a tracee.
pub type Registers = libc::user_regs_struct;

pub(crate) fn registers(pid: Pid) -> Result<Registers> {
    ptrace::getregs(pid).with_pid(pid, "PTRACE_GETREGS")
}

/// Syscall number. Preserved in `orig_rax` across the whole syscall.
pub(crate) fn sysno(regs: &Registers) -> u64 {
    regs.orig_rax
}

/// Argument registers, in ABI order: `rdi`, `rsi`, `rdx`, `r10`, `r8`, `r9`.
pub(crate) fn syscall_args(regs: &Registers) -> SyscallArguments {
    arguments([regs.rdi, regs.rsi, regs.rdx, regs.r10, regs.r8, regs.r9])
}

/// Return value registers. Only `rax` is meaningful for most syscalls.
pub(crate) fn return_values(regs: &Registers) -> [SyscallArgument; 2] {
    [SyscallArgument(regs.rax), SyscallArgument(regs.rdx)]
}
