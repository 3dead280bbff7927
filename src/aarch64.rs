use nix::errno::Errno;

use crate::args::{arguments, SyscallArgument, SyscallArguments};
use crate::error::{Result, ResultExt};
use crate::ptracer::Pid;

/// Linux constant defined in `include/uapi/linux/elf.h`.
const NT_PRSTATUS: i32 = 0x1;

/// Defined in [`arch/arm64/include/uapi/asm/ptrace.h`](https://android.googlesource.com/kernel/common/+/refs/heads/android-mainline/arch/arm64/include/uapi/asm/ptrace.h#88).
#[allow(non_camel_case_types)]
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct user_pt_regs {
    pub regs: [u64; 31],
    pub sp: u64,
    pub pc: u64,
    pub pstate: u64
}

/// Register state of a tracee.
pub type Registers = user_pt_regs;

pub(crate) fn registers(pid: Pid) -> Result<Registers> {
    let mut data = std::mem::MaybeUninit::<Registers>::uninit();
    let mut rv = libc::iovec {
        iov_base: data.as_mut_ptr() as *mut libc::c_void,
        iov_len: std::mem::size_of::<Registers>(),
    };

    let res = unsafe {
        libc::ptrace(libc::PTRACE_GETREGSET, pid.as_raw(), NT_PRSTATUS, &mut rv as *mut _ as *mut libc::c_void)
    };

    Errno::result(res).with_pid(pid, "PTRACE_GETREGSET")?;

    Ok(unsafe { data.assume_init() })
}

/// Syscall number, passed in `x8`.
pub(crate) fn sysno(regs: &Registers) -> u64 {
    regs.regs[8]
}

/// Argument registers `x0`-`x5`.
///
/// `x0` is overwritten by the return value, so these are only reliable at syscall-enter.
pub(crate) fn syscall_args(regs: &Registers) -> SyscallArguments {
    let r = &regs.regs;
    arguments([r[0], r[1], r[2], r[3], r[4], r[5]])
}

pub(crate) fn return_values(regs: &Registers) -> [SyscallArgument; 2] {
    [SyscallArgument(regs.regs[0]), SyscallArgument(regs.regs[1])]
}
