//! Raw syscall argument slots and their typed interpretations.

use std::fmt;

/// An address in a tracee's address space.
pub type Addr = u64;

/// Number of argument registers of the Linux syscall ABI.
pub const MAX_SYSCALL_ARGS: usize = 6;

/// One register-width syscall argument or return value.
///
/// Interpretation never touches tracee memory: every accessor is a pure
/// function of the raw bit pattern.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct SyscallArgument(pub u64);

impl SyscallArgument {
    pub fn pointer(self) -> Addr {
        self.0
    }

    pub fn int(self) -> i32 {
        self.0 as u32 as i32
    }

    pub fn uint(self) -> u32 {
        self.0 as u32
    }

    pub fn int64(self) -> i64 {
        self.0 as i64
    }

    pub fn uint64(self) -> u64 {
        self.0
    }

    pub fn size_t(self) -> usize {
        self.0 as usize
    }

    pub fn mode_t(self) -> u32 {
        self.0 as u32
    }

    pub fn uint16(self) -> u16 {
        self.0 as u16
    }
}

impl From<u64> for SyscallArgument {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for SyscallArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The six argument slots of one syscall, in ABI order.
pub type SyscallArguments = [SyscallArgument; MAX_SYSCALL_ARGS];

/// Build argument slots from raw register values.
pub fn arguments(raw: [u64; MAX_SYSCALL_ARGS]) -> SyscallArguments {
    raw.map(SyscallArgument)
}
