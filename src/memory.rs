//! Reading typed values and strings out of a tracee's address space.

use std::mem::{self, MaybeUninit};
use std::slice;

use crate::args::Addr;
use crate::error::{Error, Result};

/// Size of the word transferred by one `PTRACE_PEEKDATA` request.
pub const WORD_SIZE: usize = mem::size_of::<libc::c_long>();

/// A traced task whose memory can be read.
///
/// Reads use the native byte order of the tracer, which must match the tracee.
pub trait Task {
    /// Human-readable identifier, e.g. `argv[0](pid)` or a bare pid.
    fn name(&self) -> String;

    /// Copy `buf.len()` bytes from `addr` in the task's memory into `buf`.
    ///
    /// Returns the number of bytes transferred, which may be short if the read ran into
    /// unmapped memory after transferring at least one word.
    fn read(&self, addr: Addr, buf: &mut [u8]) -> Result<usize>;
}

/// Types that may be filled from arbitrary bytes.
///
/// # Safety
///
/// Implementors must be `repr(C)` plain data for which every bit pattern is a valid value.
pub unsafe trait Plain: Copy {}

macro_rules! plain {
    ($($ty: ty),* $(,)?) => {
        $(unsafe impl Plain for $ty {})*
    };
}

plain!(
    u8, u16, u32, u64, i32, i64, usize,
    [i32; 2],
    libc::timespec,
    libc::timeval,
    libc::utimbuf,
    libc::stat,
    libc::utsname,
    libc::rusage,
    libc::iovec,
    libc::msghdr,
);

/// Read one `T` at `addr`, failing if fewer than `size_of::<T>()` bytes could be read.
pub fn read_value<T: Plain>(task: &dyn Task, addr: Addr) -> Result<T> {
    let mut value = MaybeUninit::<T>::zeroed();
    let wanted = mem::size_of::<T>();

    // SAFETY: `value` is zero-initialized and `T: Plain`, so any bytes written through this
    // view leave it holding a valid `T`.
    let buf = unsafe { slice::from_raw_parts_mut(value.as_mut_ptr() as *mut u8, wanted) };

    let got = task.read(addr, buf)?;
    if got < wanted {
        return Err(Error::ShortRead { addr, wanted, got });
    }

    Ok(unsafe { value.assume_init() })
}

/// Read `len` bytes at `addr`. The result is truncated if the read came up short.
pub fn read_bytes(task: &dyn Task, addr: Addr, len: usize) -> Result<Vec<u8>> {
    let mut data = vec![0; len];
    let got = task.read(addr, &mut data)?;
    data.truncate(got);
    Ok(data)
}

/// Read a NUL-terminated string of at most `max` bytes.
///
/// A null `addr` yields `"<nil>"` without touching memory.
pub fn read_string(task: &dyn Task, addr: Addr, max: usize) -> Result<String> {
    if addr == 0 {
        return Ok("<nil>".into());
    }

    let mut data = Vec::new();
    let mut cursor = addr;

    'read: while data.len() < max {
        // Never let one read straddle a word boundary, so the string may end right before
        // an unmapped page without the read of its tail failing.
        let to_boundary = WORD_SIZE - (cursor as usize % WORD_SIZE);
        let chunk = to_boundary.min(max - data.len());

        let mut word = [0u8; WORD_SIZE];
        let got = task.read(cursor, &mut word[..chunk])?;
        if got == 0 {
            return Err(Error::ShortRead { addr: cursor, wanted: chunk, got });
        }

        for &byte in &word[..got] {
            if byte == 0 {
                break 'read;
            }
            data.push(byte);
        }

        cursor += got as u64;
    }

    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Read a null-terminated array of string pointers, such as `argv` or `envp`.
///
/// Each string is bounded by `max_elem_size`, and at most `max_count` entries are read.
pub fn read_string_vector(
    task: &dyn Task,
    addr: Addr,
    max_elem_size: usize,
    max_count: usize,
) -> Result<Vec<String>> {
    if addr == 0 {
        return Ok(vec![]);
    }

    let mut pointers = vec![];
    let mut cursor = addr;

    while pointers.len() < max_count {
        let ptr: u64 = read_value::<usize>(task, cursor)? as u64;
        if ptr == 0 {
            break;
        }
        pointers.push(ptr);
        cursor += mem::size_of::<usize>() as u64;
    }

    pointers
        .into_iter()
        .map(|ptr| read_string(task, ptr, max_elem_size))
        .collect()
}
