//! Decode functions for each [`FormatSpecifier`](super::FormatSpecifier).
//!
//! A decode function never fails: memory errors are rendered inline next to the raw value,
//! so one bad pointer never loses the rest of the line.

use std::fmt::Display;
use std::mem;

use crate::abi::{self, AT_FDCWD, ITIMER_TYPES, PTRACE_REQUEST, SOCKADDR_MAX, SOCKET_FAMILY};
use crate::abi::{UTIME_NOW, UTIME_OMIT};
use crate::args::Addr;
use crate::memory::{read_bytes, read_string, read_string_vector, read_value, Plain, Task};

use super::sockaddr::decode_sockaddr;
use super::{Arg, EXEC_MAX_ELEM_SIZE, EXEC_MAX_VECTOR_LEN, TRUNCATED, UIO_MAXIOV};

fn error(addr: Addr, what: &str, err: impl Display) -> String {
    format!("{addr:#x} (error decoding {what}: {err})")
}

fn quote(bytes: &[u8]) -> String {
    format!("\"{}\"", bytes.escape_ascii())
}

/// Read a `T` for rendering, or the inline error to render instead.
fn value<T: Plain>(task: &dyn Task, addr: Addr, what: &str) -> Result<T, String> {
    read_value(task, addr).map_err(|err| error(addr, what, err))
}

// Scalars.

pub fn hex(a: &Arg) -> String {
    format!("{:#x}", a.this().uint64())
}

pub fn oct(a: &Arg) -> String {
    format!("{:#o}", a.this().uint64())
}

pub fn fd(a: &Arg) -> String {
    match a.this().int() {
        AT_FDCWD => "AT_FDCWD".into(),
        fd => format!("{fd}"),
    }
}

pub fn signal(a: &Arg) -> String {
    abi::signal_name(a.this().int())
}

pub fn mode(a: &Arg) -> String {
    let mode = a.this().mode_t();
    format!("{:#o} ({})", mode, abi::file_mode(mode))
}

pub fn clone_flags(a: &Arg) -> String {
    abi::clone_flags(a.this().uint64())
}

pub fn open_flags(a: &Arg) -> String {
    abi::open_flags(a.this().uint() as u64)
}

pub fn futex_op(a: &Arg) -> String {
    abi::futex_op(a.this().uint() as u64)
}

pub fn ptrace_request(a: &Arg) -> String {
    PTRACE_REQUEST.parse(a.this().uint64())
}

pub fn itimer_type(a: &Arg) -> String {
    ITIMER_TYPES.parse(a.this().uint() as u64)
}

pub fn sock_family(a: &Arg) -> String {
    SOCKET_FAMILY.parse(a.this().uint() as u64)
}

pub fn sock_type(a: &Arg) -> String {
    abi::sock_type(a.this().int())
}

pub fn sock_protocol(a: &Arg) -> String {
    abi::sock_protocol(a.before(2).int(), a.this().int())
}

pub fn sock_flags(a: &Arg) -> String {
    abi::sock_flags(a.this().int())
}

/// Content that is no longer interesting once the syscall has run.
pub fn elided(_: &Arg) -> String {
    TRUNCATED.into()
}

// Strings.

pub fn path(a: &Arg) -> String {
    let addr = a.this().pointer();

    match read_string(a.task, addr, libc::PATH_MAX as usize) {
        Ok(path) => format!("{addr:#x} {path}"),
        Err(err) => error(addr, "path", err),
    }
}

pub fn string_vector(a: &Arg) -> String {
    let addr = a.this().pointer();

    match read_string_vector(a.task, addr, EXEC_MAX_ELEM_SIZE, EXEC_MAX_VECTOR_LEN) {
        Ok(strings) => {
            let quoted: Vec<String> = strings.iter().map(|s| quote(s.as_bytes())).collect();
            format!("{addr:#x} [{}]", quoted.join(", "))
        },
        Err(err) => error(addr, "string array", err),
    }
}

// Buffers.

/// Render up to `maximum` bytes of the `size`-byte buffer at `addr`.
///
/// If fewer than `size` bytes are shown, the content is followed by `...`.
pub fn dump(task: &dyn Task, addr: Addr, size: usize, maximum: usize) -> String {
    let shown = size.min(maximum);

    if shown == 0 {
        let dot = if size > 0 { TRUNCATED } else { "" };
        return format!("{addr:#x} \"\"{dot}");
    }

    let data = match read_bytes(task, addr, shown) {
        Ok(data) => data,
        Err(err) => return error(addr, "string", err),
    };

    let dot = if data.len() < size { TRUNCATED } else { "" };
    format!("{:#x} {}{}", addr, quote(&data), dot)
}

pub fn write_buffer(a: &Arg) -> String {
    dump(a.task, a.this().pointer(), a.after(1).size_t(), a.max)
}

pub fn read_buffer(a: &Arg) -> String {
    dump(a.task, a.this().pointer(), a.rval.size_t(), a.max)
}

pub fn pipe_fds(a: &Arg) -> String {
    let addr = a.this().pointer();

    match value::<[i32; 2]>(a.task, addr, "pipe fds") {
        Ok([read, write]) => format!("{addr:#x} [{read}, {write}]"),
        Err(err) => err,
    }
}

// Vectored I/O.

/// Render the `count`-entry iovec array at `addr`.
///
/// With `content`, at most `max_bytes` are dumped across all entries.
pub fn iovecs(task: &dyn Task, addr: Addr, count: i64, content: bool, max_bytes: usize) -> String {
    if count < 0 || count as usize > UIO_MAXIOV {
        return error(addr, "iovecs", format!("invalid iovec count {count}"));
    }

    let mut entries = Vec::with_capacity(count as usize);
    let mut budget = max_bytes;

    for i in 0..count as u64 {
        let at = addr + i * mem::size_of::<libc::iovec>() as u64;
        let iov: libc::iovec = match value(task, at, "iovecs") {
            Ok(iov) => iov,
            Err(err) => return err,
        };

        let base = iov.iov_base as Addr;
        let len = iov.iov_len;

        if !content {
            entries.push(format!("{{base={base:#x}, len={len}}}"));
            continue;
        }

        let size = len.min(budget);
        budget -= size;

        let data = match read_bytes(task, base, size) {
            Ok(data) => quote(&data),
            Err(err) => format!("(error decoding iovec: {err})"),
        };
        let dot = if size < len { TRUNCATED } else { "" };

        entries.push(format!("{{base={base:#x}, len={len}, {data}{dot}}}"));
    }

    format!("{addr:#x} [{}]", entries.join(", "))
}

pub fn write_iovecs(a: &Arg) -> String {
    iovecs(a.task, a.this().pointer(), a.after(1).int64(), true, a.max)
}

pub fn read_iovecs(a: &Arg) -> String {
    // Only the bytes the syscall actually filled are worth showing.
    let max = a.max.min(a.rval.size_t());
    iovecs(a.task, a.this().pointer(), a.after(1).int64(), true, max)
}

pub fn iovecs_no_content(a: &Arg) -> String {
    iovecs(a.task, a.this().pointer(), a.after(1).int64(), false, 0)
}

fn msghdr(task: &dyn Task, addr: Addr, content: bool, max_bytes: usize) -> String {
    let hdr: libc::msghdr = match value(task, addr, "msghdr") {
        Ok(hdr) => hdr,
        Err(err) => return err,
    };

    let name = sockaddr_at(task, hdr.msg_name as Addr, hdr.msg_namelen as usize);
    let iovs = iovecs(task, hdr.msg_iov as Addr, hdr.msg_iovlen as i64, content, max_bytes);

    format!(
        "{:#x} {{name={}, namelen={}, iovecs={}, control={:#x}, controllen={}, flags={:#x}}}",
        addr,
        name,
        hdr.msg_namelen,
        iovs,
        hdr.msg_control as Addr,
        hdr.msg_controllen,
        hdr.msg_flags,
    )
}

pub fn msghdr_with_content(a: &Arg) -> String {
    msghdr(a.task, a.this().pointer(), true, a.max)
}

pub fn msghdr_no_content(a: &Arg) -> String {
    msghdr(a.task, a.this().pointer(), false, 0)
}

// Sockets.

fn sockaddr_at(task: &dyn Task, addr: Addr, len: usize) -> String {
    if addr == 0 {
        return "null".into();
    }

    if len > SOCKADDR_MAX {
        return error(addr, "sockaddr", format!("address length {len} too large"));
    }

    let data = match read_bytes(task, addr, len) {
        Ok(data) => data,
        Err(err) => return error(addr, "sockaddr", err),
    };

    match decode_sockaddr(&data) {
        Ok(sa) => format!("{addr:#x} {sa}"),
        Err(err) => error(addr, "sockaddr", err),
    }
}

pub fn sockaddr(a: &Arg) -> String {
    sockaddr_at(a.task, a.this().pointer(), a.after(1).uint() as usize)
}

pub fn post_sockaddr(a: &Arg) -> String {
    let addr = a.this().pointer();
    let len_addr = a.after(1).pointer();

    if addr == 0 {
        return "null".into();
    }

    match value::<u32>(a.task, len_addr, "socklen") {
        Ok(len) => sockaddr_at(a.task, addr, len as usize),
        Err(err) => err,
    }
}

pub fn sock_len(a: &Arg) -> String {
    let addr = a.this().pointer();

    if addr == 0 {
        return "null".into();
    }

    match value::<u32>(a.task, addr, "socklen") {
        Ok(len) => format!("{addr:#x} {len}"),
        Err(err) => err,
    }
}

// Time.

fn render_timespec(ts: &libc::timespec) -> String {
    format!("{{sec={} nsec={}}}", ts.tv_sec, ts.tv_nsec)
}

fn render_utime_timespec(ts: &libc::timespec) -> String {
    match ts.tv_nsec as i64 {
        UTIME_NOW => "{UTIME_NOW}".into(),
        UTIME_OMIT => "{UTIME_OMIT}".into(),
        _ => render_timespec(ts),
    }
}

fn render_timeval(tv: &libc::timeval) -> String {
    format!("{{sec={} usec={}}}", tv.tv_sec, tv.tv_usec)
}

pub fn timespec(a: &Arg) -> String {
    let addr = a.this().pointer();

    if addr == 0 {
        return "null".into();
    }

    match value::<libc::timespec>(a.task, addr, "timespec") {
        Ok(ts) => format!("{addr:#x} {}", render_timespec(&ts)),
        Err(err) => err,
    }
}

/// The `[atime, mtime]` pair of `utimensat(2)`, which may hold the `UTIME_*` sentinels.
pub fn utimens_timespecs(a: &Arg) -> String {
    let addr = a.this().pointer();

    if addr == 0 {
        return "null".into();
    }

    let size = mem::size_of::<libc::timespec>() as u64;
    let times = value::<libc::timespec>(a.task, addr, "timespec").and_then(|atime| {
        value::<libc::timespec>(a.task, addr + size, "timespec").map(|mtime| (atime, mtime))
    });

    match times {
        Ok((atime, mtime)) => format!(
            "{addr:#x} [{}, {}]",
            render_utime_timespec(&atime),
            render_utime_timespec(&mtime),
        ),
        Err(err) => err,
    }
}

pub fn timeval(a: &Arg) -> String {
    let addr = a.this().pointer();

    if addr == 0 {
        return "null".into();
    }

    match value::<libc::timeval>(a.task, addr, "timeval") {
        Ok(tv) => format!("{addr:#x} {}", render_timeval(&tv)),
        Err(err) => err,
    }
}

pub fn utimbuf(a: &Arg) -> String {
    let addr = a.this().pointer();

    if addr == 0 {
        return "null".into();
    }

    match value::<libc::utimbuf>(a.task, addr, "utimbuf") {
        Ok(buf) => format!("{addr:#x} {{actime={}, modtime={}}}", buf.actime, buf.modtime),
        Err(err) => err,
    }
}

/// A `struct itimerval`: two consecutive timevals.
pub fn itimerval(a: &Arg) -> String {
    let addr = a.this().pointer();

    if addr == 0 {
        return "null".into();
    }

    let size = mem::size_of::<libc::timeval>() as u64;
    let pair = value::<libc::timeval>(a.task, addr, "itimerval").and_then(|interval| {
        value::<libc::timeval>(a.task, addr + size, "itimerval").map(|value| (interval, value))
    });

    match pair {
        Ok((interval, value)) => format!(
            "{addr:#x} {{interval={}, value={}}}",
            render_timeval(&interval),
            render_timeval(&value),
        ),
        Err(err) => err,
    }
}

/// A `struct itimerspec`: two consecutive timespecs.
pub fn itimerspec(a: &Arg) -> String {
    let addr = a.this().pointer();

    if addr == 0 {
        return "null".into();
    }

    let size = mem::size_of::<libc::timespec>() as u64;
    let pair = value::<libc::timespec>(a.task, addr, "itimerspec").and_then(|interval| {
        value::<libc::timespec>(a.task, addr + size, "itimerspec").map(|value| (interval, value))
    });

    match pair {
        Ok((interval, value)) => format!(
            "{addr:#x} {{interval={}, value={}}}",
            render_timespec(&interval),
            render_timespec(&value),
        ),
        Err(err) => err,
    }
}

// Structures filled in by the kernel.

pub fn stat(a: &Arg) -> String {
    let addr = a.this().pointer();

    let st: libc::stat = match value(a.task, addr, "stat") {
        Ok(st) => st,
        Err(err) => return err,
    };

    format!(
        "{:#x} {{dev={}, ino={}, mode={}, nlink={}, uid={}, gid={}, rdev={}, size={}, \
         blksize={}, blocks={}, atime={}.{:09}, mtime={}.{:09}, ctime={}.{:09}}}",
        addr,
        st.st_dev,
        st.st_ino,
        abi::file_mode(st.st_mode as u32),
        st.st_nlink,
        st.st_uid,
        st.st_gid,
        st.st_rdev,
        st.st_size,
        st.st_blksize,
        st.st_blocks,
        st.st_atime,
        st.st_atime_nsec,
        st.st_mtime,
        st.st_mtime_nsec,
        st.st_ctime,
        st.st_ctime_nsec,
    )
}

fn c_chars(field: &[libc::c_char]) -> String {
    let bytes: Vec<u8> = field.iter().map(|&c| c as u8).take_while(|&b| b != 0).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn uname(a: &Arg) -> String {
    let addr = a.this().pointer();

    let u: libc::utsname = match value(a.task, addr, "utsname") {
        Ok(u) => u,
        Err(err) => return err,
    };

    format!(
        "{:#x} {{sysname={}, nodename={}, release={}, version={}, machine={}, domainname={}}}",
        addr,
        c_chars(&u.sysname),
        c_chars(&u.nodename),
        c_chars(&u.release),
        c_chars(&u.version),
        c_chars(&u.machine),
        c_chars(&u.domainname),
    )
}

pub fn rusage(a: &Arg) -> String {
    let addr = a.this().pointer();

    let ru: libc::rusage = match value(a.task, addr, "rusage") {
        Ok(ru) => ru,
        Err(err) => return err,
    };

    format!(
        "{:#x} {{utime={}, stime={}, maxrss={}, minflt={}, majflt={}, inblock={}, oublock={}, \
         nvcsw={}, nivcsw={}}}",
        addr,
        render_timeval(&ru.ru_utime),
        render_timeval(&ru.ru_stime),
        ru.ru_maxrss,
        ru.ru_minflt,
        ru.ru_majflt,
        ru.ru_inblock,
        ru.ru_oublock,
        ru.ru_nvcsw,
        ru.ru_nivcsw,
    )
}
