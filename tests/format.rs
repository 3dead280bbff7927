use std::mem;
use std::time::Duration;

use anyhow::{anyhow, Result};
use nix::errno::Errno;
use pretty_assertions::assert_eq;
use strace::abi::{AT_FDCWD, UTIME_NOW};
use strace::args::arguments;
use strace::format::decode::{self, dump};
use strace::format::{Arg, LOG_MAXIMUM_SIZE};
use strace::syscalls::{self, SyscallInfo};
use strace::{Event, Printer, SyscallArgument};

#[macro_use]
mod support;
use support::*;

fn syscall(name: &str) -> Result<SyscallInfo> {
    let sysno = syscalls::number(name).ok_or_else(|| anyhow!("no syscall named `{name}`"))?;
    Ok(syscalls::lookup(sysno))
}

#[test]
fn test_openat_enter() -> Result<()> {
    let mut task = FakeTask::new();
    let path = task.push_str("/etc/passwd");

    let flags = (libc::O_RDONLY | libc::O_CLOEXEC) as u64;
    let args = arguments([AT_FDCWD as u64, path, flags, 0, 0, 0]);

    let line = syscall("openat")?.print_enter(&task, &args, LOG_MAXIMUM_SIZE);

    assert_eq!(
        line,
        "fake(1) E openat(AT_FDCWD, 0x1000 /etc/passwd, O_RDONLY|O_CLOEXEC, 0o0 (----------))",
    );

    Ok(())
}

#[test]
fn test_read_exit_dumps_filled_bytes() -> Result<()> {
    let mut task = FakeTask::new();
    let buf = task.push(b"hello world");

    let args = arguments([3, buf, 64, 0, 0, 0]);
    let info = syscall("read")?;

    // The buffer is only dumped once the syscall has filled it.
    let enter = info.print_enter(&task, &args, LOG_MAXIMUM_SIZE);
    assert_eq!(enter, "fake(1) E read(3, 0x1000, 0x40)");

    let exit = info.print_exit(
        &task,
        Duration::from_millis(1),
        &args,
        SyscallArgument(5),
        None,
        LOG_MAXIMUM_SIZE,
    );
    assert_eq!(exit, r#"fake(1) X read(3, 0x1000 "hello", 0x40) = 0x5 (1ms)"#);

    Ok(())
}

#[test]
fn test_failed_syscall_skips_post_rendering() -> Result<()> {
    let mut task = FakeTask::new();
    let buf = task.push(b"stale");

    let args = arguments([3, buf, 64, 0, 0, 0]);

    let exit = syscall("read")?.print_exit(
        &task,
        Duration::ZERO,
        &args,
        SyscallArgument(-9i64 as u64),
        Some(Errno::EBADF),
        LOG_MAXIMUM_SIZE,
    );

    assert!(exit.starts_with("fake(1) X read(3, 0x1000, 0x40) = EBADF"), "{exit}");
    assert!(exit.ends_with("(0x9) (0ns)"), "{exit}");

    Ok(())
}

#[test]
fn test_write_enter_dumps_and_exit_elides() -> Result<()> {
    let mut task = FakeTask::new();
    let buf = task.push(b"hi\n");

    let args = arguments([1, buf, 3, 0, 0, 0]);
    let info = syscall("write")?;

    let enter = info.print_enter(&task, &args, LOG_MAXIMUM_SIZE);
    assert_eq!(enter, r#"fake(1) E write(1, 0x1000 "hi\n", 0x3)"#);

    let exit = info.print_exit(&task, Duration::ZERO, &args, SyscallArgument(3), None, 16);
    assert_eq!(exit, "fake(1) X write(1, ..., 0x3) = 0x3 (0ns)");

    Ok(())
}

#[test]
fn test_dump_truncation() {
    let mut task = FakeTask::new();
    let addr = task.push(b"hello world");

    assert_eq!(dump(&task, addr, 11, 4), r#"0x1000 "hell"..."#);
    assert_eq!(dump(&task, addr, 4, 4), r#"0x1000 "hell""#);
    assert_eq!(dump(&task, addr, 0, 4), r#"0x1000 """#);
    assert_eq!(dump(&task, addr, 5, 0), r#"0x1000 ""..."#);
}

#[test]
fn test_dump_short_read_is_truncated() {
    let mut task = FakeTask::new();
    let addr = task.push(b"abc");

    // Memory ends after three bytes.
    assert_eq!(dump(&task, addr, 10, LOG_MAXIMUM_SIZE), r#"0x1000 "abc"..."#);
}

#[test]
fn test_dump_escapes_bytes() {
    let mut task = FakeTask::new();
    let addr = task.push(b"a\"b\x01");

    assert_eq!(dump(&task, addr, 4, 4), r#"0x1000 "a\"b\x01""#);
}

#[test]
fn test_decode_errors_are_inline() -> Result<()> {
    let task = FakeTask::new();

    let args = arguments([0xdead_0000, 0, 0, 0, 0, 0]);
    let line = syscall("chdir")?.print_enter(&task, &args, LOG_MAXIMUM_SIZE);

    assert_eq!(
        line,
        "fake(1) E chdir(0xdead0000 (error decoding path: \
         Could not read tracee memory at 0xdead0000))",
    );

    let line = dump(&task, 0xdead_0000, 4, 4);
    assert_eq!(
        line,
        "0xdead0000 (error decoding string: Could not read tracee memory at 0xdead0000)",
    );

    Ok(())
}

#[test]
fn test_null_pointers() -> Result<()> {
    let task = FakeTask::new();
    let args = arguments([0; 6]);

    let chdir = syscall("chdir")?.print_enter(&task, &args, LOG_MAXIMUM_SIZE);
    assert_eq!(chdir, "fake(1) E chdir(0x0 <nil>)");

    let nanosleep = syscall("nanosleep")?.print_enter(&task, &args, LOG_MAXIMUM_SIZE);
    assert_eq!(nanosleep, "fake(1) E nanosleep(null, 0x0)");

    Ok(())
}

#[test]
fn test_execve_argv() -> Result<()> {
    let mut task = FakeTask::new();
    let path = task.push_str("/bin/ls");
    let ls = task.push_str("ls");
    let flag = task.push_str("-l");
    let argv = task.push_value(&[ls, flag, 0u64]);

    let args = arguments([path, argv, 0, 0, 0, 0]);
    let line = syscall("execve")?.print_enter(&task, &args, LOG_MAXIMUM_SIZE);

    assert_eq!(line, r#"fake(1) E execve(0x1000 /bin/ls, 0x1018 ["ls", "-l"], 0x0 [])"#);

    Ok(())
}

#[test]
fn test_pipe2_fds_after_exit() -> Result<()> {
    let mut task = FakeTask::new();
    let fds = task.push_value(&[3i32, 4i32]);

    let flags = libc::O_CLOEXEC as u64;
    let args = arguments([fds, flags, 0, 0, 0, 0]);

    let exit = syscall("pipe2")?.print_exit(
        &task,
        Duration::ZERO,
        &args,
        SyscallArgument(0),
        None,
        LOG_MAXIMUM_SIZE,
    );

    assert_eq!(exit, format!("fake(1) X pipe2(0x1000 [3, 4], {flags:#x}) = 0x0 (0ns)"));

    Ok(())
}

#[test]
fn test_connect_inet() -> Result<()> {
    let mut sa: libc::sockaddr_in = unsafe { mem::zeroed() };
    sa.sin_family = libc::AF_INET as libc::sa_family_t;
    sa.sin_port = 8080u16.to_be();
    sa.sin_addr.s_addr = u32::from_ne_bytes([127, 0, 0, 1]);

    let mut task = FakeTask::new();
    let addr = task.push_value(&sa);
    let len = mem::size_of::<libc::sockaddr_in>() as u64;

    let args = arguments([3, addr, len, 0, 0, 0]);
    let line = syscall("connect")?.print_enter(&task, &args, LOG_MAXIMUM_SIZE);

    assert_eq!(line, "fake(1) E connect(3, 0x1000 AF_INET 127.0.0.1:8080, 0x10)");

    Ok(())
}

#[test]
fn test_sockaddr_length_is_bounded() -> Result<()> {
    let mut task = FakeTask::new();
    let addr = task.push(&[0; 256]);

    let args = arguments([3, addr, 200, 0, 0, 0]);
    let line = syscall("connect")?.print_enter(&task, &args, LOG_MAXIMUM_SIZE);

    assert_eq!(
        line,
        "fake(1) E connect(3, 0x1000 (error decoding sockaddr: address length 200 too large), 0xc8)",
    );

    Ok(())
}

#[test]
fn test_iovecs_share_one_budget() {
    let mut task = FakeTask::new();
    let first = task.push(b"ab");
    let second = task.push(b"cde");

    let iovs = [
        libc::iovec { iov_base: first as *mut libc::c_void, iov_len: 2 },
        libc::iovec { iov_base: second as *mut libc::c_void, iov_len: 3 },
    ];
    let addr = task.push_value(&iovs);

    assert_eq!(
        decode::iovecs(&task, addr, 2, true, 4),
        r#"0x1010 [{base=0x1000, len=2, "ab"}, {base=0x1008, len=3, "cd"...}]"#,
    );

    assert_eq!(
        decode::iovecs(&task, addr, 2, false, 0),
        "0x1010 [{base=0x1000, len=2}, {base=0x1008, len=3}]",
    );
}

#[test]
fn test_iovec_count_is_bounded() {
    let task = FakeTask::new();

    assert_eq!(
        decode::iovecs(&task, BASE, 1025, true, 4),
        "0x1000 (error decoding iovecs: invalid iovec count 1025)",
    );
    assert_eq!(
        decode::iovecs(&task, BASE, -1, true, 4),
        "0x1000 (error decoding iovecs: invalid iovec count -1)",
    );
}

#[test]
fn test_utimensat_special_times() -> Result<()> {
    let mut now: libc::timespec = unsafe { mem::zeroed() };
    now.tv_nsec = UTIME_NOW as _;

    let mut explicit: libc::timespec = unsafe { mem::zeroed() };
    explicit.tv_sec = 5;
    explicit.tv_nsec = 7;

    let mut task = FakeTask::new();
    let path = task.push_str("f");
    let times = task.push_value(&[now, explicit]);

    let args = arguments([AT_FDCWD as u64, path, times, 0, 0, 0]);
    let line = syscall("utimensat")?.print_enter(&task, &args, LOG_MAXIMUM_SIZE);

    assert_eq!(
        line,
        "fake(1) E utimensat(AT_FDCWD, 0x1000 f, 0x1008 [{UTIME_NOW}, {sec=5 nsec=7}], 0x0)",
    );

    Ok(())
}

#[test]
fn test_decode_function_sees_neighbors() {
    let task = FakeTask::new();
    let args = arguments([libc::AF_INET as u64, libc::SOCK_STREAM as u64, 6, 0, 0, 0]);

    let arg = Arg { task: &task, args: &args, index: 2, rval: SyscallArgument(0), max: 0 };

    assert_eq!(arg.before(2), SyscallArgument(libc::AF_INET as u64));
    assert_eq!(arg.after(4), SyscallArgument(0));
    assert_eq!(decode::sock_protocol(&arg), "IPPROTO_TCP");
}

#[test]
fn test_printer_with_zero_max_size_elides_buffers() -> Result<()> {
    let mut task = FakeTask::new();
    let buf = task.push(b"hi\n");

    let sysno = syscalls::number("write").ok_or_else(|| anyhow!("no write syscall"))?;
    let mut record = syscall_record(pid!(1), sysno, true);

    if let Event::SyscallEnter(syscall) = &mut record.event {
        syscall.args = arguments([1, buf, 3, 0, 0, 0]);
    }

    let printer = Printer::new(vec![]).with_max_size(0);
    assert_eq!(printer.render(&task, &record), r#"fake(1) E write(1, 0x1000 ""..., 0x3)"#);

    Ok(())
}
