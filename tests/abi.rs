use pretty_assertions::assert_eq;
use strace::abi::{self, FlagSet, OPEN_FLAGS, SOCKET_FAMILY};

#[test]
fn test_open_flags() {
    let flags = libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC;
    assert_eq!(abi::open_flags(flags as u64), "O_WRONLY|O_CREAT|O_TRUNC");

    assert_eq!(abi::open_flags(libc::O_RDONLY as u64), "O_RDONLY");
    assert_eq!(abi::open_flags((libc::O_RDWR | 0x4000_0000) as u64), "O_RDWR|0x40000000");
}

#[test]
fn test_o_sync_consumes_o_dsync() {
    assert_eq!(abi::open_flags(libc::O_SYNC as u64), "O_RDONLY|O_SYNC");
    assert_eq!(abi::open_flags(libc::O_DSYNC as u64), "O_RDONLY|O_DSYNC");
}

#[test]
fn test_unnamed_zero() {
    assert_eq!(OPEN_FLAGS.parse(0), "0x0");
    assert_eq!(FlagSet(&[]).parse(0x30), "0x30");
}

#[test]
fn test_clone_flags() {
    let flags = 0x100 | 0x200 | libc::SIGCHLD as u64;

    assert_eq!(abi::clone_flags(flags), "CLONE_VM|CLONE_FS|SIGCHLD");
    assert_eq!(abi::clone_flags(libc::SIGCHLD as u64), "SIGCHLD");
    assert_eq!(abi::clone_flags(0), "0");
}

#[test]
fn test_futex_op() {
    assert_eq!(abi::futex_op(0), "FUTEX_WAIT");
    assert_eq!(abi::futex_op(1 | 128), "FUTEX_WAKE|FUTEX_PRIVATE_FLAG");
    assert_eq!(abi::futex_op(9 | 256 | 128), "FUTEX_WAIT_BITSET|FUTEX_CLOCK_REALTIME|FUTEX_PRIVATE_FLAG");
}

#[test]
fn test_socket_arguments() {
    assert_eq!(SOCKET_FAMILY.parse(libc::AF_INET6 as u64), "AF_INET6");

    let stype = libc::SOCK_STREAM | libc::SOCK_CLOEXEC;
    assert_eq!(abi::sock_type(stype), "SOCK_STREAM|SOCK_CLOEXEC");

    assert_eq!(abi::sock_protocol(libc::AF_INET, 17), "IPPROTO_UDP");
    assert_eq!(abi::sock_protocol(libc::AF_NETLINK, 0), "NETLINK_ROUTE");
    assert_eq!(abi::sock_protocol(libc::AF_UNIX, 0), "0x0");

    assert_eq!(abi::sock_flags(0), "0");
    assert_eq!(abi::sock_flags(libc::SOCK_NONBLOCK), "SOCK_NONBLOCK");
}

#[test]
fn test_signal_name() {
    assert_eq!(abi::signal_name(9), "SIGKILL");
    assert_eq!(abi::signal_name(99), "99");
}

#[test]
fn test_file_mode() {
    assert_eq!(abi::file_mode(0o100644), "-rw-r--r--");
    assert_eq!(abi::file_mode(0o040755), "drwxr-xr-x");
    assert_eq!(abi::file_mode(0o010600), "prw-------");
}
