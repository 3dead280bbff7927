use pretty_assertions::assert_eq;
use strace::format::FormatSpecifier::*;
use strace::syscalls;

#[test]
fn test_lookup_known() {
    let sysno = syscalls::number("execve").expect("execve is in every table");
    let info = syscalls::lookup(sysno);

    assert_eq!(info.name, "execve");
    assert_eq!(info.format, &[Path, ExecveStringVector, ExecveStringVector]);
    assert_eq!(syscalls::get(sysno), Some(info));
}

#[test]
fn test_lookup_unknown() {
    let info = syscalls::lookup(100_000);

    assert_eq!(info.name, "sys_100000");
    assert_eq!(info.format.len(), 6);
    assert!(info.format.iter().all(|f| *f == Hex));
    assert_eq!(syscalls::get(100_000), None);
}

#[test]
fn test_number_and_lookup_agree() {
    for name in ["read", "write", "openat", "close", "exit_group", "clone", "wait4"] {
        let sysno = syscalls::number(name).expect(name);
        assert_eq!(syscalls::lookup(sysno).name, name);
    }
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_native_numbers() {
    assert_eq!(syscalls::number("read"), Some(0));
    assert_eq!(syscalls::number("execve"), Some(59));
    assert_eq!(syscalls::number("exit_group"), Some(231));
    assert_eq!(syscalls::number("openat2"), Some(437));
}

#[cfg(target_arch = "aarch64")]
#[test]
fn test_native_numbers() {
    assert_eq!(syscalls::number("read"), Some(63));
    assert_eq!(syscalls::number("execve"), Some(221));
    assert_eq!(syscalls::number("exit_group"), Some(94));
    assert_eq!(syscalls::number("openat2"), Some(437));
}
