//! Syscall names and argument formats, keyed by the native syscall number.

use std::borrow::Cow;
use std::collections::BTreeMap;

use lazy_static::lazy_static;

use crate::args::MAX_SYSCALL_ARGS;
use crate::format::FormatSpecifier::{self, *};

#[cfg(target_arch = "aarch64")]
mod aarch64;

#[cfg(target_arch = "aarch64")]
use aarch64::SYSCALLS;

#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(target_arch = "x86_64")]
use x86_64::SYSCALLS;

/// The name and argument formats of one syscall.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyscallInfo {
    pub name: Cow<'static, str>,
    pub format: &'static [FormatSpecifier],
}

impl SyscallInfo {
    /// Info for a number missing from the table: a synthesized name and raw arguments.
    pub fn unknown(sysno: u64) -> Self {
        Self {
            name: Cow::Owned(format!("sys_{sysno}")),
            format: UNKNOWN_FORMAT,
        }
    }
}

const UNKNOWN_FORMAT: &[FormatSpecifier] = &[Hex; MAX_SYSCALL_ARGS];

macro_rules! formats {
    ($($name: ident($($fmt: ident),*)),* $(,)?) => {
        &[$((stringify!($name), &[$($fmt),*])),*]
    };
}

/// Argument formats by syscall name. Names are shared across architectures, numbers are not.
const FORMATS: &[(&str, &[FormatSpecifier])] = formats! {
    read(FD, ReadBuffer, Hex),
    write(FD, WriteBuffer, Hex),
    open(Path, OpenFlags, Mode),
    close(FD),
    stat(Path, Stat),
    fstat(FD, Stat),
    lstat(Path, Stat),
    poll(Hex, Hex, Hex),
    lseek(FD, Hex, Hex),
    mmap(Hex, Hex, Hex, Hex, FD, Hex),
    mprotect(Hex, Hex, Hex),
    munmap(Hex, Hex),
    brk(Hex),
    rt_sigaction(Signal, Hex, Hex, Hex),
    rt_sigprocmask(Hex, Hex, Hex, Hex),
    rt_sigreturn(),
    ioctl(FD, Hex, Hex),
    pread64(FD, ReadBuffer, Hex, Hex),
    pwrite64(FD, WriteBuffer, Hex, Hex),
    readv(FD, ReadIOVec, Hex),
    writev(FD, WriteIOVec, Hex),
    access(Path, Oct),
    pipe(PipeFDs),
    select(Hex, Hex, Hex, Hex, Timeval),
    sched_yield(),
    mremap(Hex, Hex, Hex, Hex, Hex),
    msync(Hex, Hex, Hex),
    mincore(Hex, Hex, Hex),
    madvise(Hex, Hex, Hex),
    shmget(Hex, Hex, Hex),
    shmat(Hex, Hex, Hex),
    shmctl(Hex, Hex, Hex),
    dup(FD),
    dup2(FD, FD),
    pause(),
    nanosleep(Timespec, PostTimespec),
    getitimer(ItimerType, PostItimerVal),
    alarm(Hex),
    setitimer(ItimerType, ItimerVal, PostItimerVal),
    getpid(),
    sendfile(FD, FD, Hex, Hex),
    socket(SockFamily, SockType, SockProtocol),
    connect(FD, SockAddr, Hex),
    accept(FD, PostSockAddr, SockLen),
    sendto(FD, WriteBuffer, Hex, Hex, SockAddr, Hex),
    recvfrom(FD, ReadBuffer, Hex, Hex, PostSockAddr, SockLen),
    sendmsg(FD, SendMsgHdr, Hex),
    recvmsg(FD, RecvMsgHdr, Hex),
    shutdown(FD, Hex),
    bind(FD, SockAddr, Hex),
    listen(FD, Hex),
    getsockname(FD, PostSockAddr, SockLen),
    getpeername(FD, PostSockAddr, SockLen),
    socketpair(SockFamily, SockType, SockProtocol, PipeFDs),
    setsockopt(FD, Hex, Hex, Hex, Hex),
    getsockopt(FD, Hex, Hex, Hex, Hex),
    clone(CloneFlags, Hex, Hex, Hex, Hex),
    fork(),
    vfork(),
    execve(Path, ExecveStringVector, ExecveStringVector),
    exit(Hex),
    wait4(Hex, Hex, Hex, Rusage),
    kill(Hex, Signal),
    uname(Uname),
    semget(Hex, Hex, Hex),
    semop(Hex, Hex, Hex),
    semctl(Hex, Hex, Hex, Hex),
    shmdt(Hex),
    msgget(Hex, Hex),
    msgsnd(Hex, Hex, Hex, Hex),
    msgrcv(Hex, Hex, Hex, Hex, Hex),
    msgctl(Hex, Hex, Hex),
    fcntl(FD, Hex, Hex),
    flock(FD, Hex),
    fsync(FD),
    fdatasync(FD),
    truncate(Path, Hex),
    ftruncate(FD, Hex),
    getdents(FD, Hex, Hex),
    getcwd(PostPath, Hex),
    chdir(Path),
    fchdir(FD),
    rename(Path, Path),
    mkdir(Path, Oct),
    rmdir(Path),
    creat(Path, Oct),
    link(Path, Path),
    unlink(Path),
    symlink(Path, Path),
    readlink(Path, ReadBuffer, Hex),
    chmod(Path, Mode),
    fchmod(FD, Mode),
    chown(Path, Hex, Hex),
    fchown(FD, Hex, Hex),
    lchown(Path, Hex, Hex),
    umask(Oct),
    gettimeofday(Timeval, Hex),
    getrlimit(Hex, Hex),
    getrusage(Hex, Rusage),
    sysinfo(Hex),
    times(Hex),
    ptrace(PtraceRequest, Hex, Hex, Hex),
    getuid(),
    syslog(Hex, Hex, Hex),
    getgid(),
    setuid(Hex),
    setgid(Hex),
    geteuid(),
    getegid(),
    setpgid(Hex, Hex),
    getppid(),
    getpgrp(),
    setsid(),
    setreuid(Hex, Hex),
    setregid(Hex, Hex),
    getgroups(Hex, Hex),
    setgroups(Hex, Hex),
    setresuid(Hex, Hex, Hex),
    getresuid(Hex, Hex, Hex),
    setresgid(Hex, Hex, Hex),
    getresgid(Hex, Hex, Hex),
    getpgid(Hex),
    setfsuid(Hex),
    setfsgid(Hex),
    getsid(Hex),
    capget(Hex, Hex),
    capset(Hex, Hex),
    rt_sigpending(Hex, Hex),
    rt_sigtimedwait(Hex, Hex, Timespec, Hex),
    rt_sigqueueinfo(Hex, Signal, Hex),
    rt_sigsuspend(Hex, Hex),
    sigaltstack(Hex, Hex),
    utime(Path, Utimbuf),
    mknod(Path, Mode, Hex),
    uselib(Path),
    personality(Hex),
    ustat(Hex, Hex),
    statfs(Path, Hex),
    fstatfs(FD, Hex),
    sysfs(Hex, Hex, Hex),
    getpriority(Hex, Hex),
    setpriority(Hex, Hex, Hex),
    sched_setparam(Hex, Hex),
    sched_getparam(Hex, Hex),
    sched_setscheduler(Hex, Hex, Hex),
    sched_getscheduler(Hex),
    sched_get_priority_max(Hex),
    sched_get_priority_min(Hex),
    sched_rr_get_interval(Hex, PostTimespec),
    mlock(Hex, Hex),
    munlock(Hex, Hex),
    mlockall(Hex),
    munlockall(),
    vhangup(),
    modify_ldt(Hex, Hex, Hex),
    pivot_root(Path, Path),
    _sysctl(Hex),
    prctl(Hex, Hex, Hex, Hex, Hex),
    arch_prctl(Hex, Hex),
    adjtimex(Hex),
    setrlimit(Hex, Hex),
    chroot(Path),
    sync(),
    acct(Path),
    settimeofday(Timeval, Hex),
    mount(Path, Path, Path, Hex, Hex),
    umount2(Path, Hex),
    swapon(Path, Hex),
    swapoff(Path),
    reboot(Hex, Hex, Hex, Hex),
    sethostname(Hex, Hex),
    setdomainname(Hex, Hex),
    iopl(Hex),
    ioperm(Hex, Hex, Hex),
    create_module(Path, Hex),
    init_module(Hex, Hex, Hex),
    delete_module(Hex, Hex),
    get_kernel_syms(Hex),
    query_module(Hex, Hex, Hex, Hex, Hex),
    quotactl(Hex, Hex, Hex, Hex),
    nfsservctl(Hex, Hex, Hex),
    getpmsg(Hex, Hex, Hex, Hex, Hex),
    putpmsg(Hex, Hex, Hex, Hex, Hex),
    afs_syscall(Hex, Hex, Hex, Hex, Hex),
    tuxcall(Hex, Hex, Hex, Hex, Hex),
    security(Hex, Hex, Hex, Hex, Hex),
    gettid(),
    readahead(FD, Hex, Hex),
    setxattr(Path, Path, Hex, Hex, Hex),
    lsetxattr(Path, Path, Hex, Hex, Hex),
    fsetxattr(FD, Path, Hex, Hex, Hex),
    getxattr(Path, Path, Hex, Hex),
    lgetxattr(Path, Path, Hex, Hex),
    fgetxattr(FD, Path, Hex, Hex),
    listxattr(Path, Hex, Hex),
    llistxattr(Path, Hex, Hex),
    flistxattr(FD, Hex, Hex),
    removexattr(Path, Path),
    lremovexattr(Path, Path),
    fremovexattr(FD, Path),
    tkill(Hex, Signal),
    time(Hex),
    futex(Hex, FutexOp, Hex, Timespec, Hex, Hex),
    sched_setaffinity(Hex, Hex, Hex),
    sched_getaffinity(Hex, Hex, Hex),
    set_thread_area(Hex),
    io_setup(Hex, Hex),
    io_destroy(Hex),
    io_getevents(Hex, Hex, Hex, Hex, Timespec),
    io_submit(Hex, Hex, Hex),
    io_cancel(Hex, Hex, Hex),
    get_thread_area(Hex),
    lookup_dcookie(Hex, Hex, Hex),
    epoll_create(Hex),
    epoll_ctl_old(Hex, Hex, Hex, Hex),
    epoll_wait_old(Hex, Hex, Hex, Hex),
    remap_file_pages(Hex, Hex, Hex, Hex, Hex),
    getdents64(FD, Hex, Hex),
    set_tid_address(Hex),
    restart_syscall(),
    semtimedop(Hex, Hex, Hex, Timespec),
    fadvise64(FD, Hex, Hex, Hex),
    timer_create(Hex, Hex, Hex),
    timer_settime(Hex, Hex, ItimerSpec, PostItimerSpec),
    timer_gettime(Hex, PostItimerSpec),
    timer_getoverrun(Hex),
    timer_delete(Hex),
    clock_settime(Hex, Timespec),
    clock_gettime(Hex, PostTimespec),
    clock_getres(Hex, PostTimespec),
    clock_nanosleep(Hex, Hex, Timespec, PostTimespec),
    exit_group(Hex),
    epoll_wait(FD, Hex, Hex, Hex),
    epoll_ctl(FD, Hex, FD, Hex),
    tgkill(Hex, Hex, Signal),
    utimes(Path, Timeval),
    vserver(Hex, Hex, Hex, Hex, Hex),
    mbind(Hex, Hex, Hex, Hex, Hex, Hex),
    set_mempolicy(Hex, Hex, Hex),
    get_mempolicy(Hex, Hex, Hex, Hex, Hex),
    mq_open(Path, OpenFlags, Mode, Hex),
    mq_unlink(Path),
    mq_timedsend(FD, WriteBuffer, Hex, Hex, Timespec),
    mq_timedreceive(FD, ReadBuffer, Hex, Hex, Timespec),
    mq_notify(FD, Hex),
    mq_getsetattr(FD, Hex, Hex),
    kexec_load(Hex, Hex, Hex, Hex),
    waitid(Hex, Hex, Hex, Hex, Rusage),
    add_key(Hex, Hex, Hex, Hex, Hex),
    request_key(Hex, Hex, Hex, Hex),
    keyctl(Hex, Hex, Hex, Hex, Hex),
    ioprio_set(Hex, Hex, Hex),
    ioprio_get(Hex, Hex),
    inotify_init(),
    inotify_add_watch(FD, Path, Hex),
    inotify_rm_watch(FD, Hex),
    migrate_pages(Hex, Hex, Hex, Hex),
    openat(FD, Path, OpenFlags, Mode),
    mkdirat(FD, Path, Oct),
    mknodat(FD, Path, Mode, Hex),
    fchownat(FD, Path, Hex, Hex, Hex),
    futimesat(FD, Path, Hex),
    newfstatat(FD, Path, Stat, Hex),
    unlinkat(FD, Path, Hex),
    renameat(FD, Path, FD, Path),
    linkat(FD, Path, FD, Path, Hex),
    symlinkat(Path, FD, Path),
    readlinkat(FD, Path, ReadBuffer, Hex),
    fchmodat(FD, Path, Mode),
    faccessat(FD, Path, Oct, Hex),
    pselect6(Hex, Hex, Hex, Hex, Timespec, Hex),
    ppoll(Hex, Hex, Timespec, Hex, Hex),
    unshare(CloneFlags),
    set_robust_list(Hex, Hex),
    get_robust_list(Hex, Hex, Hex),
    splice(FD, Hex, FD, Hex, Hex, Hex),
    tee(FD, FD, Hex, Hex),
    sync_file_range(FD, Hex, Hex, Hex),
    vmsplice(FD, Hex, Hex, Hex),
    move_pages(Hex, Hex, Hex, Hex, Hex, Hex),
    utimensat(FD, Path, UTimeTimespec, Hex),
    epoll_pwait(FD, Hex, Hex, Hex, Hex, Hex),
    signalfd(FD, Hex, Hex),
    timerfd_create(Hex, Hex),
    eventfd(Hex),
    fallocate(FD, Hex, Hex, Hex),
    timerfd_settime(FD, Hex, ItimerSpec, PostItimerSpec),
    timerfd_gettime(FD, PostItimerSpec),
    accept4(FD, PostSockAddr, SockLen, SockFlags),
    signalfd4(FD, Hex, Hex, Hex),
    eventfd2(Hex, Hex),
    epoll_create1(Hex),
    dup3(FD, FD, Hex),
    pipe2(PipeFDs, Hex),
    inotify_init1(Hex),
    preadv(FD, ReadIOVec, Hex, Hex),
    pwritev(FD, WriteIOVec, Hex, Hex),
    rt_tgsigqueueinfo(Hex, Hex, Signal, Hex),
    perf_event_open(Hex, Hex, Hex, Hex, Hex),
    recvmmsg(FD, Hex, Hex, Hex, Timespec),
    fanotify_init(Hex, Hex),
    fanotify_mark(Hex, Hex, Hex, Hex, Hex),
    prlimit64(Hex, Hex, Hex, Hex),
    name_to_handle_at(FD, Path, Hex, Hex, Hex),
    open_by_handle_at(FD, Hex, OpenFlags),
    clock_adjtime(Hex, Hex),
    syncfs(FD),
    sendmmsg(FD, Hex, Hex, Hex),
    setns(FD, CloneFlags),
    getcpu(Hex, Hex, Hex),
    process_vm_readv(Hex, ReadIOVec, Hex, IOVec, Hex, Hex),
    process_vm_writev(Hex, IOVec, Hex, WriteIOVec, Hex, Hex),
    kcmp(Hex, Hex, Hex, Hex, Hex),
    finit_module(FD, Hex, Hex),
    sched_setattr(Hex, Hex, Hex),
    sched_getattr(Hex, Hex, Hex, Hex),
    renameat2(FD, Path, FD, Path, Hex),
    seccomp(Hex, Hex, Hex),
    getrandom(Hex, Hex, Hex),
    memfd_create(Path, Hex),
    kexec_file_load(FD, FD, Hex, Hex, Hex),
    bpf(Hex, Hex, Hex),
    execveat(FD, Path, ExecveStringVector, ExecveStringVector, Hex),
    userfaultfd(Hex),
    membarrier(Hex, Hex),
    mlock2(Hex, Hex, Hex),
    copy_file_range(FD, Hex, FD, Hex, Hex, Hex),
    preadv2(FD, ReadIOVec, Hex, Hex, Hex),
    pwritev2(FD, WriteIOVec, Hex, Hex, Hex),
    pkey_mprotect(Hex, Hex, Hex, Hex),
    pkey_alloc(Hex, Hex),
    pkey_free(Hex),
    statx(FD, Path, Hex, Hex, Hex),
    io_pgetevents(Hex, Hex, Hex, Hex, Timespec, Hex),
    rseq(Hex, Hex, Hex, Hex),
    pidfd_send_signal(FD, Signal, Hex, Hex),
    io_uring_setup(Hex, Hex),
    io_uring_enter(FD, Hex, Hex, Hex, Hex, Hex),
    io_uring_register(FD, Hex, Hex, Hex),
    open_tree(FD, Path, Hex),
    move_mount(FD, Path, FD, Path, Hex),
    fsopen(Path, Hex),
    fsconfig(FD, Hex, Hex, Hex, Hex),
    fsmount(FD, Hex, Hex),
    fspick(FD, Path, Hex),
    pidfd_open(Hex, Hex),
    clone3(Hex, Hex),
    close_range(FD, FD, Hex),
    openat2(FD, Path, Hex, Hex),
    pidfd_getfd(FD, FD, Hex),
    faccessat2(FD, Path, Oct, Hex),
};

lazy_static! {
    static ref TABLE: BTreeMap<u64, SyscallInfo> = {
        let formats: BTreeMap<&str, &'static [FormatSpecifier]> =
            FORMATS.iter().copied().collect();

        SYSCALLS
            .iter()
            .map(|&(sysno, name)| {
                let format = formats.get(name).copied().unwrap_or(UNKNOWN_FORMAT);
                let info = SyscallInfo { name: Cow::Borrowed(name), format };
                (sysno, info)
            })
            .collect()
    };
}

/// Look up a syscall by its native number, if the table has it.
pub fn get(sysno: u64) -> Option<SyscallInfo> {
    TABLE.get(&sysno).cloned()
}

/// Look up a syscall by its native number.
///
/// Numbers missing from the table yield [`SyscallInfo::unknown`], so every number has a name.
pub fn lookup(sysno: u64) -> SyscallInfo {
    get(sysno).unwrap_or_else(|| SyscallInfo::unknown(sysno))
}

/// Look up a syscall number by name, if the native table has it.
pub fn number(name: &str) -> Option<u64> {
    SYSCALLS
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(sysno, _)| *sysno)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_name_has_a_format() {
        let missing: Vec<&str> = SYSCALLS
            .iter()
            .map(|(_, name)| *name)
            .filter(|name| FORMATS.iter().all(|(n, _)| n != name))
            .collect();

        assert!(missing.is_empty(), "missing formats: {missing:?}");
    }

    #[test]
    fn test_formats_fit_argument_registers() {
        for (name, format) in FORMATS {
            assert!(format.len() <= MAX_SYSCALL_ARGS, "{name}");
        }
    }

    #[test]
    fn test_unknown_number() {
        let info = lookup(99_999);

        assert_eq!(info.name, "sys_99999");
        assert_eq!(info.format, &[Hex; MAX_SYSCALL_ARGS]);
    }
}
