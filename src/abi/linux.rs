//! Linux ABI constant tables, from the kernel's `include/uapi` headers.
//!
//! The values here are common to the 64-bit architectures we trace. They are used only for
//! rendering, never to issue requests.

use super::{Flag, FlagSet};

macro_rules! values {
    ($($name: ident = $value: expr),* $(,)?) => {
        FlagSet(&[$(Flag::Value { value: $value as u64, name: stringify!($name) }),*])
    };
}

macro_rules! bits {
    ($($name: ident = $value: expr),* $(,)?) => {
        FlagSet(&[$(Flag::Bit { value: $value as u64, name: stringify!($name) }),*])
    };
}

// open

pub const O_ACCMODE: i32 = libc::O_ACCMODE;

/// The access mode of `open(2)`.
pub const OPEN_MODE: FlagSet = values! {
    O_RDONLY = libc::O_RDONLY,
    O_WRONLY = libc::O_WRONLY,
    O_RDWR = libc::O_RDWR,
};

/// The non-access-mode flags of `open(2)`.
pub const OPEN_FLAGS: FlagSet = bits! {
    O_APPEND = libc::O_APPEND,
    O_ASYNC = libc::O_ASYNC,
    O_CLOEXEC = libc::O_CLOEXEC,
    O_CREAT = libc::O_CREAT,
    O_DIRECT = libc::O_DIRECT,
    O_DIRECTORY = libc::O_DIRECTORY,
    O_EXCL = libc::O_EXCL,
    O_NOATIME = libc::O_NOATIME,
    O_NOCTTY = libc::O_NOCTTY,
    O_NOFOLLOW = libc::O_NOFOLLOW,
    O_NONBLOCK = libc::O_NONBLOCK,
    O_PATH = libc::O_PATH,
    // `O_SYNC` includes the `O_DSYNC` bit, so it must be matched first.
    O_SYNC = libc::O_SYNC,
    O_DSYNC = libc::O_DSYNC,
    O_TRUNC = libc::O_TRUNC,
};

// clone

/// The exit signal mask in the low byte of `clone(2)` flags.
pub const CSIGNAL: u64 = 0xff;

pub const CLONE_FLAGS: FlagSet = bits! {
    CLONE_VM = 0x100,
    CLONE_FS = 0x200,
    CLONE_FILES = 0x400,
    CLONE_SIGHAND = 0x800,
    CLONE_PIDFD = 0x1000,
    CLONE_PTRACE = 0x2000,
    CLONE_VFORK = 0x4000,
    CLONE_PARENT = 0x8000,
    CLONE_THREAD = 0x10000,
    CLONE_NEWNS = 0x20000,
    CLONE_SYSVSEM = 0x40000,
    CLONE_SETTLS = 0x80000,
    CLONE_PARENT_SETTID = 0x100000,
    CLONE_CHILD_CLEARTID = 0x200000,
    CLONE_DETACHED = 0x400000,
    CLONE_UNTRACED = 0x800000,
    CLONE_CHILD_SETTID = 0x1000000,
    CLONE_NEWCGROUP = 0x2000000,
    CLONE_NEWUTS = 0x4000000,
    CLONE_NEWIPC = 0x8000000,
    CLONE_NEWUSER = 0x10000000,
    CLONE_NEWPID = 0x20000000,
    CLONE_NEWNET = 0x40000000,
    CLONE_IO = 0x80000000u32,
};

// socket

pub const AF_UNSPEC: u16 = 0;
pub const AF_UNIX: u16 = 1;
pub const AF_INET: u16 = 2;
pub const AF_INET6: u16 = 10;
pub const AF_NETLINK: u16 = 16;

pub const SOCKET_FAMILY: FlagSet = values! {
    AF_UNSPEC = AF_UNSPEC,
    AF_UNIX = AF_UNIX,
    AF_INET = AF_INET,
    AF_AX25 = 3,
    AF_IPX = 4,
    AF_APPLETALK = 5,
    AF_NETROM = 6,
    AF_BRIDGE = 7,
    AF_ATMPVC = 8,
    AF_X25 = 9,
    AF_INET6 = AF_INET6,
    AF_ROSE = 11,
    AF_DECnet = 12,
    AF_NETBEUI = 13,
    AF_SECURITY = 14,
    AF_KEY = 15,
    AF_NETLINK = AF_NETLINK,
    AF_PACKET = 17,
    AF_ASH = 18,
    AF_ECONET = 19,
    AF_ATMSVC = 20,
    AF_RDS = 21,
    AF_SNA = 22,
    AF_IRDA = 23,
    AF_PPPOX = 24,
    AF_WANPIPE = 25,
    AF_LLC = 26,
    AF_IB = 27,
    AF_MPLS = 28,
    AF_CAN = 29,
    AF_TIPC = 30,
    AF_BLUETOOTH = 31,
    AF_IUCV = 32,
    AF_RXRPC = 33,
    AF_ISDN = 34,
    AF_PHONET = 35,
    AF_IEEE802154 = 36,
    AF_CAIF = 37,
    AF_ALG = 38,
    AF_NFC = 39,
    AF_VSOCK = 40,
};

/// Covers the socket types below. The remaining bits of a type argument are flags.
pub const SOCK_TYPE_MASK: u64 = 0xf;

pub const SOCKET_TYPE: FlagSet = values! {
    SOCK_STREAM = 1,
    SOCK_DGRAM = 2,
    SOCK_RAW = 3,
    SOCK_RDM = 4,
    SOCK_SEQPACKET = 5,
    SOCK_DCCP = 6,
    SOCK_PACKET = 10,
};

pub const SOCKET_FLAGS: FlagSet = bits! {
    SOCK_CLOEXEC = libc::SOCK_CLOEXEC,
    SOCK_NONBLOCK = libc::SOCK_NONBLOCK,
};

const IP_PROTOCOL: FlagSet = values! {
    IPPROTO_IP = 0,
    IPPROTO_ICMP = 1,
    IPPROTO_IGMP = 2,
    IPPROTO_IPIP = 4,
    IPPROTO_TCP = 6,
    IPPROTO_EGP = 8,
    IPPROTO_PUP = 12,
    IPPROTO_UDP = 17,
    IPPROTO_IDP = 22,
    IPPROTO_TP = 29,
    IPPROTO_DCCP = 33,
    IPPROTO_IPV6 = 41,
    IPPROTO_RSVP = 46,
    IPPROTO_GRE = 47,
    IPPROTO_ESP = 50,
    IPPROTO_AH = 51,
    IPPROTO_ICMPV6 = 58,
    IPPROTO_MTP = 92,
    IPPROTO_BEETPH = 94,
    IPPROTO_ENCAP = 98,
    IPPROTO_PIM = 103,
    IPPROTO_COMP = 108,
    IPPROTO_SCTP = 132,
    IPPROTO_UDPLITE = 136,
    IPPROTO_MPLS = 137,
    IPPROTO_RAW = 255,
};

const NETLINK_PROTOCOL: FlagSet = values! {
    NETLINK_ROUTE = 0,
    NETLINK_UNUSED = 1,
    NETLINK_USERSOCK = 2,
    NETLINK_FIREWALL = 3,
    NETLINK_SOCK_DIAG = 4,
    NETLINK_NFLOG = 5,
    NETLINK_XFRM = 6,
    NETLINK_SELINUX = 7,
    NETLINK_ISCSI = 8,
    NETLINK_AUDIT = 9,
    NETLINK_FIB_LOOKUP = 10,
    NETLINK_CONNECTOR = 11,
    NETLINK_NETFILTER = 12,
    NETLINK_IP6_FW = 13,
    NETLINK_DNRTMSG = 14,
    NETLINK_KOBJECT_UEVENT = 15,
    NETLINK_GENERIC = 16,
    NETLINK_SCSITRANSPORT = 18,
    NETLINK_ECRYPTFS = 19,
    NETLINK_RDMA = 20,
    NETLINK_CRYPTO = 21,
};

/// The protocol table for a socket family, if we have one.
pub fn socket_protocols(family: i32) -> Option<FlagSet> {
    match u16::try_from(family).ok()? {
        AF_INET | AF_INET6 => Some(IP_PROTOCOL),
        AF_NETLINK => Some(NETLINK_PROTOCOL),
        _ => None,
    }
}

/// Maximum size of a `struct sockaddr`, from `uapi/linux/socket.h`.
pub const SOCKADDR_MAX: usize = 128;

/// Maximum length of the path in an `AF_UNIX` socket, from `uapi/linux/un.h`.
pub const UNIX_PATH_MAX: usize = 108;

// ptrace

pub const PTRACE_REQUEST: FlagSet = values! {
    PTRACE_TRACEME = 0,
    PTRACE_PEEKTEXT = 1,
    PTRACE_PEEKDATA = 2,
    PTRACE_PEEKUSR = 3,
    PTRACE_POKETEXT = 4,
    PTRACE_POKEDATA = 5,
    PTRACE_POKEUSR = 6,
    PTRACE_CONT = 7,
    PTRACE_KILL = 8,
    PTRACE_SINGLESTEP = 9,
    PTRACE_GETREGS = 12,
    PTRACE_SETREGS = 13,
    PTRACE_GETFPREGS = 14,
    PTRACE_SETFPREGS = 15,
    PTRACE_ATTACH = 16,
    PTRACE_DETACH = 17,
    PTRACE_GETFPXREGS = 18,
    PTRACE_SETFPXREGS = 19,
    PTRACE_OLDSETOPTIONS = 21,
    PTRACE_SYSCALL = 24,
    PTRACE_GET_THREAD_AREA = 25,
    PTRACE_SET_THREAD_AREA = 26,
    PTRACE_ARCH_PRCTL = 30,
    PTRACE_SYSEMU = 31,
    PTRACE_SYSEMU_SINGLESTEP = 32,
    PTRACE_SINGLEBLOCK = 33,
    PTRACE_SETOPTIONS = 0x4200,
    PTRACE_GETEVENTMSG = 0x4201,
    PTRACE_GETSIGINFO = 0x4202,
    PTRACE_SETSIGINFO = 0x4203,
    PTRACE_GETREGSET = 0x4204,
    PTRACE_SETREGSET = 0x4205,
    PTRACE_SEIZE = 0x4206,
    PTRACE_INTERRUPT = 0x4207,
    PTRACE_LISTEN = 0x4208,
    PTRACE_PEEKSIGINFO = 0x4209,
    PTRACE_GETSIGMASK = 0x420a,
    PTRACE_SETSIGMASK = 0x420b,
    PTRACE_SECCOMP_GET_FILTER = 0x420c,
    PTRACE_SECCOMP_GET_METADATA = 0x420d,
    PTRACE_GET_SYSCALL_INFO = 0x420e,
};

// futex

pub const FUTEX_PRIVATE_FLAG: u64 = 128;
pub const FUTEX_CLOCK_REALTIME: u64 = 256;

pub const FUTEX_CMD: FlagSet = values! {
    FUTEX_WAIT = 0,
    FUTEX_WAKE = 1,
    FUTEX_FD = 2,
    FUTEX_REQUEUE = 3,
    FUTEX_CMP_REQUEUE = 4,
    FUTEX_WAKE_OP = 5,
    FUTEX_LOCK_PI = 6,
    FUTEX_UNLOCK_PI = 7,
    FUTEX_TRYLOCK_PI = 8,
    FUTEX_WAIT_BITSET = 9,
    FUTEX_WAKE_BITSET = 10,
    FUTEX_WAIT_REQUEUE_PI = 11,
    FUTEX_CMP_REQUEUE_PI = 12,
    FUTEX_LOCK_PI2 = 13,
};

// itimer

pub const ITIMER_TYPES: FlagSet = values! {
    ITIMER_REAL = 0,
    ITIMER_VIRTUAL = 1,
    ITIMER_PROF = 2,
};

// time

/// Special `tv_nsec` values of `utimensat(2)`, from `uapi/linux/stat.h`.
pub const UTIME_NOW: i64 = (1 << 30) - 1;
pub const UTIME_OMIT: i64 = (1 << 30) - 2;

// fcntl

/// The `dirfd` value that resolves relative to the working directory.
pub const AT_FDCWD: i32 = -100;
