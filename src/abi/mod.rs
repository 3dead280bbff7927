//! Symbolic rendering of ABI constants: enumerated values and bitmasks.

pub mod linux;

pub use linux::*;

/// One entry of a [`FlagSet`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flag {
    /// Matches only when the whole (remaining) value equals `value`.
    Value { value: u64, name: &'static str },

    /// Matches when every bit of `value` is set.
    Bit { value: u64, name: &'static str },
}

/// An ordered table of named values and bits.
#[derive(Clone, Copy, Debug)]
pub struct FlagSet(pub &'static [Flag]);

impl FlagSet {
    /// Render `val` as `NAME|NAME|0xrest`.
    ///
    /// Matched bits are consumed in table order. Unmatched bits are appended in hex. A zero
    /// value that no entry names renders as `0x0`.
    pub fn parse(&self, val: u64) -> String {
        let mut names = vec![];
        let mut rest = val;

        for flag in self.0 {
            match *flag {
                Flag::Value { value, name } => {
                    if rest == value {
                        names.push(name.to_owned());
                        rest = 0;
                        break;
                    }
                },
                Flag::Bit { value, name } => {
                    if value != 0 && rest & value == value {
                        names.push(name.to_owned());
                        rest &= !value;
                    }
                },
            }
        }

        if rest != 0 {
            names.push(format!("{rest:#x}"));
        }

        if names.is_empty() {
            return "0x0".into();
        }

        names.join("|")
    }
}

/// Render `open(2)` flags: the access mode, then any other flags.
pub fn open_flags(val: u64) -> String {
    let accmode = O_ACCMODE as u64;
    let mut s = OPEN_MODE.parse(val & accmode);

    let flags = val & !accmode;
    if flags != 0 {
        s.push('|');
        s.push_str(&OPEN_FLAGS.parse(flags));
    }

    s
}

/// Render a `clone(2)` flags word, naming the exit signal in its low byte.
pub fn clone_flags(val: u64) -> String {
    let signo = (val & CSIGNAL) as i32;
    let flags = val & !CSIGNAL;

    let mut parts = vec![];

    if flags != 0 {
        parts.push(CLONE_FLAGS.parse(flags));
    }

    if signo != 0 {
        parts.push(signal_name(signo));
    }

    if parts.is_empty() {
        return "0".into();
    }

    parts.join("|")
}

/// Render a `futex(2)` operation with its modifier flags.
pub fn futex_op(op: u64) -> String {
    let modifiers = FUTEX_PRIVATE_FLAG | FUTEX_CLOCK_REALTIME;
    let mut s = FUTEX_CMD.parse(op & !modifiers);

    if op & FUTEX_CLOCK_REALTIME != 0 {
        s.push_str("|FUTEX_CLOCK_REALTIME");
    }

    if op & FUTEX_PRIVATE_FLAG != 0 {
        s.push_str("|FUTEX_PRIVATE_FLAG");
    }

    s
}

/// Render a `socket(2)` type argument, which carries flags above the type mask.
pub fn sock_type(stype: i32) -> String {
    let stype = stype as u32 as u64;
    let mut s = SOCKET_TYPE.parse(stype & SOCK_TYPE_MASK);

    let flags = stype & !SOCK_TYPE_MASK;
    if flags != 0 {
        s.push('|');
        s.push_str(&SOCKET_FLAGS.parse(flags));
    }

    s
}

/// Render a `socket(2)` protocol, which is only meaningful relative to its family.
pub fn sock_protocol(family: i32, protocol: i32) -> String {
    match socket_protocols(family) {
        Some(protocols) => protocols.parse(protocol as u32 as u64),
        None => format!("{protocol:#x}"),
    }
}

/// Render `accept4(2)`-style socket flags.
pub fn sock_flags(flags: i32) -> String {
    if flags == 0 {
        return "0".into();
    }

    SOCKET_FLAGS.parse(flags as u32 as u64)
}

/// Name a signal number, falling back to its decimal value.
pub fn signal_name(signo: i32) -> String {
    use std::convert::TryFrom;

    match nix::sys::signal::Signal::try_from(signo) {
        Ok(signal) => signal.as_str().to_owned(),
        Err(_) => format!("{signo}"),
    }
}

/// Render permission bits the way `ls -l` does, e.g. `-rw-r--r--`.
pub fn file_mode(mode: u32) -> String {
    const RWX: &[(u32, char)] = &[
        (0o400, 'r'), (0o200, 'w'), (0o100, 'x'),
        (0o040, 'r'), (0o020, 'w'), (0o010, 'x'),
        (0o004, 'r'), (0o002, 'w'), (0o001, 'x'),
    ];

    let kind = match mode & (libc::S_IFMT as u32) {
        m if m == libc::S_IFDIR as u32 => 'd',
        m if m == libc::S_IFLNK as u32 => 'L',
        m if m == libc::S_IFIFO as u32 => 'p',
        m if m == libc::S_IFSOCK as u32 => 'S',
        m if m == libc::S_IFCHR as u32 => 'c',
        m if m == libc::S_IFBLK as u32 => 'D',
        _ => '-',
    };

    let mut s = String::with_capacity(10);
    s.push(kind);

    for &(bit, c) in RWX {
        s.push(if mode & bit != 0 { c } else { '-' });
    }

    s
}
