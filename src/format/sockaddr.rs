//! Decoding `struct sockaddr` byte images.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};

use memoffset::offset_of;

use crate::abi::{AF_INET, AF_INET6, AF_UNIX, SOCKET_FAMILY, UNIX_PATH_MAX};
use crate::error::{Error, Result};

/// The address of an `AF_UNIX` socket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UnixAddr {
    /// No path: an unbound socket, or one from `socketpair(2)`.
    Unnamed,

    /// A filesystem socket.
    Path(Vec<u8>),

    /// An abstract-namespace socket. The name excludes the leading NUL.
    Abstract(Vec<u8>),
}

/// A decoded socket address.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SockAddr {
    Unix(UnixAddr),
    Inet(SocketAddrV4),
    Inet6(SocketAddrV6),

    /// A family we recognize but do not decode.
    Other { family: u16 },
}

fn field<const N: usize>(data: &[u8], offset: usize, family: &str) -> Result<[u8; N]> {
    data.get(offset..offset + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| {
            Error::Decode(format!(
                "{family} address truncated: {} bytes, need {}",
                data.len(),
                offset + N,
            ))
        })
}

/// Decode a sockaddr from the first `data.len()` bytes the tracee passed.
///
/// The family is in native byte order. Ports, addresses, and flow info are in network order.
pub fn decode_sockaddr(data: &[u8]) -> Result<SockAddr> {
    let family = u16::from_ne_bytes(field(data, 0, "sockaddr")?);

    match family {
        AF_INET => {
            let port = field(data, offset_of!(libc::sockaddr_in, sin_port), "AF_INET")?;
            let addr: [u8; 4] = field(data, offset_of!(libc::sockaddr_in, sin_addr), "AF_INET")?;

            Ok(SockAddr::Inet(SocketAddrV4::new(
                Ipv4Addr::from(addr),
                u16::from_be_bytes(port),
            )))
        },
        AF_INET6 => {
            let port = field(data, offset_of!(libc::sockaddr_in6, sin6_port), "AF_INET6")?;
            let flowinfo = field(data, offset_of!(libc::sockaddr_in6, sin6_flowinfo), "AF_INET6")?;
            let addr: [u8; 16] = field(data, offset_of!(libc::sockaddr_in6, sin6_addr), "AF_INET6")?;
            let scope_id = field(data, offset_of!(libc::sockaddr_in6, sin6_scope_id), "AF_INET6")?;

            Ok(SockAddr::Inet6(SocketAddrV6::new(
                Ipv6Addr::from(addr),
                u16::from_be_bytes(port),
                u32::from_be_bytes(flowinfo),
                u32::from_ne_bytes(scope_id),
            )))
        },
        AF_UNIX => {
            let start = offset_of!(libc::sockaddr_un, sun_path);
            let path = data.get(start..).unwrap_or_default();

            if path.len() > UNIX_PATH_MAX {
                return Err(Error::Decode(format!(
                    "AF_UNIX path too long: {} bytes, maximum {}",
                    path.len(),
                    UNIX_PATH_MAX,
                )));
            }

            let addr = match path.split_first() {
                None => UnixAddr::Unnamed,
                Some((0, name)) if !name.is_empty() => UnixAddr::Abstract(name.to_vec()),
                Some((0, _)) => UnixAddr::Unnamed,
                Some(_) => {
                    let end = path.iter().position(|&b| b == 0).unwrap_or(path.len());
                    UnixAddr::Path(path[..end].to_vec())
                },
            };

            Ok(SockAddr::Unix(addr))
        },
        family => Ok(SockAddr::Other { family }),
    }
}

impl fmt::Display for SockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SockAddr::Unix(UnixAddr::Unnamed) => write!(f, "AF_UNIX \"\""),
            SockAddr::Unix(UnixAddr::Path(path)) => {
                write!(f, "AF_UNIX \"{}\"", path.escape_ascii())
            },
            SockAddr::Unix(UnixAddr::Abstract(name)) => {
                write!(f, "AF_UNIX \"@{}\"", name.escape_ascii())
            },
            SockAddr::Inet(addr) => write!(f, "AF_INET {addr}"),
            SockAddr::Inet6(addr) => write!(f, "AF_INET6 {addr}"),
            SockAddr::Other { family } => {
                write!(f, "{} (undecoded)", SOCKET_FAMILY.parse(*family as u64))
            },
        }
    }
}
