use std::ffi::CString;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, trace};

use crate::error::{Result, TransportError};
use crate::ethernet::{MacAddr, ETHERTYPE_LLDP, ETH_HEADER_SIZE, LLDP_MULTICAST, MAX_ETH_PAYLOAD};
use crate::traits::PortTransmitter;

/// `sll_pkttype` of a frame sent by this host.
const PACKET_OUTGOING: u8 = libc::PACKET_OUTGOING as u8;

/// Linux `AF_PACKET` socket bound to one interface, filtered on EtherType 0x88CC.
///
/// Opening requires `CAP_NET_RAW`. The socket joins the LLDP multicast group
/// so frames addressed to the nearest bridge reach it without promiscuous mode.
#[derive(Debug)]
pub struct PacketSocket {
    fd: OwnedFd,
    interface: String,
    mac: MacAddr,
}

impl PacketSocket {
    /// Open and bind a packet socket on `interface`.
    pub fn open(interface: &str) -> Result<Self> {
        let name = CString::new(interface)
            .map_err(|_| TransportError::InterfaceNotFound(interface.to_string()))?;
        // SAFETY: `name` is a valid NUL-terminated string for the duration of the call.
        let ifindex = unsafe { libc::if_nametoindex(name.as_ptr()) };
        if ifindex == 0 {
            return Err(TransportError::InterfaceNotFound(interface.to_string()));
        }

        let protocol = ETHERTYPE_LLDP.to_be();
        // SAFETY: socket(2) takes no pointers; the result is checked below.
        let raw = unsafe {
            libc::socket(
                libc::AF_PACKET,
                libc::SOCK_RAW | libc::SOCK_CLOEXEC,
                libc::c_int::from(protocol),
            )
        };
        if raw < 0 {
            return Err(open_error(interface, io::Error::last_os_error()));
        }
        // SAFETY: `raw` is a freshly created descriptor not owned by anything else.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };

        // SAFETY: sockaddr_ll is plain old data; all-zero is a valid value.
        let mut addr: libc::sockaddr_ll = unsafe { std::mem::zeroed() };
        addr.sll_family = libc::AF_PACKET as libc::c_ushort;
        addr.sll_protocol = protocol;
        addr.sll_ifindex = ifindex as libc::c_int;
        // SAFETY: `addr` is a valid sockaddr_ll and the length matches its size.
        let rc = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                (&addr as *const libc::sockaddr_ll).cast::<libc::sockaddr>(),
                std::mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(open_error(interface, io::Error::last_os_error()));
        }

        // SAFETY: packet_mreq is plain old data; all-zero is a valid value.
        let mut mreq: libc::packet_mreq = unsafe { std::mem::zeroed() };
        mreq.mr_ifindex = ifindex as libc::c_int;
        mreq.mr_type = libc::PACKET_MR_MULTICAST as libc::c_ushort;
        mreq.mr_alen = 6;
        mreq.mr_address[..6].copy_from_slice(&LLDP_MULTICAST.0);
        set_option(&fd, libc::SOL_PACKET, libc::PACKET_ADD_MEMBERSHIP, &mreq)
            .map_err(|err| open_error(interface, err))?;

        let mac = interface_mac(interface)?;
        info!(interface, ifindex, %mac, "opened packet socket");

        Ok(Self {
            fd,
            interface: interface.to_string(),
            mac,
        })
    }

    /// Send one complete Ethernet frame.
    pub fn send(&self, frame: &[u8]) -> Result<()> {
        let max = ETH_HEADER_SIZE + MAX_ETH_PAYLOAD;
        if frame.len() > max {
            return Err(TransportError::FrameTooLarge {
                len: frame.len(),
                max,
            });
        }
        // SAFETY: the pointer/length pair describes the live `frame` slice.
        let sent = unsafe {
            libc::send(
                self.fd.as_raw_fd(),
                frame.as_ptr().cast::<libc::c_void>(),
                frame.len(),
                0,
            )
        };
        if sent < 0 {
            return Err(TransportError::Io(io::Error::last_os_error()));
        }
        debug!(interface = %self.interface, len = sent, "sent frame");
        Ok(())
    }

    /// Receive one frame into `buf`.
    ///
    /// Returns `Ok(None)` when the read timeout elapses without a frame.
    /// Frames this host sent itself are skipped: the kernel hands outgoing
    /// frames to every packet socket bound to the interface.
    pub fn recv(&self, buf: &mut [u8]) -> Result<Option<usize>> {
        loop {
            // SAFETY: sockaddr_ll is plain old data; all-zero is a valid value.
            let mut from: libc::sockaddr_ll = unsafe { std::mem::zeroed() };
            let mut from_len = std::mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t;
            // SAFETY: `buf` is live and writable for its length, `from` is a
            // sockaddr_ll and `from_len` holds its exact size.
            let read = unsafe {
                libc::recvfrom(
                    self.fd.as_raw_fd(),
                    buf.as_mut_ptr().cast::<libc::c_void>(),
                    buf.len(),
                    0,
                    (&mut from as *mut libc::sockaddr_ll).cast::<libc::sockaddr>(),
                    &mut from_len,
                )
            };
            if read >= 0 {
                let len = read as usize;
                let frame = &buf[..len.min(buf.len())];
                if is_looped_back(from.sll_pkttype, frame, self.mac) {
                    trace!(interface = %self.interface, len, "skipped own frame");
                    continue;
                }
                return Ok(Some(len));
            }
            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => return Ok(None),
                _ => return Err(TransportError::Io(err)),
            }
        }
    }

    /// Bound the time [`PacketSocket::recv`] waits for a frame.
    pub fn set_read_timeout(&self, timeout: Duration) -> Result<()> {
        let tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };
        set_option(&self.fd, libc::SOL_SOCKET, libc::SO_RCVTIMEO, &tv).map_err(TransportError::Io)
    }

    /// Interface this socket is bound to.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Hardware address of the bound interface.
    pub fn mac(&self) -> MacAddr {
        self.mac
    }
}

/// Maps local port `n` to the `n`-th packet socket.
#[derive(Debug, Default)]
pub struct InterfaceTransmitter {
    sockets: Vec<Arc<PacketSocket>>,
}

impl InterfaceTransmitter {
    /// Sockets in local port order (port 1 first).
    pub fn new(sockets: Vec<Arc<PacketSocket>>) -> Self {
        Self { sockets }
    }

    /// Socket serving local port `port`.
    pub fn socket(&self, port: u16) -> Option<&Arc<PacketSocket>> {
        usize::from(port)
            .checked_sub(1)
            .and_then(|index| self.sockets.get(index))
    }
}

impl PortTransmitter for InterfaceTransmitter {
    fn transmit(&self, port: u16, frame: Bytes) -> Result<()> {
        let socket = self.socket(port).ok_or(TransportError::NoSuchPort(port))?;
        socket.send(&frame)
    }
}

/// True for a frame the host transmitted: tagged outgoing by the kernel, or
/// carrying the interface's own source MAC.
fn is_looped_back(pkttype: u8, frame: &[u8], own: MacAddr) -> bool {
    if pkttype == PACKET_OUTGOING {
        return true;
    }
    frame
        .get(6..12)
        .and_then(MacAddr::from_slice)
        .is_some_and(|source| source == own)
}

fn set_option<T>(
    fd: &OwnedFd,
    level: libc::c_int,
    name: libc::c_int,
    value: &T,
) -> io::Result<()> {
    // SAFETY: `value` points to a live `T` and the length passed is its exact size.
    let rc = unsafe {
        libc::setsockopt(
            fd.as_raw_fd(),
            level,
            name,
            (value as *const T).cast::<libc::c_void>(),
            std::mem::size_of::<T>() as libc::socklen_t,
        )
    };
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

fn interface_mac(interface: &str) -> Result<MacAddr> {
    let path = format!("/sys/class/net/{interface}/address");
    let text = std::fs::read_to_string(&path).map_err(|err| open_error(interface, err))?;
    text.trim().parse()
}

fn open_error(interface: &str, source: io::Error) -> TransportError {
    TransportError::Open {
        interface: interface.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_interface_is_reported() {
        let err = PacketSocket::open("pnlldp-no-such-if0").unwrap_err();
        assert!(matches!(
            err,
            TransportError::InterfaceNotFound(name) if name == "pnlldp-no-such-if0"
        ));
    }

    #[test]
    fn interior_nul_is_not_an_interface() {
        assert!(matches!(
            PacketSocket::open("eth\0"),
            Err(TransportError::InterfaceNotFound(_))
        ));
    }

    #[test]
    fn own_frames_are_recognized() {
        let own = MacAddr([0x02, 0, 0, 0, 0, 0x01]);
        let mut frame = vec![0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E];
        frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 0x02]);
        frame.extend_from_slice(&[0x88, 0xCC, 0x02, 0x04]);

        let host = libc::PACKET_HOST as u8;
        let multicast = libc::PACKET_MULTICAST as u8;
        assert!(!is_looped_back(multicast, &frame, own));
        assert!(!is_looped_back(host, &frame, own));
        assert!(is_looped_back(PACKET_OUTGOING, &frame, own));

        frame[6..12].copy_from_slice(&own.0);
        assert!(is_looped_back(multicast, &frame, own));
        assert!(!is_looped_back(multicast, &frame[..8], own));
    }

    #[test]
    fn empty_interface_transmitter_has_no_ports() {
        let tx = InterfaceTransmitter::default();
        assert!(tx.socket(0).is_none());
        assert!(tx.socket(1).is_none());
        assert!(matches!(
            tx.transmit(1, Bytes::new()),
            Err(TransportError::NoSuchPort(1))
        ));
    }
}
