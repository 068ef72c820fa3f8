//! Non-blocking UDP snapshot receiver
//!
//! One datagram carries one snapshot. The receiver never blocks so the frame
//! loop can drain whatever has arrived and keep drawing.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::consts::MAX_DATAGRAM;

pub struct SnapshotReceiver {
    socket: UdpSocket,
    buf: Vec<u8>,
    received: u64,
}

impl SnapshotReceiver {
    /// Bind a non-blocking socket to `addr`
    pub fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(true)?;
        log::info!("Listening for snapshots on udp://{}", socket.local_addr()?);
        Ok(Self {
            socket,
            buf: vec![0; MAX_DATAGRAM],
            received: 0,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Next pending datagram, or `None` when nothing is waiting
    pub fn try_recv(&mut self) -> io::Result<Option<&[u8]>> {
        match self.socket.recv_from(&mut self.buf) {
            Ok((len, _from)) => {
                self.received += 1;
                Ok(Some(&self.buf[..len]))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Datagrams received since bind
    pub fn received(&self) -> u64 {
        self.received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Poll until a datagram shows up (loopback delivery is not instantaneous)
    fn recv_within(rx: &mut SnapshotReceiver, timeout: Duration) -> Option<Vec<u8>> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if let Some(bytes) = rx.try_recv().unwrap() {
                return Some(bytes.to_vec());
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        None
    }

    #[test]
    fn test_empty_socket_does_not_block() {
        let mut rx = SnapshotReceiver::bind("127.0.0.1:0").unwrap();
        assert!(rx.try_recv().unwrap().is_none());
        assert_eq!(rx.received(), 0);
    }

    #[test]
    fn test_receives_datagrams_in_order() {
        let mut rx = SnapshotReceiver::bind("127.0.0.1:0").unwrap();
        let addr = rx.local_addr().unwrap();
        let tx = UdpSocket::bind("127.0.0.1:0").unwrap();
        tx.send_to(br#"{"seq":1}"#, addr).unwrap();
        tx.send_to(br#"{"seq":2}"#, addr).unwrap();

        let first = recv_within(&mut rx, Duration::from_secs(2)).unwrap();
        let second = recv_within(&mut rx, Duration::from_secs(2)).unwrap();
        assert_eq!(first, br#"{"seq":1}"#);
        assert_eq!(second, br#"{"seq":2}"#);
        assert_eq!(rx.received(), 2);
    }
}
