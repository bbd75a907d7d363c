use std::collections::VecDeque;
use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

mod stun;
pub use stun::{AttrType, StunMessage, TransId};
pub use stun::{ATTR_CANDIDATE_PAIR_ID, TRANSACTION_ID_SIZE};

mod id;
pub(crate) use id::Id;

mod error;
pub use self::error::NetError;

/// Type of protocol used in [`Transmit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// UDP
    Udp,
    /// TCP (See RFC 4571 for framing)
    Tcp,
    /// TCP with fixed SSL Hello Exchange
    SslTcp,
    /// TLS (only used via relay)
    Tls,
}

impl Protocol {
    /// Returns the protocol as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Udp => "udp",
            Protocol::Tcp => "tcp",
            Protocol::SslTcp => "ssltcp",
            Protocol::Tls => "tls",
        }
    }
}

impl TryFrom<&str> for Protocol {
    type Error = ();

    fn try_from(proto: &str) -> Result<Self, Self::Error> {
        let proto = proto.to_lowercase();
        match proto.as_str() {
            "udp" => Ok(Protocol::Udp),
            "tcp" => Ok(Protocol::Tcp),
            "ssltcp" => Ok(Protocol::SslTcp),
            "tls" => Ok(Protocol::Tls),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instruction to send an outgoing packet.
#[derive(Clone, Serialize, Deserialize)]
pub struct Transmit {
    /// Protocol the transmission should use.
    pub proto: Protocol,

    /// The source IP this packet should be sent from.
    ///
    /// For ICE it's important to send outgoing packets from the correct IP address.
    /// Features like hole-punching will only work if the packets are routed
    /// through the correct interfaces.
    pub source: SocketAddr,

    /// The destination address this datagram should be sent to.
    pub destination: SocketAddr,

    /// Contents of the datagram.
    pub contents: Vec<u8>,
}

impl fmt::Debug for Transmit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transmit")
            .field("proto", &self.proto)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("contents_len", &self.contents.len())
            .finish()
    }
}

/// Queue of outgoing [`Transmit`] shared between local candidates and the
/// code owning the sockets.
///
/// Cloning gives another handle to the same queue.
#[derive(Debug, Clone)]
pub struct Outbox {
    queue: Arc<Mutex<VecDeque<Transmit>>>,
    capacity: Option<usize>,
}

impl Outbox {
    /// Creates an unbounded outbox.
    pub fn new() -> Self {
        Outbox {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            capacity: None,
        }
    }

    /// Creates an outbox refusing more than `capacity` queued transmits.
    pub fn with_capacity(capacity: usize) -> Self {
        Outbox {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            capacity: Some(capacity),
        }
    }

    /// Enqueue a transmit.
    pub fn push(&self, t: Transmit) -> Result<usize, NetError> {
        let mut queue = self.lock();
        if let Some(capacity) = self.capacity {
            if queue.len() >= capacity {
                return Err(NetError::OutboxFull(queue.len()));
            }
        }
        let len = t.contents.len();
        queue.push_back(t);
        Ok(len)
    }

    /// Oldest queued transmit, if any.
    pub fn poll_transmit(&self) -> Option<Transmit> {
        self.lock().pop_front()
    }

    /// Number of queued transmits.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Transmit>> {
        // A panic while holding the lock can't leave the queue half-updated.
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}
