#![allow(unused)]

use std::net::SocketAddr;
use std::sync::{Arc, Once};

use ice_pair::ice::{Candidate, IceCandidate};
use ice_pair::net::Outbox;
use tracing::{info_span, Span};

pub enum Peer {
    Left,
    Right,
}

impl Peer {
    /// Create a tracing span for this peer.
    pub fn span(&self) -> Span {
        match self {
            Peer::Left => info_span!("L"),
            Peer::Right => info_span!("R"),
        }
    }
}

pub fn init_log() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    static START: Once = Once::new();

    START.call_once(|| {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(env_filter)
            .init();
    });
}

pub fn sock(s: impl Into<String>) -> SocketAddr {
    let s: String = s.into();
    s.parse().unwrap()
}

/// Local host candidate sending into `outbox`.
pub fn local_host(s: &str, id: &str, outbox: &Outbox) -> Arc<dyn Candidate> {
    let c = IceCandidate::host(sock(s), "udp")
        .unwrap()
        .with_id(id)
        .unwrap()
        .with_outbox(outbox.clone());
    Arc::new(c)
}

/// Remote candidate as learned from an advertisement.
pub fn remote_host(s: &str, id: &str, prio: u32) -> Arc<dyn Candidate> {
    let c = IceCandidate::remote(id, ice_pair::ice::CandidateKind::Host, sock(s), "udp", prio)
        .unwrap();
    Arc::new(c)
}
