//! ICE candidate pairs in Sans I/O style.
//!
//! This crate holds the pieces of an ICE agent that deal with a single
//! candidate pair: the pair priority as per [RFC 8445 6.1.2.3][prio],
//! correlation of binding requests with their responses to measure the
//! round trip time, and the identifiers used to tag pairs and candidates
//! in STUN messages and candidate advertisements.
//!
//! Like the rest of str0m, nothing in here does network talking. Sending
//! from a candidate ends up as a [`Transmit`][net::Transmit] in an
//! [`Outbox`][net::Outbox] which the surrounding agent drains and writes
//! to its sockets.
//!
//! ```
//! # use std::sync::Arc;
//! # use std::time::{Duration, Instant};
//! use ice_pair::ice::{CandidatePair, IceCandidate};
//! use ice_pair::net::{Outbox, TransId};
//!
//! let outbox = Outbox::new();
//! let local = IceCandidate::host("10.0.0.1:5000".parse().unwrap(), "udp")
//!     .unwrap()
//!     .with_outbox(outbox.clone());
//! let remote = IceCandidate::host("10.0.0.2:5000".parse().unwrap(), "udp").unwrap();
//!
//! let mut pair = CandidatePair::new(Arc::new(local), Arc::new(remote), true);
//!
//! let now = Instant::now();
//! let trans_id = TransId::new();
//! pair.mark_request_sent(now, trans_id);
//! pair.transmit(b"binding request");
//!
//! assert!(outbox.poll_transmit().is_some());
//! assert!(pair.mark_response_received(now + Duration::from_millis(20), trans_id));
//! assert_eq!(pair.latency(), Duration::from_millis(20));
//! ```
//!
//! [prio]: https://www.rfc-editor.org/rfc/rfc8445#section-6.1.2.3

#![forbid(unsafe_code)]
#![allow(clippy::new_without_default)]
#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
pub use config::PairConfig;

#[path = "ice/mod.rs"]
mod ice_;

/// Candidates, candidate pairs and their identifiers.
pub mod ice {
    pub use crate::ice_::{candidate_id_from_extensions, new_candidate_id_extension};
    pub use crate::ice_::{set_candidate_id_extension, sort_by_prio};
    pub use crate::ice_::{Candidate, CandidateExtension, CandidateKind, IceCandidate};
    pub use crate::ice_::{CandidatePair, CandidatePairId, CheckState};
    pub use crate::ice_::{CANDIDATE_ID_PREFIX, EXTENSION_KEY_CANDIDATE_ID};
}

mod io;

/// Network related types to get data in/out of candidates.
pub mod net {
    pub use crate::io::{AttrType, Outbox, Protocol, StunMessage, TransId, Transmit};
    pub use crate::io::{ATTR_CANDIDATE_PAIR_ID, TRANSACTION_ID_SIZE};
}

/// Various error types.
pub mod error {
    pub use crate::ice_::IceError;
    pub use crate::io::NetError;
}

mod util;
