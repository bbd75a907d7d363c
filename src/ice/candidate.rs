use std::borrow::Cow;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use super::extension::{candidate_id_from_extensions, set_candidate_id_extension};
use super::{CandidateExtension, IceError};
use crate::io::{Id, NetError, Outbox, Protocol, Transmit};
use crate::util::Pii;

/// Scheme in front of every candidate id.
pub const CANDIDATE_ID_PREFIX: &str = "candidate:";

/// Removes a leading [`CANDIDATE_ID_PREFIX`] if there is one.
pub(crate) fn strip_candidate_prefix(id: &str) -> &str {
    id.strip_prefix(CANDIDATE_ID_PREFIX).unwrap_or(id)
}

/// Puts [`CANDIDATE_ID_PREFIX`] in front unless it is already there.
pub(crate) fn add_candidate_prefix(id: &str) -> Cow<'_, str> {
    if id.starts_with(CANDIDATE_ID_PREFIX) {
        Cow::Borrowed(id)
    } else {
        Cow::Owned(format!("{CANDIDATE_ID_PREFIX}{id}"))
    }
}

/// What a candidate pair needs from a candidate.
///
/// Gathering decides what concrete candidates there are. [`IceCandidate`] is
/// the one provided by this crate.
pub trait Candidate: fmt::Display + fmt::Debug + Send + Sync {
    /// Priority as per RFC 8445 5.1.2.
    fn prio(&self) -> u32;

    /// Textual id, `candidate:` followed by an opaque token.
    fn id(&self) -> &str;

    /// The transport address of the candidate.
    fn addr(&self) -> SocketAddr;

    /// Whether `other` is the same candidate.
    fn equal(&self, other: &dyn Candidate) -> bool;

    /// Sends `buf` from this candidate to `remote`.
    ///
    /// Returns the number of bytes handed over for sending.
    fn write_to(&self, buf: &[u8], remote: &dyn Candidate) -> Result<usize, NetError>;
}

/// Type of candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// Host (local network interface)
    Host,
    /// Prflx (Peer reflexive)
    PeerReflexive,
    /// Srflx (STUN)
    ServerReflexive,
    /// Relay (TURN)
    Relayed,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            CandidateKind::Host => "host",
            CandidateKind::PeerReflexive => "prflx",
            CandidateKind::ServerReflexive => "srflx",
            CandidateKind::Relayed => "relay",
        };
        write!(f, "{x}")
    }
}

/// An ICE candidate, local or remote.
///
/// Local candidates are given an [`Outbox`] to send through. Remote
/// candidates only describe where to send to.
#[derive(Clone)]
pub struct IceCandidate {
    /// Full id including the `candidate:` prefix.
    id: String,

    kind: CandidateKind,

    proto: Protocol,

    /// For remote, this is communicated, and locally it's calculated.
    prio: Option<u32>,

    addr: SocketAddr,

    /// Extensions from or for the candidate advertisement, in order.
    extensions: Vec<CandidateExtension>,

    outbox: Option<Outbox>,
}

impl IceCandidate {
    /// Creates a local candidate with a random id.
    pub fn new(
        kind: CandidateKind,
        addr: SocketAddr,
        proto: impl TryInto<Protocol>,
    ) -> Result<Self, IceError> {
        if !is_valid_ip(addr.ip()) {
            return Err(IceError::BadCandidate(format!("invalid ip {}", addr.ip())));
        }

        Ok(IceCandidate {
            id: format!("{CANDIDATE_ID_PREFIX}{}", Id::<16>::random()),
            kind,
            proto: parse_proto(proto)?,
            prio: None,
            addr,
            extensions: vec![],
            outbox: None,
        })
    }

    /// Creates a host candidate.
    ///
    /// Host candidates are local sockets directly on the host.
    pub fn host(addr: SocketAddr, proto: impl TryInto<Protocol>) -> Result<Self, IceError> {
        Self::new(CandidateKind::Host, addr, proto)
    }

    /// Creates a candidate learned from the remote peer.
    ///
    /// `id` may be given with or without the `candidate:` prefix.
    pub fn remote(
        id: &str,
        kind: CandidateKind,
        addr: SocketAddr,
        proto: impl TryInto<Protocol>,
        prio: u32,
    ) -> Result<Self, IceError> {
        let mut c = Self::new(kind, addr, proto)?;
        c.set_id(id)?;
        c.prio = Some(prio);
        Ok(c)
    }

    /// Replace the random id.
    pub fn with_id(mut self, id: &str) -> Result<Self, IceError> {
        self.set_id(id)?;
        Ok(self)
    }

    /// Use a fixed priority instead of calculating one.
    pub fn with_prio(mut self, prio: u32) -> Self {
        self.prio = Some(prio);
        self
    }

    /// Send through this outbox.
    pub fn with_outbox(mut self, outbox: Outbox) -> Self {
        self.outbox = Some(outbox);
        self
    }

    /// Attach advertisement extensions.
    pub fn with_extensions(mut self, extensions: Vec<CandidateExtension>) -> Self {
        self.extensions = extensions;
        self
    }

    fn set_id(&mut self, id: &str) -> Result<(), IceError> {
        let token = strip_candidate_prefix(id);
        if token.is_empty() {
            return Err(IceError::BadCandidate("empty candidate id".into()));
        }
        self.id = format!("{CANDIDATE_ID_PREFIX}{token}");
        Ok(())
    }

    /// Returns the kind of this candidate.
    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    /// Returns the transport protocol of the candidate.
    pub fn proto(&self) -> Protocol {
        self.proto
    }

    /// Extensions of the candidate advertisement.
    pub fn extensions(&self) -> &[CandidateExtension] {
        &self.extensions
    }

    /// The candidate id carried in the `cid` extension, or an empty string.
    pub fn candidate_id_extension(&self) -> String {
        candidate_id_from_extensions(&self.extensions)
    }

    /// Tag the advertisement with this candidate's own id.
    pub fn set_candidate_id_extension(&mut self) {
        set_candidate_id_extension(&mut self.extensions, &self.id);
    }

    fn local_preference(&self) -> u32 {
        if self.addr.is_ipv6() {
            65_535
        } else {
            65_534
        }
    }
}

impl Candidate for IceCandidate {
    fn prio(&self) -> u32 {
        // Remote candidates have their prio calculated on their side.
        if let Some(prio) = self.prio {
            return prio;
        }

        // Per RFC5245 Sec. 4.1.2.1, the RECOMMENDED values for type preferences are
        // 126 for host candidates, 110 for peer-reflexive candidates, 100 for
        // server-reflexive candidates, and 0 for relayed candidates.
        let type_preference = match (self.kind, self.proto) {
            (CandidateKind::Host, Protocol::Udp) => 126,
            (CandidateKind::PeerReflexive, Protocol::Udp) => 110,
            (CandidateKind::ServerReflexive, _) => 100,
            (CandidateKind::Host, _) => 90,
            (CandidateKind::PeerReflexive, _) => 80,
            (CandidateKind::Relayed, Protocol::Udp) => 2,
            (CandidateKind::Relayed, Protocol::Tcp) => 1,
            (CandidateKind::Relayed, _) => 0,
        };

        // priority = (2^24)*(type preference) +
        //     (2^8)*(local preference) +
        //     (2^0)*(256 - component ID)
        //
        // Component id is always 1.
        type_preference << 24 | self.local_preference() << 8 | 255
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn equal(&self, other: &dyn Candidate) -> bool {
        self.id == other.id() && self.addr == other.addr()
    }

    fn write_to(&self, buf: &[u8], remote: &dyn Candidate) -> Result<usize, NetError> {
        let Some(outbox) = &self.outbox else {
            return Err(NetError::NotSendable(self.id.clone()));
        };

        outbox.push(Transmit {
            proto: self.proto,
            source: self.addr,
            destination: remote.addr(),
            contents: buf.to_vec(),
        })
    }
}

impl PartialEq for IceCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for IceCandidate {}

impl fmt::Debug for IceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Candidate({}={}/{}", self.kind, self.addr, self.proto)?;
        write!(f, " prio={}", self.prio())?;
        if self.outbox.is_some() {
            write!(f, " local")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for IceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} typ {}",
            self.id,
            self.proto,
            Pii(self.addr),
            self.kind
        )
    }
}

fn parse_proto(proto: impl TryInto<Protocol>) -> Result<Protocol, IceError> {
    proto
        .try_into()
        .map_err(|_| IceError::BadCandidate("invalid protocol".into()))
}

fn is_valid_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v) => {
            !v.is_link_local() && !v.is_broadcast() && !v.is_multicast() && !v.is_unspecified()
        }
        IpAddr::V6(v) => !v.is_multicast() && !v.is_unspecified(),
    }
}
