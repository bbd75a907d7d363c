use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{Candidate, CandidatePairId};
use crate::io::{NetError, TransId};

/// A pair of candidates, local and remote, in the ice agent.
///
/// The candidates are shared with other pairs and never changed by the pair.
/// Two pairs are equal when they pair the same candidates, regardless of
/// check state.
#[derive(Debug, Clone)]
pub struct CandidatePair {
    local: Arc<dyn Candidate>,

    remote: Arc<dyn Candidate>,

    /// If the local side is controlling. Can change during a session, the
    /// priority is always recalculated from it.
    controlling: bool,

    /// Current state of this pair. Start in Waiting (there is
    /// no frozen state since there is only one data stream).
    state: CheckState,

    /// Nominated for sending data.
    nominated: bool,

    /// Nominate as soon as a binding request succeeds.
    nominate_on_success: bool,

    /// When the last binding request was sent.
    last_request_sent: Option<Instant>,

    /// Transaction of the last binding request. Only a response to this
    /// exact transaction measures latency.
    last_request_trans_id: TransId,

    binding_request_count: u16,

    /// Zero until measured.
    latency: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// State of the connectivity checks of a pair.
pub enum CheckState {
    /// A check has not been sent for this pair.
    #[default]
    Waiting,

    /// A check has been sent for this pair, but the
    /// transaction is in progress.
    InProgress,

    /// A check has been sent for this pair, and it produced a
    /// successful result.
    Succeeded,

    /// A check has been sent for this pair, and it failed (a
    /// response to the check was never received, or a failure response
    /// was received).
    Failed,
}

impl CandidatePair {
    /// Pairs `local` with `remote` for an agent in the given role.
    pub fn new(local: Arc<dyn Candidate>, remote: Arc<dyn Candidate>, controlling: bool) -> Self {
        CandidatePair {
            local,
            remote,
            controlling,
            state: CheckState::Waiting,
            nominated: false,
            nominate_on_success: false,
            last_request_sent: None,
            last_request_trans_id: TransId::default(),
            binding_request_count: 0,
            latency: Duration::ZERO,
        }
    }

    /// RFC 8445 6.1.2.3. Computing Pair Priority and Ordering Pairs
    ///
    /// Let G be the priority for the candidate provided by the controlling
    /// agent. Let D be the priority for the candidate provided by the
    /// controlled agent.
    ///
    /// ```text
    /// pair priority = 2^32*MIN(G,D) + 2*MAX(G,D) + (G>D?1:0)
    /// ```
    ///
    /// 2^32 is lowered to 2^32-1 to keep G = D = 2^32-1 within a `u64`.
    pub fn calculate_prio(controlling: bool, local_prio: u32, remote_prio: u32) -> u64 {
        let (g, d) = if controlling {
            (local_prio as u64, remote_prio as u64)
        } else {
            (remote_prio as u64, local_prio as u64)
        };

        (u32::MAX as u64) * g.min(d) + 2 * g.max(d) + u64::from(g > d)
    }

    /// Priority of the pair for the current role.
    pub fn prio(&self) -> u64 {
        Self::calculate_prio(self.controlling, self.local.prio(), self.remote.prio())
    }

    /// The local candidate.
    pub fn local(&self) -> &Arc<dyn Candidate> {
        &self.local
    }

    /// The remote candidate.
    pub fn remote(&self) -> &Arc<dyn Candidate> {
        &self.remote
    }

    /// Id to send in the [`ATTR_CANDIDATE_PAIR_ID`][crate::net::ATTR_CANDIDATE_PAIR_ID]
    /// attribute.
    pub fn id(&self) -> CandidatePairId {
        CandidatePairId::new(&*self.local, &*self.remote)
    }

    /// Whether the local side is controlling.
    pub fn controlling(&self) -> bool {
        self.controlling
    }

    /// Change role, for instance after a role conflict.
    pub fn set_controlling(&mut self, controlling: bool) {
        self.controlling = controlling;
    }

    /// Current check state.
    pub fn state(&self) -> CheckState {
        self.state
    }

    /// Set the check state.
    pub fn set_state(&mut self, state: CheckState) {
        if self.state != state {
            trace!("Pair state {:?} -> {:?}: {}", self.state, state, self);
            self.state = state;
        }
    }

    /// Whether this pair is nominated.
    pub fn nominated(&self) -> bool {
        self.nominated
    }

    /// Set nominated.
    pub fn set_nominated(&mut self, nominated: bool) {
        if self.nominated != nominated {
            trace!("Pair nominated {}: {}", nominated, self);
            self.nominated = nominated;
        }
    }

    /// Whether this pair should be nominated when a binding request succeeds.
    pub fn nominate_on_success(&self) -> bool {
        self.nominate_on_success
    }

    /// Set nominate on binding success.
    pub fn set_nominate_on_success(&mut self, v: bool) {
        self.nominate_on_success = v;
    }

    /// Number of binding requests marked as sent.
    pub fn binding_request_count(&self) -> u16 {
        self.binding_request_count
    }

    /// Writes `buf` from the local to the remote candidate.
    pub fn write(&self, buf: &[u8]) -> Result<usize, NetError> {
        self.local.write_to(buf, &*self.remote)
    }

    /// Fire and forget `buf` from the local to the remote candidate.
    ///
    /// Failures are only logged, the pair state is left for the agent to
    /// deal with.
    pub fn transmit(&self, buf: &[u8]) {
        if let Err(e) = self.write(buf) {
            trace!("Failed to send STUN message: {}", e);
        }
    }

    /// Record a binding request sent at `now`.
    ///
    /// Replaces any earlier request. A response to an earlier request can
    /// no longer be matched.
    pub fn mark_request_sent(&mut self, now: Instant, trans_id: TransId) {
        self.last_request_sent = Some(now);
        self.last_request_trans_id = trans_id;
        self.binding_request_count = self.binding_request_count.saturating_add(1);
    }

    /// Match a binding response against the last request.
    ///
    /// On a match the latency is updated and `true` returned. Anything else
    /// leaves the pair untouched.
    pub fn mark_response_received(&mut self, now: Instant, trans_id: TransId) -> bool {
        let Some(sent) = self.last_request_sent else {
            return false;
        };

        if trans_id != self.last_request_trans_id {
            return false;
        }

        self.latency = now.saturating_duration_since(sent);
        true
    }

    /// Round trip time of the last matched binding request, zero if none.
    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl PartialEq for CandidatePair {
    fn eq(&self, other: &Self) -> bool {
        self.local.equal(&*other.local) && self.remote.equal(&*other.remote)
    }
}

impl fmt::Display for CandidatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prio {} (local, prio {}) {} <-> {} (remote, prio {}), \
            state: {:?}, nominated: {}, nominate_on_success: {}",
            self.prio(),
            self.local.prio(),
            self.local,
            self.remote,
            self.remote.prio(),
            self.state,
            self.nominated,
            self.nominate_on_success
        )
    }
}

/// Orders pairs by priority, highest first.
///
/// Pairs of equal priority keep their relative order.
pub fn sort_by_prio(pairs: &mut [CandidatePair]) {
    pairs.sort_by_key(|p| Reverse(p.prio()));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ice::IceCandidate;
    use crate::io::{Outbox, TRANSACTION_ID_SIZE};
    use std::io;
    use std::net::SocketAddr;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct LogBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` with trace logging into a buffer and returns what was logged.
    fn logged(f: impl FnOnce()) -> String {
        let buf = LogBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn cand(id: &str, port: u16, prio: u32) -> Arc<dyn Candidate> {
        let addr = format!("1.2.3.4:{port}").parse().unwrap();
        let c = IceCandidate::host(addr, "udp")
            .unwrap()
            .with_id(id)
            .unwrap()
            .with_prio(prio);
        Arc::new(c)
    }

    fn pair(local: u32, remote: u32, controlling: bool) -> CandidatePair {
        CandidatePair::new(cand("l", 1000, local), cand("r", 2000, remote), controlling)
    }

    fn formula(g: u64, d: u64) -> u128 {
        let (g, d) = (g as u128, d as u128);
        (u32::MAX as u128) * g.min(d) + 2 * g.max(d) + u128::from(g > d)
    }

    #[test]
    fn prio_matches_formula() {
        let values = [0, 1, 2, 10, 20, 126 << 24, u32::MAX - 1, u32::MAX];
        for g in values {
            for d in values {
                let prio = CandidatePair::calculate_prio(true, g, d);
                assert_eq!(prio as u128, formula(g as u64, d as u64), "g={g} d={d}");
            }
        }
    }

    #[test]
    fn prio_max_does_not_overflow() {
        let max = u32::MAX as u64;
        let prio = CandidatePair::calculate_prio(true, u32::MAX, u32::MAX);
        assert_eq!(prio, max * max + 2 * max);
    }

    #[test]
    fn prio_role_symmetry() {
        assert_eq!(pair(10, 20, true).prio(), pair(20, 10, false).prio());
        assert_ne!(pair(10, 20, true).prio(), pair(10, 20, false).prio());
    }

    #[test]
    fn prio_tie_break_favors_controlling() {
        // G > D gets the extra 1.
        assert_eq!(pair(20, 10, true).prio(), pair(10, 20, true).prio() + 1);
    }

    #[test]
    fn prio_follows_role_change() {
        let mut p = pair(10, 20, true);
        let before = p.prio();
        p.set_controlling(false);
        assert_eq!(p.prio(), pair(10, 20, false).prio());
        assert_ne!(p.prio(), before);
    }

    #[test]
    fn sort_highest_first() {
        let mut pairs = vec![pair(1, 1, true), pair(100, 100, true), pair(10, 10, true)];
        sort_by_prio(&mut pairs);
        let prios: Vec<_> = pairs.iter().map(|p| p.local().prio()).collect();
        assert_eq!(prios, vec![100, 10, 1]);
    }

    #[test]
    fn equality_ignores_state() {
        let l = cand("l", 1000, 1);
        let r = cand("r", 2000, 2);

        let a = CandidatePair::new(l.clone(), r.clone(), true);
        let mut b = CandidatePair::new(l.clone(), r, false);
        b.set_state(CheckState::Succeeded);
        b.set_nominated(true);
        b.mark_request_sent(Instant::now(), TransId::new());
        assert_eq!(a, b);

        let c = CandidatePair::new(l, cand("other", 3000, 2), true);
        assert_ne!(a, c);
    }

    #[test]
    fn equality_of_unset_pairs() {
        let a = pair(1, 2, true);
        let none: Option<&CandidatePair> = None;
        assert_eq!(none, None);
        assert_ne!(none, Some(&a));
        assert_ne!(Some(&a), none);
    }

    #[test]
    fn response_before_request() {
        let mut p = pair(1, 2, true);
        assert!(!p.mark_response_received(Instant::now(), TransId::new()));
        assert_eq!(p.latency(), Duration::ZERO);
    }

    #[test]
    fn response_mismatch_one_byte() {
        let now = Instant::now();
        let mut p = pair(1, 2, true);

        let sent = [7; TRANSACTION_ID_SIZE];
        let mut other = sent;
        other[TRANSACTION_ID_SIZE - 1] = 8;

        p.mark_request_sent(now, sent.into());
        assert!(!p.mark_response_received(now + Duration::from_millis(5), other.into()));
        assert_eq!(p.latency(), Duration::ZERO);
    }

    #[test]
    fn response_match_sets_latency() {
        let now = Instant::now();
        let mut p = pair(1, 2, true);
        let t = TransId::new();

        p.mark_request_sent(now, t);
        assert!(p.mark_response_received(now + Duration::from_millis(30), t));
        assert_eq!(p.latency(), Duration::from_millis(30));

        // Pending marker stays, a stray response still doesn't match.
        assert!(!p.mark_response_received(now + Duration::from_millis(40), TransId::new()));
        assert_eq!(p.latency(), Duration::from_millis(30));
    }

    #[test]
    fn response_before_send_time_is_zero() {
        let now = Instant::now() + Duration::from_secs(1);
        let mut p = pair(1, 2, true);
        let t = TransId::new();

        p.mark_request_sent(now, t);
        assert!(p.mark_response_received(now - Duration::from_millis(1), t));
        assert_eq!(p.latency(), Duration::ZERO);
    }

    #[test]
    fn only_latest_request_matches() {
        let now = Instant::now();
        let mut p = pair(1, 2, true);
        let first = TransId::new();
        let second = TransId::new();

        p.mark_request_sent(now, first);
        p.mark_request_sent(now + Duration::from_millis(10), second);
        assert_eq!(p.binding_request_count(), 2);

        assert!(!p.mark_response_received(now + Duration::from_millis(50), first));
        assert!(p.mark_response_received(now + Duration::from_millis(50), second));
        assert_eq!(p.latency(), Duration::from_millis(40));
    }

    #[test]
    fn transmit_through_local_outbox() {
        let outbox = Outbox::new();
        let local = IceCandidate::host("1.2.3.4:1000".parse().unwrap(), "udp")
            .unwrap()
            .with_outbox(outbox.clone());
        let mut p = CandidatePair::new(Arc::new(local), cand("r", 2000, 1), true);
        p.set_state(CheckState::InProgress);

        p.transmit(b"ping");

        let t = outbox.poll_transmit().unwrap();
        assert_eq!(t.destination, "1.2.3.4:2000".parse::<SocketAddr>().unwrap());
        assert_eq!(t.contents, b"ping");
        assert_eq!(p.state(), CheckState::InProgress);
    }

    #[test]
    fn transmit_failure_keeps_state() {
        // Local without outbox can't send.
        let mut p = pair(1, 2, true);
        p.set_state(CheckState::InProgress);

        assert!(p.write(b"ping").is_err());
        p.transmit(b"ping");

        assert_eq!(p.state(), CheckState::InProgress);
        assert!(!p.nominated());
    }

    #[test]
    fn transmit_failure_is_traced() {
        let p = pair(1, 2, true);

        let log = logged(|| p.transmit(b"ping"));

        assert!(log.contains("TRACE"), "{log}");
        assert!(log.contains("Failed to send STUN message: candidate can't send: candidate:l"));
    }

    #[test]
    fn transmit_success_is_silent() {
        let outbox = Outbox::new();
        let local = IceCandidate::host("1.2.3.4:1000".parse().unwrap(), "udp")
            .unwrap()
            .with_outbox(outbox.clone());
        let p = CandidatePair::new(Arc::new(local), cand("r", 2000, 1), true);

        assert_eq!(logged(|| p.transmit(b"ping")), "");
        assert_eq!(outbox.len(), 1);
    }

    #[test]
    fn response_mismatch_is_silent() {
        let now = Instant::now();
        let mut p = pair(1, 2, true);

        let log = logged(|| {
            assert!(!p.mark_response_received(now, TransId::new()));
            p.mark_request_sent(now, TransId::new());
            assert!(!p.mark_response_received(now, TransId::new()));
        });

        assert_eq!(log, "");
    }

    #[test]
    fn pair_id() {
        let p = pair(1, 2, true);
        assert_eq!(p.id().to_string(), "l:r");
    }

    #[test]
    fn display() {
        let mut p = pair(10, 20, true);
        p.set_nominate_on_success(true);
        let s = p.to_string();

        assert!(s.starts_with(&format!("prio {} (local, prio 10) candidate:l", p.prio())));
        assert!(s.contains("(remote, prio 20)"));
        assert!(s.ends_with("state: Waiting, nominated: false, nominate_on_success: true"));
    }
}
