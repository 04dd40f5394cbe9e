//! The per-link signal-unit state machine: alignment, proving, and
//! sequenced reliable transport (spec §4.1).

use std::collections::VecDeque;
use std::time::Instant;

use ss7_core::{
    Scheduler, SharedScheduler, Slc, SuClass, SuHeader, SwitchType, TimerGuard,
};
use ss7_error::{Kind, Layer, SsError};

use crate::lssu::LssuStatus;
use crate::timer::{TimerKind, TimerProfile};

/// Alignment state, matching spec §4.1's six states exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    NotAligned,
    Aligned,
    Proving,
    AlignedReady,
    InService,
}

impl LinkState {
    pub fn is_in_service(&self) -> bool {
        matches!(self, LinkState::InService)
    }
}

/// The automatic SU this link emits when it has no MSU pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoTxSu {
    Fisu,
    Lssu(LssuStatus),
}

/// Events the link surfaces to whatever drives it (normally the link-set
/// controller / MTP3 layer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mtp2Event {
    /// `ALIGNED_READY → IN_SERVICE`, carrying the link's SLC.
    LinkUp(Slc),
    /// `IN_SERVICE → IDLE` on SIOS/SIO, or a fatal timer expiry.
    LinkDown(Slc),
    /// An in-sequence MSU payload (post-header), ready for MTP3.
    Msu(Vec<u8>),
}

/// Per-link signal-unit state machine.
pub struct Mtp2Link {
    slc: Slc,
    switch: SwitchType,
    profile: TimerProfile,
    state: LinkState,
    emergency: bool,
    peer_emergency: bool,
    alarmed: bool,

    cur_fsn: u8,
    cur_fib: bool,
    last_fsn_received: u8,
    cur_bib: bool,
    retransmission_count: u64,

    tx_queue: VecDeque<Vec<u8>>,
    /// Index 0 = most recently sent (head); last index = oldest (tail),
    /// matching spec §4.1's "insertion at head" / "walks from tail".
    tx_buf: VecDeque<(u8, Vec<u8>)>,
    /// Remaining steps of a tail→head retransmission walk. `None` when
    /// not retransmitting.
    retransmit_remaining: Option<usize>,
    auto_tx_su: AutoTxSu,

    scheduler: SharedScheduler<TimerKind>,
    t1: Option<TimerGuard<TimerKind>>,
    t2: Option<TimerGuard<TimerKind>>,
    t3: Option<TimerGuard<TimerKind>>,
    t4: Option<TimerGuard<TimerKind>>,
}

impl Mtp2Link {
    pub fn new(slc: Slc, switch: SwitchType, scheduler: SharedScheduler<TimerKind>) -> Self {
        Self {
            slc,
            switch,
            profile: TimerProfile::for_switch(switch),
            state: LinkState::Idle,
            emergency: false,
            peer_emergency: false,
            alarmed: false,
            cur_fsn: 0,
            cur_fib: false,
            last_fsn_received: 0x7f,
            cur_bib: false,
            retransmission_count: 0,
            tx_queue: VecDeque::new(),
            tx_buf: VecDeque::new(),
            retransmit_remaining: None,
            auto_tx_su: AutoTxSu::Lssu(LssuStatus::Sios),
            scheduler,
            t1: None,
            t2: None,
            t3: None,
            t4: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn slc(&self) -> Slc {
        self.slc
    }

    pub fn retransmission_count(&self) -> u64 {
        self.retransmission_count
    }

    pub fn set_alarm(&mut self, alarmed: bool) {
        self.alarmed = alarmed;
    }

    pub fn is_alarmed(&self) -> bool {
        self.alarmed
    }

    /// Earliest deadline among this link's own armed timers (T1-T4).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Drain every timer of this link's own scheduler that has reached
    /// `now`, returning which kinds fired. The caller (the link-set) is
    /// expected to feed each back through [`Mtp2Link::on_timer`].
    pub fn run_timers(&mut self, now: Instant) -> Vec<TimerKind> {
        self.scheduler.run(now).into_iter().map(|fired| fired.payload).collect()
    }

    /// `start(emergency)`: IDLE → NOT_ALIGNED.
    pub fn start(&mut self, emergency: bool, now: Instant) {
        self.emergency = emergency;
        self.peer_emergency = false;
        self.flush_bufs();
        self.state = LinkState::NotAligned;
        self.auto_tx_su = AutoTxSu::Lssu(LssuStatus::Sio);
        self.t2 = Some(self.scheduler.arm(now + self.profile.t2, TimerKind::T2));
    }

    /// Drops buffered MSUs and resets sequence state, matching the
    /// source's `flush_bufs` called on every re-alignment attempt.
    fn flush_bufs(&mut self) {
        self.tx_queue.clear();
        self.tx_buf.clear();
        self.retransmit_remaining = None;
        self.cur_fsn = 0;
        self.cur_fib = false;
        self.last_fsn_received = 0x7f;
        self.cur_bib = false;
    }

    fn to_idle(&mut self) -> Vec<Mtp2Event> {
        let was_in_service = self.state.is_in_service();
        self.state = LinkState::Idle;
        self.t1 = None;
        self.t2 = None;
        self.t3 = None;
        self.t4 = None;
        self.flush_bufs();
        self.auto_tx_su = AutoTxSu::Lssu(LssuStatus::Sios);
        if was_in_service {
            vec![Mtp2Event::LinkDown(self.slc)]
        } else {
            Vec::new()
        }
    }

    /// Feed a received SU (header already parsed) into the state machine.
    /// Returns any events produced (link up/down, a delivered MSU).
    pub fn receive(&mut self, raw: &[u8], now: Instant) -> Result<Vec<Mtp2Event>, SsError> {
        let (header, payload) = ss7_core::SignallingUnit::parse(raw)
            .ok_or_else(|| SsError::new(Layer::Mtp2, Kind::Framing, "truncated signal unit"))?;

        self.process_ack(&header);

        match header.class() {
            SuClass::Fisu => Ok(self.on_fisu(now)),
            SuClass::Lssu => {
                let status = payload
                    .first()
                    .and_then(|&b| LssuStatus::from_code(b))
                    .ok_or_else(|| {
                        SsError::new(Layer::Mtp2, Kind::Framing, "unrecognized lssu status")
                    })?;
                Ok(self.on_lssu(status, now))
            }
            SuClass::Msu => self.on_msu(&header, payload, now),
        }
    }

    /// Process the peer's BSN/BIB against our own send state: releases
    /// acknowledged entries from `tx_buf` and, on a BIB mismatch, starts a
    /// retransmission walk (spec §4.1 "Retransmission protocol").
    fn process_ack(&mut self, header: &SuHeader) {
        // Release every tx_buf entry whose FSN is now <= the peer's BSN,
        // walking from the tail (oldest) inward.
        while let Some((fsn, _)) = self.tx_buf.back() {
            if seq_le(*fsn, header.bsn) {
                self.tx_buf.pop_back();
            } else {
                break;
            }
        }

        if header.bib != self.cur_fib {
            self.cur_fib = !self.cur_fib;
            self.retransmit_remaining = Some(self.tx_buf.len());
        }
    }

    fn on_fisu(&mut self, _now: Instant) -> Vec<Mtp2Event> {
        if self.state == LinkState::AlignedReady {
            self.enter_in_service()
        } else {
            Vec::new()
        }
    }

    fn enter_in_service(&mut self) -> Vec<Mtp2Event> {
        self.t1 = None;
        self.state = LinkState::InService;
        self.auto_tx_su = AutoTxSu::Fisu;
        vec![Mtp2Event::LinkUp(self.slc)]
    }

    fn on_lssu(&mut self, status: LssuStatus, now: Instant) -> Vec<Mtp2Event> {
        if matches!(status, LssuStatus::Sie) {
            self.peer_emergency = true;
        }

        match self.state {
            LinkState::NotAligned => match status {
                LssuStatus::Sin | LssuStatus::Sie => {
                    self.t2 = None;
                    if self.emergency || matches!(status, LssuStatus::Sie) {
                        self.enter_proving(now)
                    } else {
                        self.t3 = Some(self.scheduler.arm(now + self.profile.t3, TimerKind::T3));
                        self.state = LinkState::Aligned;
                        self.auto_tx_su = AutoTxSu::Lssu(self.alignment_status());
                        Vec::new()
                    }
                }
                LssuStatus::Sios => self.to_idle(),
                _ => Vec::new(),
            },
            LinkState::Aligned => match status {
                LssuStatus::Sin | LssuStatus::Sie => {
                    self.t3 = None;
                    self.enter_proving(now)
                }
                LssuStatus::Sios => self.to_idle(),
                _ => Vec::new(),
            },
            LinkState::Proving => match status {
                LssuStatus::Sios => self.to_idle(),
                // Peer dropped back to out-of-alignment mid-proving: restart
                // alignment rather than stalling until T4 tears the link
                // down. No new T3 is armed here (only the NOT_ALIGNED ->
                // ALIGNED transition arms T3); T4 is simply cancelled by
                // dropping the old guard.
                LssuStatus::Sio => {
                    self.t4 = None;
                    self.state = LinkState::Aligned;
                    self.auto_tx_su = AutoTxSu::Lssu(self.alignment_status());
                    Vec::new()
                }
                _ => Vec::new(),
            },
            LinkState::InService => {
                if matches!(status, LssuStatus::Sios | LssuStatus::Sio) {
                    self.to_idle()
                } else {
                    Vec::new()
                }
            }
            LinkState::Idle | LinkState::AlignedReady => Vec::new(),
        }
    }

    fn alignment_status(&self) -> LssuStatus {
        if self.emergency || self.peer_emergency {
            LssuStatus::Sie
        } else {
            LssuStatus::Sin
        }
    }

    fn enter_proving(&mut self, now: Instant) -> Vec<Mtp2Event> {
        self.state = LinkState::Proving;
        let period = self.profile.t4(self.emergency || self.peer_emergency);
        self.t4 = Some(self.scheduler.arm(now + period, TimerKind::T4));
        self.auto_tx_su = AutoTxSu::Lssu(self.alignment_status());
        Vec::new()
    }

    fn on_msu(&mut self, header: &SuHeader, payload: &[u8], now: Instant) -> Result<Vec<Mtp2Event>, SsError> {
        if self.state != LinkState::AlignedReady && self.state != LinkState::InService {
            // Not in service: MSU is dropped per spec, link continues.
            return Ok(Vec::new());
        }

        if header.fib != self.cur_bib {
            // Still awaiting the start of our own requested retransmission.
            return Ok(Vec::new());
        }

        if header.fsn == self.last_fsn_received {
            // Duplicate.
            return Ok(Vec::new());
        }

        let expected = (self.last_fsn_received + 1) % 128;
        if header.fsn != expected {
            self.retransmission_count += 1;
            self.cur_bib = !self.cur_bib;
            return Ok(Vec::new());
        }

        self.last_fsn_received = header.fsn;

        let mut events = if self.state == LinkState::AlignedReady {
            self.enter_in_service()
        } else {
            Vec::new()
        };
        events.push(Mtp2Event::Msu(payload.to_vec()));
        Ok(events)
    }

    /// Queue an MSU payload (MTP3 routing label onward) for transmission.
    pub fn push_tx(&mut self, payload: Vec<u8>) {
        self.tx_queue.push_back(payload);
    }

    /// Pop one queued payload without MTP2 framing, for a link whose
    /// transport has already terminated MTP2 itself (spec §6's "external
    /// MTP2 offload") and so never calls `poll_tx`.
    pub fn pop_tx_payload(&mut self) -> Option<Vec<u8>> {
        self.tx_queue.pop_front()
    }

    /// Whether this link has an unsent payload waiting — the thing an
    /// MTP2-offload transport's `pollflags` write-interest hinges on,
    /// since such a link never emits an automatic fill SU of its own.
    pub fn has_queued_tx(&self) -> bool {
        !self.tx_queue.is_empty()
    }

    /// One poll-out opportunity: returns the next SU this link should
    /// write, per spec §4.1's transmit-path priority (retransmission,
    /// then fresh queue, then automatic fill/status SU).
    pub fn poll_tx(&mut self) -> Vec<u8> {
        if let Some(remaining) = self.retransmit_remaining {
            if remaining > 0 {
                let index = remaining - 1;
                self.retransmit_remaining = Some(index);
                // tx_buf index 0 = newest (head); our walk index counts
                // from the tail (oldest) toward the head.
                let buf_index = self.tx_buf.len() - 1 - index;
                if let Some((fsn, payload)) = self.tx_buf.get(buf_index) {
                    let header = SuHeader::new(
                        self.last_fsn_received,
                        self.cur_bib,
                        *fsn,
                        self.cur_fib,
                        msu_li(payload.len()),
                    );
                    return ss7_core::SignallingUnit::build(header, payload).as_bytes().to_vec();
                }
            } else {
                self.retransmit_remaining = None;
            }
        }

        if let Some(payload) = self.tx_queue.pop_front() {
            let fsn = self.cur_fsn;
            self.cur_fsn = (self.cur_fsn + 1) % 128;
            let header = SuHeader::new(self.last_fsn_received, self.cur_bib, fsn, self.cur_fib, msu_li(payload.len()));
            let su = ss7_core::SignallingUnit::build(header, &payload).as_bytes().to_vec();
            self.tx_buf.push_front((fsn, payload));
            return su;
        }

        match self.auto_tx_su {
            AutoTxSu::Fisu => {
                let header = SuHeader::new(self.last_fsn_received, self.cur_bib, 0, self.cur_fib, 0);
                ss7_core::SignallingUnit::build(header, &[]).as_bytes().to_vec()
            }
            AutoTxSu::Lssu(status) => {
                let li = if matches!(status, LssuStatus::Sin | LssuStatus::Sie) { 1 } else { 2 };
                let header = SuHeader::new(self.last_fsn_received, self.cur_bib, 0, self.cur_fib, li);
                ss7_core::SignallingUnit::build(header, &[status.code()]).as_bytes().to_vec()
            }
        }
    }

    /// Fire a timer that was armed by this link. Any state's T1/T2/T3
    /// expiry is fatal (→ IDLE); T4 expiry is the normal proving
    /// success path (→ ALIGNED_READY) unless proving already failed
    /// (handled the same: a single T4 always means "proving complete").
    pub fn on_timer(&mut self, kind: TimerKind, now: Instant) -> Vec<Mtp2Event> {
        match kind {
            TimerKind::T1 | TimerKind::T2 | TimerKind::T3 => self.to_idle(),
            TimerKind::T4 => {
                if self.state == LinkState::Proving {
                    self.state = LinkState::AlignedReady;
                    self.auto_tx_su = AutoTxSu::Fisu;
                    self.t1 = Some(self.scheduler.arm(now + self.profile.t1, TimerKind::T1));
                    Vec::new()
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// MSU `LI` value: clamped to the extended-length sentinel if the payload
/// is implausibly long (never happens in this engine's own sends, but
/// keeps the encode total since `SuHeader::new` masks to 6 bits anyway).
fn msu_li(payload_len: usize) -> u8 {
    let li = payload_len.min(ss7_core::MTP2_LI_MAX as usize - 1).max(3);
    li as u8
}

/// Modulo-128 "less than or equal" comparison for sequence numbers,
/// tolerant of wraparound within half the sequence space.
fn seq_le(a: u8, b: u8) -> bool {
    let diff = b.wrapping_sub(a) & 0x7f;
    diff < 64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ss7_core::SignallingUnit;

    fn link() -> Mtp2Link {
        Mtp2Link::new(Slc(0), SwitchType::Itu, SharedScheduler::new())
    }

    fn lssu_bytes(status: LssuStatus) -> Vec<u8> {
        let li = if matches!(status, LssuStatus::Sin | LssuStatus::Sie) { 1 } else { 2 };
        let header = SuHeader::new(0, false, 0, false, li);
        SignallingUnit::build(header, &[status.code()]).as_bytes().to_vec()
    }

    #[test]
    fn start_moves_to_not_aligned_and_emits_sio() {
        let mut l = link();
        l.start(false, Instant::now());
        assert_eq!(l.state(), LinkState::NotAligned);
        assert_eq!(l.auto_tx_su, AutoTxSu::Lssu(LssuStatus::Sio));
    }

    #[test]
    fn full_alignment_sequence_reaches_in_service() {
        let mut l = link();
        let now = Instant::now();
        l.start(false, now);

        let events = l.receive(&lssu_bytes(LssuStatus::Sin), now).unwrap();
        assert!(events.is_empty());
        assert_eq!(l.state(), LinkState::Aligned);

        let events = l.receive(&lssu_bytes(LssuStatus::Sin), now).unwrap();
        assert!(events.is_empty());
        assert_eq!(l.state(), LinkState::Proving);

        let events = l.on_timer(TimerKind::T4, now);
        assert!(events.is_empty());
        assert_eq!(l.state(), LinkState::AlignedReady);

        // First FISU from peer brings the link into service.
        let fisu = SignallingUnit::build(SuHeader::new(0, false, 0, false, 0), &[]).as_bytes().to_vec();
        let events = l.receive(&fisu, now).unwrap();
        assert_eq!(events, vec![Mtp2Event::LinkUp(Slc(0))]);
        assert_eq!(l.state(), LinkState::InService);
    }

    #[test]
    fn sio_during_proving_restarts_alignment_instead_of_stalling() {
        let mut l = link();
        let now = Instant::now();
        l.start(false, now);
        l.receive(&lssu_bytes(LssuStatus::Sin), now).unwrap();
        l.receive(&lssu_bytes(LssuStatus::Sin), now).unwrap();
        assert_eq!(l.state(), LinkState::Proving);

        let events = l.receive(&lssu_bytes(LssuStatus::Sio), now).unwrap();
        assert!(events.is_empty());
        assert_eq!(l.state(), LinkState::Aligned);
        assert_eq!(l.auto_tx_su, AutoTxSu::Lssu(LssuStatus::Sin));

        // Proving can restart from here exactly as it did the first time.
        let events = l.receive(&lssu_bytes(LssuStatus::Sin), now).unwrap();
        assert!(events.is_empty());
        assert_eq!(l.state(), LinkState::Proving);
    }

    #[test]
    fn timer_expiry_returns_to_idle() {
        let mut l = link();
        let now = Instant::now();
        l.start(false, now);
        let events = l.on_timer(TimerKind::T2, now);
        assert!(events.is_empty()); // wasn't in service
        assert_eq!(l.state(), LinkState::Idle);
    }

    #[test]
    fn in_service_timer_expiry_emits_link_down() {
        let mut l = link();
        let now = Instant::now();
        // Fast-forward straight to InService for the test.
        l.state = LinkState::InService;
        let events = l.on_timer(TimerKind::T1, now);
        assert_eq!(events, vec![Mtp2Event::LinkDown(Slc(0))]);
        assert_eq!(l.state(), LinkState::Idle);
    }

    #[test]
    fn duplicate_fsn_is_dropped() {
        let mut l = link();
        l.state = LinkState::InService;
        l.last_fsn_received = 5;
        let su = SignallingUnit::build(SuHeader::new(0, false, 5, false, 10), &[0u8; 7]).as_bytes().to_vec();
        let events = l.receive(&su, Instant::now()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn gap_triggers_bib_toggle_and_drop() {
        let mut l = link();
        l.state = LinkState::InService;
        l.last_fsn_received = 5;
        let su = SignallingUnit::build(SuHeader::new(0, false, 8, false, 10), &[0u8; 7]).as_bytes().to_vec();
        let before = l.cur_bib;
        let events = l.receive(&su, Instant::now()).unwrap();
        assert!(events.is_empty());
        assert_ne!(l.cur_bib, before);
        assert_eq!(l.retransmission_count(), 1);
    }

    #[test]
    fn in_sequence_msu_is_delivered() {
        let mut l = link();
        l.state = LinkState::InService;
        l.last_fsn_received = 5;
        let su = SignallingUnit::build(SuHeader::new(0, false, 6, false, 10), &[1, 2, 3, 4, 5, 6, 7]).as_bytes().to_vec();
        let events = l.receive(&su, Instant::now()).unwrap();
        assert_eq!(events, vec![Mtp2Event::Msu(vec![1, 2, 3, 4, 5, 6, 7])]);
        assert_eq!(l.last_fsn_received, 6);
    }

    #[test]
    fn pop_tx_payload_bypasses_mtp2_framing() {
        let mut l = link();
        l.push_tx(vec![0x11, 0x22]);
        assert_eq!(l.pop_tx_payload(), Some(vec![0x11, 0x22]));
        assert_eq!(l.pop_tx_payload(), None);
    }

    #[test]
    fn has_queued_tx_reflects_the_queue() {
        let mut l = link();
        assert!(!l.has_queued_tx());
        l.push_tx(vec![0x01]);
        assert!(l.has_queued_tx());
        l.pop_tx_payload();
        assert!(!l.has_queued_tx());
    }

    #[test]
    fn bib_mismatch_triggers_retransmission_in_fsn_order() {
        let mut l = link();
        l.state = LinkState::InService;
        l.push_tx(vec![0xaa]);
        l.push_tx(vec![0xbb]);
        l.push_tx(vec![0xcc]);
        let _ = l.poll_tx(); // fsn 0
        let _ = l.poll_tx(); // fsn 1
        let _ = l.poll_tx(); // fsn 2
        assert_eq!(l.tx_buf.len(), 3);

        // Peer acks fsn 0 with an inverted BIB (NAK).
        let ack = SignallingUnit::build(SuHeader::new(0, true, 0, false, 0), &[]).as_bytes().to_vec();
        l.receive(&ack, Instant::now()).unwrap();
        assert_eq!(l.tx_buf.len(), 2); // fsn 0 released

        let first_retx = l.poll_tx();
        let (h, _) = SignallingUnit::parse(&first_retx).unwrap();
        assert_eq!(h.fsn, 1);
        let second_retx = l.poll_tx();
        let (h, _) = SignallingUnit::parse(&second_retx).unwrap();
        assert_eq!(h.fsn, 2);
    }
}
