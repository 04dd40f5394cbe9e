//! ISUP call record and its table (spec §3 "ISUP Call", "Lifecycle";
//! invariant 3: "At most one ISUP call record per `(DPC, CIC)` for
//! call-associated messages; non-call-associated messages ... allocate a
//! transient record that is freed on completion.").
//!
//! Grounded on the source's `struct isup_call` (a singly-linked list,
//! searched linearly by CIC) replaced per spec §9's design note with an
//! owned `HashMap<CallKey, IsupCall>` — no `next` pointer, no cycles.

use std::collections::HashMap;

use ss7_core::{CallKey, Cic, PointCode};

use crate::parameters::NumberParam;

/// A single call-associated or transient ISUP record.
///
/// Fields beyond the headline called/calling number and cause — redirecting
/// number, original called number, connected number, generic name, CUG
/// interlock code, suspend/resume indicators — are carried from the
/// source's `struct isup_call` per `SPEC_FULL.md` §3's call-record
/// supplement; they're populated only when the matching optional
/// parameter was actually present on the wire.
///
/// Per spec §5 ("There is no distributed timeout; only MTP2 alignment
/// timers"), this record intentionally carries no armed per-call timer:
/// continuity-check and other ISUP-level supervisory timeouts are a host
/// application concern, not this engine's.
#[derive(Debug, Clone, Default)]
pub struct IsupCall {
    pub dpc: Option<PointCode>,
    pub cic: Option<Cic>,

    pub called: Option<NumberParam>,
    pub calling: Option<NumberParam>,
    pub charge_number: Option<NumberParam>,
    pub redirecting_number: Option<NumberParam>,
    pub original_called_number: Option<NumberParam>,
    pub connected_number: Option<NumberParam>,

    pub cause_value: Option<u8>,
    pub cause_location: Option<u8>,

    pub continuity_check_required: bool,
    pub continuity_check_passed: Option<bool>,

    pub event_info: Option<u8>,

    pub group_supervision_start: Option<u16>,
    pub group_supervision_end: Option<u16>,
    pub group_supervision_status: Option<Vec<u8>>,

    pub generic_name: Option<String>,
    pub generic_address: Option<NumberParam>,
    pub generic_digits: Option<String>,
    pub jip: Option<String>,
    pub call_reference: Option<(u32, PointCode)>,
    pub cug_interlock_code: Option<u16>,
    pub oli: Option<u8>,
    pub suspend_resume_indicator: Option<u8>,
    pub lspi: Option<Lspi>,

    // Fixed-parameter state for the messages this call will originate.
    // These mirror the source's per-call copies of the IAM/ACM fixed
    // octets rather than recomputing them at send time.
    pub nature_of_connection: Option<u8>,
    pub forward_call_ind: Option<u16>,
    pub calling_party_category: Option<u8>,
    pub transmission_medium_requirement: Option<u8>,
    pub backward_call_ind: Option<u16>,
    pub user_service_info: Option<Vec<u8>>,
}

impl IsupCall {
    pub fn new(dpc: PointCode, cic: Cic) -> Self {
        Self { dpc: Some(dpc), cic: Some(cic), ..Default::default() }
    }
}

/// ANSI "Location Set/Parameter Information" block, carried verbatim from
/// the source's `struct isup_call` (`lspi_type/scheme/context/ident`); not
/// interpreted further by this engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lspi {
    pub lspi_type: u8,
    pub scheme: u8,
    pub context: u8,
    pub ident: String,
}

/// Owns every in-progress call, keyed by `(DPC, CIC)`, plus a slab of
/// transient records for non-call-associated messages (spec invariant 3).
/// `next_transient` is a monotonic counter rather than a reused free-list
/// slot index — transient records are cheap and short-lived, so reuse
/// isn't worth the bookkeeping.
#[derive(Debug, Default)]
pub struct CallTable {
    calls: HashMap<CallKey, IsupCall>,
    transients: HashMap<u64, IsupCall>,
    transient_keys: HashMap<CallKey, u64>,
    next_transient: u64,
}

impl CallTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, dpc: PointCode, cic: Cic) -> &mut IsupCall {
        self.calls.entry(CallKey::new(dpc, cic)).or_insert_with(|| IsupCall::new(dpc, cic))
    }

    pub fn find(&self, dpc: PointCode, cic: Cic) -> Option<&IsupCall> {
        self.calls.get(&CallKey::new(dpc, cic))
    }

    pub fn find_mut(&mut self, dpc: PointCode, cic: Cic) -> Option<&mut IsupCall> {
        self.calls.get_mut(&CallKey::new(dpc, cic))
    }

    pub fn free(&mut self, dpc: PointCode, cic: Cic) -> Option<IsupCall> {
        self.calls.remove(&CallKey::new(dpc, cic))
    }

    pub fn contains(&self, dpc: PointCode, cic: Cic) -> bool {
        self.calls.contains_key(&CallKey::new(dpc, cic))
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Allocate a transient record (BLO/UBL/CGB/CGU/UCIC/LPA/CCR and
    /// friends). Returns a handle to free it later.
    pub fn new_transient(&mut self) -> (u64, &mut IsupCall) {
        let id = self.next_transient;
        self.next_transient += 1;
        self.transients.insert(id, IsupCall::default());
        (id, self.transients.get_mut(&id).expect("just inserted"))
    }

    pub fn free_transient(&mut self, id: u64) -> Option<IsupCall> {
        self.transients.remove(&id)
    }

    pub fn transient_count(&self) -> usize {
        self.transients.len()
    }

    /// Allocate (or return the already-pending) transient record for
    /// `(dpc, cic)` — the BLO/UBL/CGB/CGU/GRS/CQM request half of a
    /// request/completion pair, keyed by circuit rather than by an opaque
    /// id so the matching completion (BLA/UBA/CGBA/CGUA/GRA/CQR) can find
    /// it without the caller threading a handle through.
    pub fn create_transient_for(&mut self, dpc: PointCode, cic: Cic) -> &mut IsupCall {
        let key = CallKey::new(dpc, cic);
        let id = match self.transient_keys.get(&key) {
            Some(&id) => id,
            None => {
                let id = self.next_transient;
                self.next_transient += 1;
                self.transient_keys.insert(key, id);
                id
            }
        };
        self.transients.entry(id).or_insert_with(|| IsupCall::new(dpc, cic))
    }

    /// Free the transient record matching `(dpc, cic)`, if one is pending —
    /// the BLA/UBA/CGBA/CGUA/GRA/CQR completion half.
    pub fn free_transient_for(&mut self, dpc: PointCode, cic: Cic) -> Option<IsupCall> {
        let key = CallKey::new(dpc, cic);
        let id = self.transient_keys.remove(&key)?;
        self.transients.remove(&id)
    }
}
