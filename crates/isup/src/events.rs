//! Events the ISUP codec surfaces after a successful receive (spec §4.3
//! "Event mapping", §6 "Event variants surfaced").
//!
//! One variant per message type, each carrying `(cic, opc, ...)` plus
//! whatever fields that message's parameters decoded to. Per spec §9's
//! open question ("`ISUP_EVENT_CGBA` and `ISUP_EVENT_CGB` share the same
//! numeric value in early revisions"), `Cgb` and `Cgba` are distinct
//! variants here — there is no shared numeric tag to collide.

use ss7_core::{Cic, PointCode};

use crate::cause::Cause;
use crate::parameters::{CircuitGroupSupervisionInd, EventInfo, NumberParam, RangeAndStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsupEvent {
    Iam { cic: Cic, opc: PointCode, called: NumberParam, calling: Option<NumberParam> },
    Acm { cic: Cic, opc: PointCode },
    Anm { cic: Cic, opc: PointCode },
    Con { cic: Cic, opc: PointCode },
    Rel { cic: Cic, opc: PointCode, cause: Cause },
    Rlc { cic: Cic, opc: PointCode },
    Grs { cic: Cic, opc: PointCode, startcic: u16, endcic: u16 },
    Gra { cic: Cic, opc: PointCode, startcic: u16, endcic: u16 },
    Cgb { cic: Cic, opc: PointCode, startcic: u16, endcic: u16, supervision: CircuitGroupSupervisionInd },
    Cgu { cic: Cic, opc: PointCode, startcic: u16, endcic: u16, supervision: CircuitGroupSupervisionInd },
    Cgba { cic: Cic, opc: PointCode, startcic: u16, endcic: u16 },
    Cgua { cic: Cic, opc: PointCode, startcic: u16, endcic: u16 },
    Cot { cic: Cic, opc: PointCode, passed: bool },
    Ccr { cic: Cic, opc: PointCode },
    Blo { cic: Cic, opc: PointCode },
    Ubl { cic: Cic, opc: PointCode },
    Bla { cic: Cic, opc: PointCode },
    Uba { cic: Cic, opc: PointCode },
    Rsc { cic: Cic, opc: PointCode },
    Cpg { cic: Cic, opc: PointCode, event: EventInfo },
    Ucic { cic: Cic, opc: PointCode },
    Lpa { cic: Cic, opc: PointCode },
    Cqm { cic: Cic, opc: PointCode, startcic: u16, endcic: u16 },
    Cqr { cic: Cic, opc: PointCode, startcic: u16, endcic: u16, status: RangeAndStatus },
    Faa { cic: Cic, opc: PointCode },
    Far { cic: Cic, opc: PointCode },
    Sus { cic: Cic, opc: PointCode },
    Res { cic: Cic, opc: PointCode },
}

impl IsupEvent {
    pub fn cic(&self) -> Cic {
        match self {
            IsupEvent::Iam { cic, .. }
            | IsupEvent::Acm { cic, .. }
            | IsupEvent::Anm { cic, .. }
            | IsupEvent::Con { cic, .. }
            | IsupEvent::Rel { cic, .. }
            | IsupEvent::Rlc { cic, .. }
            | IsupEvent::Grs { cic, .. }
            | IsupEvent::Gra { cic, .. }
            | IsupEvent::Cgb { cic, .. }
            | IsupEvent::Cgu { cic, .. }
            | IsupEvent::Cgba { cic, .. }
            | IsupEvent::Cgua { cic, .. }
            | IsupEvent::Cot { cic, .. }
            | IsupEvent::Ccr { cic, .. }
            | IsupEvent::Blo { cic, .. }
            | IsupEvent::Ubl { cic, .. }
            | IsupEvent::Bla { cic, .. }
            | IsupEvent::Uba { cic, .. }
            | IsupEvent::Rsc { cic, .. }
            | IsupEvent::Cpg { cic, .. }
            | IsupEvent::Ucic { cic, .. }
            | IsupEvent::Lpa { cic, .. }
            | IsupEvent::Cqm { cic, .. }
            | IsupEvent::Cqr { cic, .. }
            | IsupEvent::Faa { cic, .. }
            | IsupEvent::Far { cic, .. }
            | IsupEvent::Sus { cic, .. }
            | IsupEvent::Res { cic, .. } => *cic,
        }
    }

    /// True for events raised by messages that free their (transient or
    /// call-associated) record immediately, per spec §4.3 "Event mapping":
    /// "GRS/GRA/UCIC/etc. free the transient call record immediately."
    pub fn frees_call_record(&self) -> bool {
        matches!(
            self,
            IsupEvent::Rlc { .. }
                | IsupEvent::Gra { .. }
                | IsupEvent::Cgba { .. }
                | IsupEvent::Cgua { .. }
                | IsupEvent::Bla { .. }
                | IsupEvent::Uba { .. }
                | IsupEvent::Ucic { .. }
                | IsupEvent::Rsc { .. }
        )
    }
}
