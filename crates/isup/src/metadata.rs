//! Message-type metadata table (spec §4.3): for each message type, how
//! many mandatory fixed and mandatory variable parameters it carries,
//! whether an optional section is allowed, and which parameter codes go
//! in which slot, in order.
//!
//! Grounded directly on the source's `messages[]` table (`struct
//! message_data { messagetype, mand_fixed_params, mand_var_params,
//! opt_params, *param_list }`); the ANSI `ISUP_IAM`/`ISUP_RLC` exceptions
//! come from spec §4.3's explicit callout plus the source's separate
//! `ansi_iam_params` array.

use ss7_core::SwitchType;

use crate::message::MessageType;
use crate::parameters::ParamCode;

/// One message type's parameter-section shape.
#[derive(Debug, Clone, Copy)]
pub struct MessageMeta {
    pub fixed: &'static [ParamCode],
    pub variable: &'static [ParamCode],
    pub optional_allowed: bool,
}

impl MessageMeta {
    pub fn fixed_len(self, switch: SwitchType) -> usize {
        let _ = switch;
        self.fixed.len()
    }
}

use ParamCode::*;

const IAM_ITU_FIXED: [ParamCode; 4] =
    [NatureOfConnectionInd, ForwardCallInd, CallingPartyCategory, TransmissionMediumRequirement];
const IAM_ITU_VAR: [ParamCode; 1] = [CalledPartyNumber];

const IAM_ANSI_FIXED: [ParamCode; 3] = [NatureOfConnectionInd, ForwardCallInd, CallingPartyCategory];
const IAM_ANSI_VAR: [ParamCode; 2] = [UserServiceInfo, CalledPartyNumber];

const ACM_FIXED: [ParamCode; 1] = [BackwardCallInd];
const CON_FIXED: [ParamCode; 1] = [BackwardCallInd];
const REL_VAR: [ParamCode; 1] = [Cause];
const GRESET_VAR: [ParamCode; 1] = [RangeAndStatus];
const COT_FIXED: [ParamCode; 1] = [ContinuityInd];
const CPG_FIXED: [ParamCode; 1] = [EventInfo];
const CICGROUP_FIXED: [ParamCode; 1] = [CircuitGroupSupervisionInd];
const CICGROUP_VAR: [ParamCode; 1] = [RangeAndStatus];
const EMPTY: [ParamCode; 0] = [];

/// Look up a message type's metadata. `switch` only changes `ISUP_IAM`
/// (3 fixed/2 variable, `UserServiceInfo` replacing
/// `TransmissionMediumRequirement`) and `ISUP_RLC` (ANSI never emits
/// optional parameters on it), per spec §4.3's "ANSI exception".
pub fn lookup(message_type: MessageType, switch: SwitchType) -> MessageMeta {
    use MessageType::*;
    match message_type {
        Iam => match switch {
            SwitchType::Itu => MessageMeta { fixed: &IAM_ITU_FIXED, variable: &IAM_ITU_VAR, optional_allowed: true },
            SwitchType::Ansi => {
                MessageMeta { fixed: &IAM_ANSI_FIXED, variable: &IAM_ANSI_VAR, optional_allowed: true }
            }
        },
        Acm => MessageMeta { fixed: &ACM_FIXED, variable: &EMPTY, optional_allowed: true },
        Anm => MessageMeta { fixed: &EMPTY, variable: &EMPTY, optional_allowed: true },
        Con => MessageMeta { fixed: &CON_FIXED, variable: &EMPTY, optional_allowed: true },
        Rel => MessageMeta { fixed: &EMPTY, variable: &REL_VAR, optional_allowed: true },
        Rlc => MessageMeta {
            fixed: &EMPTY,
            variable: &EMPTY,
            optional_allowed: !matches!(switch, SwitchType::Ansi),
        },
        Grs => MessageMeta { fixed: &EMPTY, variable: &GRESET_VAR, optional_allowed: false },
        Gra => MessageMeta { fixed: &EMPTY, variable: &GRESET_VAR, optional_allowed: false },
        Cgb => MessageMeta { fixed: &CICGROUP_FIXED, variable: &CICGROUP_VAR, optional_allowed: false },
        Cgu => MessageMeta { fixed: &CICGROUP_FIXED, variable: &CICGROUP_VAR, optional_allowed: false },
        Cgba => MessageMeta { fixed: &CICGROUP_FIXED, variable: &CICGROUP_VAR, optional_allowed: false },
        Cgua => MessageMeta { fixed: &CICGROUP_FIXED, variable: &CICGROUP_VAR, optional_allowed: false },
        Cot => MessageMeta { fixed: &COT_FIXED, variable: &EMPTY, optional_allowed: false },
        Ccr => MessageMeta { fixed: &EMPTY, variable: &EMPTY, optional_allowed: false },
        Blo | Ubl | Bla | Uba | Rsc | Ucic => {
            MessageMeta { fixed: &EMPTY, variable: &EMPTY, optional_allowed: false }
        }
        Cpg => MessageMeta { fixed: &CPG_FIXED, variable: &EMPTY, optional_allowed: true },
        // LPA/CQM/CQR/FAA/FAR aren't in this source snapshot's table (spec
        // §6's "Message-type coverage" note); shaped by analogy with the
        // structurally closest message already in the table.
        Lpa => MessageMeta { fixed: &EMPTY, variable: &EMPTY, optional_allowed: false }, // like BLO
        Cqm => MessageMeta { fixed: &EMPTY, variable: &GRESET_VAR, optional_allowed: false }, // like GRS
        Cqr => MessageMeta { fixed: &EMPTY, variable: &GRESET_VAR, optional_allowed: false }, // like GRA
        Faa | Far => MessageMeta { fixed: &EMPTY, variable: &EMPTY, optional_allowed: true }, // like ANM
        Sus | Res => MessageMeta { fixed: &EMPTY, variable: &EMPTY, optional_allowed: true },
    }
}
