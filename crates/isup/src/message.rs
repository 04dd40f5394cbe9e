//! ISUP message type codes, numbered per Q.763 Table 2.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Iam,
    Acm,
    Anm,
    Con,
    Rel,
    Rlc,
    Grs,
    Gra,
    Cgb,
    Cgu,
    Cgba,
    Cgua,
    Cot,
    Ccr,
    Blo,
    Ubl,
    Bla,
    Uba,
    Lpa,
    Rsc,
    Cpg,
    Ucic,
    Cqm,
    Cqr,
    Faa,
    Far,
    Sus,
    Res,
}

impl MessageType {
    pub fn code(self) -> u8 {
        match self {
            MessageType::Iam => 0x01,
            MessageType::Cot => 0x05,
            MessageType::Acm => 0x06,
            MessageType::Con => 0x07,
            MessageType::Anm => 0x09,
            MessageType::Rel => 0x0c,
            MessageType::Sus => 0x0d,
            MessageType::Res => 0x0e,
            MessageType::Rlc => 0x10,
            MessageType::Ccr => 0x11,
            MessageType::Rsc => 0x12,
            MessageType::Blo => 0x13,
            MessageType::Ubl => 0x14,
            MessageType::Bla => 0x15,
            MessageType::Uba => 0x16,
            MessageType::Grs => 0x17,
            MessageType::Cgb => 0x18,
            MessageType::Cgu => 0x19,
            MessageType::Cgba => 0x1a,
            MessageType::Cgua => 0x1b,
            MessageType::Far => 0x1f,
            MessageType::Faa => 0x20,
            MessageType::Lpa => 0x24,
            MessageType::Gra => 0x29,
            MessageType::Cqm => 0x2a,
            MessageType::Cqr => 0x2b,
            MessageType::Cpg => 0x2c,
            MessageType::Ucic => 0x2e,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        use MessageType::*;
        Some(match code {
            0x01 => Iam,
            0x05 => Cot,
            0x06 => Acm,
            0x07 => Con,
            0x09 => Anm,
            0x0c => Rel,
            0x0d => Sus,
            0x0e => Res,
            0x10 => Rlc,
            0x11 => Ccr,
            0x12 => Rsc,
            0x13 => Blo,
            0x14 => Ubl,
            0x15 => Bla,
            0x16 => Uba,
            0x17 => Grs,
            0x18 => Cgb,
            0x19 => Cgu,
            0x1a => Cgba,
            0x1b => Cgua,
            0x1f => Far,
            0x20 => Faa,
            0x24 => Lpa,
            0x29 => Gra,
            0x2a => Cqm,
            0x2b => Cqr,
            0x2c => Cpg,
            0x2e => Ucic,
            _ => return None,
        })
    }

    /// True for messages that act on a transient, non-call-associated
    /// record rather than a `(DPC, CIC)`-keyed call (spec §3 invariant 3).
    pub fn is_non_call_associated(self) -> bool {
        matches!(
            self,
            MessageType::Blo
                | MessageType::Bla
                | MessageType::Ubl
                | MessageType::Uba
                | MessageType::Cgb
                | MessageType::Cgba
                | MessageType::Cgu
                | MessageType::Cgua
                | MessageType::Ucic
                | MessageType::Lpa
                | MessageType::Ccr
                | MessageType::Cqm
                | MessageType::Cqr
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::Iam => "IAM",
            MessageType::Acm => "ACM",
            MessageType::Anm => "ANM",
            MessageType::Con => "CON",
            MessageType::Rel => "REL",
            MessageType::Rlc => "RLC",
            MessageType::Grs => "GRS",
            MessageType::Gra => "GRA",
            MessageType::Cgb => "CGB",
            MessageType::Cgu => "CGU",
            MessageType::Cgba => "CGBA",
            MessageType::Cgua => "CGUA",
            MessageType::Cot => "COT",
            MessageType::Ccr => "CCR",
            MessageType::Blo => "BLO",
            MessageType::Ubl => "UBL",
            MessageType::Bla => "BLA",
            MessageType::Uba => "UBA",
            MessageType::Lpa => "LPA",
            MessageType::Rsc => "RSC",
            MessageType::Cpg => "CPG",
            MessageType::Ucic => "UCIC",
            MessageType::Cqm => "CQM",
            MessageType::Cqr => "CQR",
            MessageType::Faa => "FAA",
            MessageType::Far => "FAR",
            MessageType::Sus => "SUS",
            MessageType::Res => "RES",
        };
        write!(f, "{} (0x{:02x})", name, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_message_type_round_trips_through_its_code() {
        let all = [
            MessageType::Iam, MessageType::Acm, MessageType::Anm, MessageType::Con,
            MessageType::Rel, MessageType::Rlc, MessageType::Grs, MessageType::Gra,
            MessageType::Cgb, MessageType::Cgu, MessageType::Cgba, MessageType::Cgua,
            MessageType::Cot, MessageType::Ccr, MessageType::Blo, MessageType::Ubl,
            MessageType::Bla, MessageType::Uba, MessageType::Lpa, MessageType::Rsc,
            MessageType::Cpg, MessageType::Ucic, MessageType::Cqm, MessageType::Cqr,
            MessageType::Faa, MessageType::Far, MessageType::Sus, MessageType::Res,
        ];
        for mt in all {
            assert_eq!(MessageType::from_code(mt.code()), Some(mt));
        }
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(MessageType::from_code(0x99), None);
    }
}
