//! Parameter codes and the per-parameter encode/decode bodies.
//!
//! Codes are numbered per Q.763 Table 3. Dispatch is a match over
//! [`ParamCode`] with an explicit passthrough (`Parameter::Raw`) branch
//! standing in for parameters this engine doesn't interpret, rather than
//! a missing arm.

use ss7_core::CircuitStatusMap;
use ss7_error::{Kind, Layer, SsError};

use crate::cause::Cause;
use crate::numbers::{decode_digits, encode_digits};

/// Parameter codes this codec recognizes, numbered per Q.763 Table 3
/// (the ANSI-only codes above 0x7f are taken from the same header's ANSI
/// section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamCode {
    CallReference,
    TransmissionMediumRequirement,
    CalledPartyNumber,
    NatureOfConnectionInd,
    ForwardCallInd,
    CallingPartyCategory,
    CallingPartyNumber,
    RedirectingNumber,
    ContinuityInd,
    BackwardCallInd,
    Cause,
    CircuitGroupSupervisionInd,
    RangeAndStatus,
    CugInterlockCode,
    UserServiceInfo,
    ConnectedNumber,
    SuspendResumeInd,
    EventInfo,
    OriginalCalledNumber,
    GenericName,
    ChargeNumber,
    GenericAddress,
    GenericDigits,
    Jip,
    OriginatingLineInfo,
    /// Any other type octet: carried verbatim (spec §7's "unknown optional
    /// ISUP parameters are logged and skipped — never fatal").
    Unknown(u8),
}

impl ParamCode {
    pub fn code(self) -> u8 {
        match self {
            ParamCode::CallReference => 0x01,
            ParamCode::TransmissionMediumRequirement => 0x02,
            ParamCode::CalledPartyNumber => 0x04,
            ParamCode::NatureOfConnectionInd => 0x06,
            ParamCode::ForwardCallInd => 0x07,
            ParamCode::CallingPartyCategory => 0x09,
            ParamCode::CallingPartyNumber => 0x0a,
            ParamCode::RedirectingNumber => 0x0b,
            ParamCode::ContinuityInd => 0x10,
            ParamCode::BackwardCallInd => 0x11,
            ParamCode::Cause => 0x12,
            ParamCode::CircuitGroupSupervisionInd => 0x15,
            ParamCode::RangeAndStatus => 0x16,
            ParamCode::CugInterlockCode => 0x1a,
            ParamCode::UserServiceInfo => 0x1d,
            ParamCode::ConnectedNumber => 0x21,
            ParamCode::SuspendResumeInd => 0x22,
            ParamCode::EventInfo => 0x24,
            ParamCode::OriginalCalledNumber => 0x28,
            ParamCode::GenericName => 0x3e,
            ParamCode::ChargeNumber => 0x7b,
            ParamCode::GenericAddress => 0xc0,
            ParamCode::GenericDigits => 0xc3,
            ParamCode::Jip => 0xc6,
            ParamCode::OriginatingLineInfo => 0xef,
            ParamCode::Unknown(c) => c,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => ParamCode::CallReference,
            0x02 => ParamCode::TransmissionMediumRequirement,
            0x04 => ParamCode::CalledPartyNumber,
            0x06 => ParamCode::NatureOfConnectionInd,
            0x07 => ParamCode::ForwardCallInd,
            0x09 => ParamCode::CallingPartyCategory,
            0x0a => ParamCode::CallingPartyNumber,
            0x0b => ParamCode::RedirectingNumber,
            0x10 => ParamCode::ContinuityInd,
            0x11 => ParamCode::BackwardCallInd,
            0x12 => ParamCode::Cause,
            0x15 => ParamCode::CircuitGroupSupervisionInd,
            0x16 => ParamCode::RangeAndStatus,
            0x1a => ParamCode::CugInterlockCode,
            0x1d => ParamCode::UserServiceInfo,
            0x21 => ParamCode::ConnectedNumber,
            0x22 => ParamCode::SuspendResumeInd,
            0x24 => ParamCode::EventInfo,
            0x28 => ParamCode::OriginalCalledNumber,
            0x3e => ParamCode::GenericName,
            0x7b => ParamCode::ChargeNumber,
            0xc0 => ParamCode::GenericAddress,
            0xc3 => ParamCode::GenericDigits,
            0xc6 => ParamCode::Jip,
            0xef => ParamCode::OriginatingLineInfo,
            other => ParamCode::Unknown(other),
        }
    }
}

/// Nature of Address Indicator + presentation/screening, shared by every
/// number parameter (called/calling/charge/redirecting/connected/original
/// called), per spec §4.3 "Encoding/decoding contracts".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberParam {
    pub nai: u8,
    pub plan: u8,
    pub presentation: u8,
    pub screening: u8,
    pub digits: String,
}

impl NumberParam {
    pub fn new(nai: u8, digits: impl Into<String>) -> Self {
        Self { nai: nai & 0x7f, plan: 1, presentation: 0, screening: 0, digits: digits.into() }
    }

    /// Called-number flavor: flags octet is `{odd, nai}` only — no plan/
    /// presentation/screening octet follows it on the wire for
    /// `ISUP_PARM_CALLED_PARTY_NUM`'s second octet layout (`INN:1 |
    /// plan:3 | spare:4`), so called and calling numbers use distinct
    /// second-octet shapes; this engine tracks both in one struct and
    /// lets the caller pick the right encode/decode pair.
    pub fn encode_called(&self) -> Vec<u8> {
        let (digits, odd) = encode_digits(&self.digits);
        let mut out = Vec::with_capacity(2 + digits.len());
        out.push(((odd as u8) << 7) | (self.nai & 0x7f));
        out.push((self.plan & 0x07) << 4);
        out.extend(digits);
        out
    }

    pub fn decode_called(bytes: &[u8]) -> Result<Self, SsError> {
        if bytes.len() < 2 {
            return Err(truncated("called party number"));
        }
        let odd = bytes[0] & 0x80 != 0;
        let nai = bytes[0] & 0x7f;
        let plan = (bytes[1] >> 4) & 0x07;
        let digits = decode_digits(&bytes[2..], odd);
        Ok(Self { nai, plan, presentation: 0, screening: 0, digits })
    }

    /// Calling/charge/connected/original-called/redirecting number flavor:
    /// second octet carries `presentation:2 | spare:2 | plan:3`... laid
    /// out here as `{plan: bits 4-6, presentation: bits 2-3, screening:
    /// bits 0-1}`, matching spec §4.3 exactly.
    pub fn encode_full(&self) -> Vec<u8> {
        let (digits, odd) = encode_digits(&self.digits);
        let mut out = Vec::with_capacity(2 + digits.len());
        out.push(((odd as u8) << 7) | (self.nai & 0x7f));
        out.push(((self.plan & 0x07) << 4) | ((self.presentation & 0x03) << 2) | (self.screening & 0x03));
        out.extend(digits);
        out
    }

    pub fn decode_full(bytes: &[u8]) -> Result<Self, SsError> {
        if bytes.len() < 2 {
            return Err(truncated("number parameter"));
        }
        let odd = bytes[0] & 0x80 != 0;
        let nai = bytes[0] & 0x7f;
        let plan = (bytes[1] >> 4) & 0x07;
        let presentation = (bytes[1] >> 2) & 0x03;
        let screening = bytes[1] & 0x03;
        let digits = decode_digits(&bytes[2..], odd);
        Ok(Self { nai, plan, presentation, screening, digits })
    }
}

fn truncated(what: &'static str) -> SsError {
    SsError::with_detail(Layer::Isup, Kind::Framing, "truncated parameter", what)
}

/// Range-and-status parameter: a circuit range base (implicit — carried
/// by the message's own CIC) plus `range+1` circuits and, for
/// GRA/CGBA/CGUA/CQR, one status bit per circuit (spec §3's "group
/// supervision range+status bitmap").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeAndStatus {
    /// Wire `range` octet: number of additional circuits beyond the base
    /// CIC (so `range + 1` total circuits are covered).
    pub range: u8,
    pub status: Option<Vec<u8>>,
}

impl RangeAndStatus {
    pub fn circuit_count(&self) -> usize {
        self.range as usize + 1
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.range];
        if let Some(status) = &self.status {
            out.extend_from_slice(status);
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SsError> {
        let &range = bytes.first().ok_or_else(|| truncated("range and status"))?;
        let status = if bytes.len() > 1 { Some(bytes[1..].to_vec()) } else { None };
        Ok(Self { range, status })
    }

    /// Unpack `status` into a per-circuit bitmap, when present (GRA/CGBA/
    /// CGUA/CQR carry one; GRS/CGB/CGU/CQM requests do not).
    pub fn status_bitmap(&self) -> Option<CircuitStatusMap> {
        self.status.as_ref().map(|bytes| CircuitStatusMap::from_bytes(self.circuit_count(), bytes))
    }
}

/// Circuit Group Supervision Indicator: bits 0-1 select maintenance vs.
/// hardware-failure vs. national blocking oriented per Q.763 §3.35.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitGroupSupervisionInd {
    pub supervision_type: u8,
}

impl CircuitGroupSupervisionInd {
    pub fn encode(self) -> [u8; 1] {
        [self.supervision_type & 0x03]
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SsError> {
        let &b = bytes.first().ok_or_else(|| truncated("circuit group supervision indicator"))?;
        Ok(Self { supervision_type: b & 0x03 })
    }
}

/// Event Information (spec §3 "event info"), one octet: bits 0-6 carry
/// the event code, bit 7 the presentation-restricted indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInfo {
    pub event: u8,
}

impl EventInfo {
    pub fn encode(self) -> [u8; 1] {
        [self.event & 0x7f]
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SsError> {
        let &b = bytes.first().ok_or_else(|| truncated("event information"))?;
        Ok(Self { event: b & 0x7f })
    }
}

/// A single-octet fixed parameter (nature-of-connection, forward-call
/// low octet, calling-party-category, transmission-medium, continuity
/// indicator): these carry one raw byte this engine doesn't interpret
/// further than storing/replaying it, matching the source's several
/// `NULL`-dump entries that still have working `receive`/`transmit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawByte(pub u8);

impl RawByte {
    pub fn encode(self) -> [u8; 1] {
        [self.0]
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SsError> {
        let &b = bytes.first().ok_or_else(|| truncated("single-octet parameter"))?;
        Ok(Self(b))
    }
}

/// A two-octet fixed parameter (forward-call indicator, backward-call
/// indicator): stored as a raw 16-bit flag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawWord(pub u16);

impl RawWord {
    pub fn encode(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SsError> {
        if bytes.len() < 2 {
            return Err(truncated("two-octet parameter"));
        }
        Ok(Self(u16::from_le_bytes([bytes[0], bytes[1]])))
    }
}

pub(crate) fn encode_cause(cause: Cause) -> Vec<u8> {
    cause.encode().to_vec()
}

pub(crate) fn decode_cause(bytes: &[u8]) -> Result<Cause, SsError> {
    Cause::decode(bytes).ok_or_else(|| truncated("cause indicator"))
}
