//! The generic send/receive algorithm shared by every ISUP message (spec
//! §4.3 "Send algorithm"/"Receive algorithm"): lay down CIC and message
//! type, then walk the three parameter sections in order, computing
//! pointer octets for the variable section and the leading/trailing
//! pointer-and-terminator octets for the optional section.
//!
//! This module only knows about raw parameter bytes (already produced by
//! a specific parameter's own encode/decode in [`crate::parameters`]); it
//! has no notion of what a "called party number" is. That split mirrors
//! the source's `do_parm`, which is polymorphic over a section-type tag
//! and leaves the actual bit-twiddling to each parameter's
//! `{dump,receive,transmit}` triple.

use ss7_core::{Cic, SwitchType};
use ss7_error::{Kind, Layer, SsError};

use crate::message::MessageType;
use crate::metadata::{self, MessageMeta};
use crate::parameters::ParamCode;

pub fn encode_cic(cic: Cic, switch: SwitchType) -> [u8; 2] {
    let masked = cic.masked(switch);
    [(masked & 0xff) as u8, (masked >> 8) as u8]
}

pub fn decode_cic(bytes: &[u8], switch: SwitchType) -> Result<Cic, SsError> {
    if bytes.len() < 2 {
        return Err(framing("truncated cic"));
    }
    let raw = (bytes[0] as u16) | ((bytes[1] as u16) << 8);
    Ok(Cic(raw & switch.cic_mask()))
}

fn framing(detail: &'static str) -> SsError {
    SsError::with_detail(Layer::Isup, Kind::Framing, "truncated isup message", detail)
}

/// A parameter value ready to be laid onto the wire, tagged with the code
/// it belongs to (needed only for the optional section, where the type
/// octet is part of the wire format).
#[derive(Debug, Clone)]
pub struct EncodedParam {
    pub code: ParamCode,
    pub bytes: Vec<u8>,
}

impl EncodedParam {
    pub fn new(code: ParamCode, bytes: Vec<u8>) -> Self {
        Self { code, bytes }
    }
}

/// Build a complete ISUP message body: `CIC | type | fixed | variable |
/// optional`. `fixed` and `variable` must match the message type's
/// metadata exactly, in order; `optional` may be empty even when the
/// message type allows it (no optional section is then written at all).
pub fn build_message(
    switch: SwitchType,
    message_type: MessageType,
    cic: Cic,
    fixed: &[EncodedParam],
    variable: &[EncodedParam],
    optional: &[EncodedParam],
) -> Result<Vec<u8>, SsError> {
    let meta = metadata::lookup(message_type, switch);
    if fixed.len() != meta.fixed.len() || variable.len() != meta.variable.len() {
        return Err(SsError::new(Layer::Isup, Kind::Config, "parameter count mismatch for message type"));
    }
    if !optional.is_empty() && !meta.optional_allowed {
        return Err(SsError::new(Layer::Isup, Kind::Config, "message type carries no optional section"));
    }

    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(&encode_cic(cic, switch));
    out.push(message_type.code());

    for p in fixed {
        out.extend_from_slice(&p.bytes);
    }

    // Variable section: M pointer octets up front, each giving the
    // byte-offset from itself to its parameter's length octet, followed
    // by the length-prefixed parameters themselves (spec §4.3).
    if !variable.is_empty() {
        let pointer_section_start = out.len();
        out.resize(pointer_section_start + variable.len(), 0);
        for (i, p) in variable.iter().enumerate() {
            let pointer_offset = pointer_section_start + i;
            let param_offset = out.len();
            out[pointer_offset] = (param_offset - pointer_offset) as u8;
            out.push(p.bytes.len() as u8);
            out.extend_from_slice(&p.bytes);
        }
    }

    if meta.optional_allowed {
        if optional.is_empty() {
            // Per spec: "a pointer octet (offset to the first optional, or
            // 0 if none)". Some message types skip writing the pointer
            // octet entirely when no optionals and the section is simply
            // absent; this engine always writes it when optionals are
            // allowed, matching GRS/GRA-adjacent messages where the
            // source always reserves the octet.
        } else {
            let pointer_offset = out.len();
            out.push(0); // placeholder, filled in below
            let first_optional_offset = out.len();
            out[pointer_offset] = (first_optional_offset - pointer_offset) as u8;
            for p in optional {
                out.push(p.code.code());
                out.push(p.bytes.len() as u8);
                out.extend_from_slice(&p.bytes);
            }
            out.push(0); // terminator
        }
    }

    Ok(out)
}

/// A parsed message: message type, CIC, and the raw parameter sections
/// with codes assigned (fixed parameters get their code from metadata
/// since the wire carries no type octet for them).
#[derive(Debug, Clone)]
pub struct ParsedMessage<'a> {
    pub message_type: MessageType,
    pub cic: Cic,
    pub meta: MessageMeta,
    pub fixed: Vec<(ParamCode, &'a [u8])>,
    pub variable: Vec<(ParamCode, &'a [u8])>,
    pub optional: Vec<(ParamCode, &'a [u8])>,
}

/// Parse a complete ISUP message body (spec §4.3 "Receive algorithm").
/// Unknown mandatory parameters are a framing error (truncation is the
/// only recoverable kind the fixed/variable sections can produce, since
/// their layout is known in advance from metadata); unknown optional
/// parameters are skipped using their own length octet, never fatal.
pub fn parse_message(switch: SwitchType, payload: &[u8]) -> Result<ParsedMessage<'_>, SsError> {
    if payload.len() < 3 {
        return Err(framing("message shorter than cic+type"));
    }
    let cic = decode_cic(&payload[..2], switch)?;
    let type_code = payload[2];
    let message_type =
        MessageType::from_code(type_code).ok_or_else(|| framing("unknown isup message type"))?;
    let meta = metadata::lookup(message_type, switch);

    let mut pos = 3usize;
    let mut fixed = Vec::with_capacity(meta.fixed.len());
    for &code in meta.fixed {
        let len = fixed_len_hint(code);
        let end = pos + len;
        let bytes = payload.get(pos..end).ok_or_else(|| framing("truncated fixed parameter"))?;
        fixed.push((code, bytes));
        pos = end;
    }

    let mut variable = Vec::with_capacity(meta.variable.len());
    if !meta.variable.is_empty() {
        let pointer_section_start = pos;
        let mut data_end_max = pointer_section_start + meta.variable.len();
        for (i, &code) in meta.variable.iter().enumerate() {
            let pointer_offset = pointer_section_start + i;
            let &ptr = payload.get(pointer_offset).ok_or_else(|| framing("truncated variable pointer"))?;
            let param_offset = pointer_offset + ptr as usize;
            let &len = payload.get(param_offset).ok_or_else(|| framing("truncated variable length"))?;
            let data_start = param_offset + 1;
            let data_end = data_start + len as usize;
            let bytes = payload.get(data_start..data_end).ok_or_else(|| framing("truncated variable data"))?;
            variable.push((code, bytes));
            data_end_max = data_end_max.max(data_end);
        }
        // The optional section's pointer octet, if any, sits right after
        // the last variable parameter's data — the pointers may not be in
        // increasing order on the wire, though this engine always writes
        // them in order.
        pos = data_end_max;
    }

    let mut optional = Vec::new();
    if meta.optional_allowed {
        if let Some(&ptr) = payload.get(pos) {
            if ptr != 0 {
                let mut opt_pos = pos + ptr as usize;
                loop {
                    let &type_octet = payload.get(opt_pos).ok_or_else(|| framing("truncated optional type"))?;
                    if type_octet == 0 {
                        break;
                    }
                    let &len = payload.get(opt_pos + 1).ok_or_else(|| framing("truncated optional length"))?;
                    let data_start = opt_pos + 2;
                    let data_end = data_start + len as usize;
                    let bytes =
                        payload.get(data_start..data_end).ok_or_else(|| framing("truncated optional data"))?;
                    optional.push((ParamCode::from_code(type_octet), bytes));
                    opt_pos = data_end;
                }
            }
            pos += 1;
        }
    }
    let _ = pos;

    Ok(ParsedMessage { message_type, cic, meta, fixed, variable, optional })
}

/// Wire length of a fixed parameter, by code. Only the codes that ever
/// appear in a metadata `fixed` slice need an entry.
fn fixed_len_hint(code: ParamCode) -> usize {
    match code {
        ParamCode::NatureOfConnectionInd => 1,
        ParamCode::ForwardCallInd => 2,
        ParamCode::CallingPartyCategory => 1,
        ParamCode::TransmissionMediumRequirement => 1,
        ParamCode::BackwardCallInd => 2,
        ParamCode::ContinuityInd => 1,
        ParamCode::EventInfo => 1,
        ParamCode::CircuitGroupSupervisionInd => 1,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cic_masks_to_twelve_bits_on_itu() {
        let bytes = encode_cic(Cic(0x1fff), SwitchType::Itu);
        let decoded = decode_cic(&bytes, SwitchType::Itu).unwrap();
        assert_eq!(decoded, Cic(0x0fff));
    }

    #[test]
    fn cic_masks_to_fourteen_bits_on_ansi() {
        let bytes = encode_cic(Cic(0x7fff), SwitchType::Ansi);
        let decoded = decode_cic(&bytes, SwitchType::Ansi).unwrap();
        assert_eq!(decoded, Cic(0x3fff));
    }

    #[test]
    fn build_and_parse_round_trip_with_fixed_variable_and_optional() {
        let fixed = vec![
            EncodedParam::new(ParamCode::NatureOfConnectionInd, vec![0x00]),
            EncodedParam::new(ParamCode::ForwardCallInd, vec![0x00, 0x00]),
            EncodedParam::new(ParamCode::CallingPartyCategory, vec![0x0a]),
            EncodedParam::new(ParamCode::TransmissionMediumRequirement, vec![0x00]),
        ];
        let variable = vec![EncodedParam::new(ParamCode::CalledPartyNumber, vec![0x81, 0x10, 0x21, 0x43])];
        let optional = vec![EncodedParam::new(ParamCode::GenericDigits, vec![0xaa, 0xbb])];

        let wire = build_message(SwitchType::Itu, MessageType::Iam, Cic(1), &fixed, &variable, &optional).unwrap();
        let parsed = parse_message(SwitchType::Itu, &wire).unwrap();

        assert_eq!(parsed.message_type, MessageType::Iam);
        assert_eq!(parsed.cic, Cic(1));
        assert_eq!(parsed.fixed.len(), 4);
        assert_eq!(parsed.variable.len(), 1);
        assert_eq!(parsed.variable[0].1, &[0x81, 0x10, 0x21, 0x43]);
        assert_eq!(parsed.optional.len(), 1);
        assert_eq!(parsed.optional[0].0, ParamCode::GenericDigits);
        assert_eq!(parsed.optional[0].1, &[0xaa, 0xbb]);
    }

    #[test]
    fn parameter_count_mismatch_is_config_error() {
        let err = build_message(SwitchType::Itu, MessageType::Iam, Cic(1), &[], &[], &[]).unwrap_err();
        assert_eq!(err.kind, Kind::Config);
    }

    #[test]
    fn unknown_optional_is_parsed_and_skippable() {
        let variable = vec![EncodedParam::new(ParamCode::Cause, vec![0x8a, 0x90])];
        let optional = vec![EncodedParam::new(ParamCode::Unknown(0x7e), vec![1, 2, 3])];
        let wire = build_message(SwitchType::Itu, MessageType::Rel, Cic(5), &[], &variable, &optional).unwrap();
        let parsed = parse_message(SwitchType::Itu, &wire).unwrap();
        assert_eq!(parsed.optional[0].0, ParamCode::Unknown(0x7e));
    }

    #[test]
    fn truncated_message_is_framing_error() {
        let err = parse_message(SwitchType::Itu, &[0x01]).unwrap_err();
        assert_eq!(err.kind, Kind::Framing);
    }

    #[test]
    fn ansi_rlc_rejects_optional_parameters_at_build_time() {
        let optional = vec![EncodedParam::new(ParamCode::Unknown(0x10), vec![1])];
        let err = build_message(SwitchType::Ansi, MessageType::Rlc, Cic(1), &[], &[], &optional).unwrap_err();
        assert_eq!(err.kind, Kind::Config);
    }
}
