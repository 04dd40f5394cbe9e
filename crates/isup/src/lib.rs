//! ISUP call-control codec and call-record engine (spec §3 "ISUP Call",
//! §4.3 "Parameter codec", §6 "ISUP call operations").
//!
//! This crate never touches a socket or a link: it builds and parses
//! message bodies (`CIC | type | fixed | variable | optional`) and owns
//! the `(DPC, CIC)`-keyed call table. The `ss7` facade crate hands
//! [`IsupEngine::receive`] the payload `mtp3::LinkSet` decoded out of an
//! `Mtp3Event::Isup`, and takes the `Vec<u8>` from `IsupEngine`'s message
//! builders straight into `LinkSet::send(UserPart::Isup, ..)`.

pub mod call;
pub mod cause;
pub mod codec;
pub mod events;
pub mod message;
pub mod metadata;
pub mod numbers;
pub mod parameters;

pub use call::{CallTable, IsupCall, Lspi};
pub use cause::Cause;
pub use codec::{EncodedParam, ParsedMessage};
pub use events::IsupEvent;
pub use message::MessageType;
pub use parameters::{CircuitGroupSupervisionInd, EventInfo, NumberParam, ParamCode, RangeAndStatus};

use ss7_core::{Cic, PointCode, SwitchType};
use ss7_error::{Kind, Layer, SsError};

/// The host-facing ISUP engine (spec §6): owns the call table for one
/// signalling point and turns host calls into wire-ready message bodies,
/// and wire bytes into [`IsupEvent`]s.
pub struct IsupEngine {
    switch: SwitchType,
    calls: CallTable,
}

fn no_such_call() -> SsError {
    SsError::new(Layer::Isup, Kind::Config, "no call record for (dpc, cic)")
}

fn missing_called_party() -> SsError {
    SsError::new(Layer::Isup, Kind::Config, "iam requires a called party number")
}

impl IsupEngine {
    pub fn new(switch: SwitchType) -> Self {
        Self { switch, calls: CallTable::new() }
    }

    pub fn calls(&self) -> &CallTable {
        &self.calls
    }

    /// `ISUP_NEW_CALL`/`ISUP_INIT_CALL`: allocate (or fetch, if one
    /// already exists) the call record for `(dpc, cic)`.
    pub fn init_call(&mut self, dpc: PointCode, cic: Cic) -> &mut IsupCall {
        self.calls.create(dpc, cic)
    }

    pub fn new_call(&mut self, dpc: PointCode, cic: Cic) -> &mut IsupCall {
        self.init_call(dpc, cic)
    }

    fn call_mut(&mut self, dpc: PointCode, cic: Cic) -> Result<&mut IsupCall, SsError> {
        self.calls.find_mut(dpc, cic).ok_or_else(no_such_call)
    }

    // -- setters (spec §6: "setters for called/calling/charge/OLI/
    // generic-address/generic-digits/JIP/LSPI/callref") --

    /// ITU revisions append a trailing `#` end-of-number marker to the
    /// called-party digits (`original_source/isup.c`'s
    /// `isup_set_called`'s `snprintf(..., "%s#", called)` on
    /// `SS7_ITU`); ANSI leaves the digits untouched.
    pub fn set_called(&mut self, dpc: PointCode, cic: Cic, mut number: NumberParam) -> Result<(), SsError> {
        if self.switch == SwitchType::Itu {
            number.digits.push('#');
        }
        self.call_mut(dpc, cic)?.called = Some(number);
        Ok(())
    }

    pub fn set_calling(&mut self, dpc: PointCode, cic: Cic, number: NumberParam) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.calling = Some(number);
        Ok(())
    }

    pub fn set_charge_number(&mut self, dpc: PointCode, cic: Cic, number: NumberParam) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.charge_number = Some(number);
        Ok(())
    }

    pub fn set_oli(&mut self, dpc: PointCode, cic: Cic, oli: u8) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.oli = Some(oli);
        Ok(())
    }

    pub fn set_generic_address(&mut self, dpc: PointCode, cic: Cic, number: NumberParam) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.generic_address = Some(number);
        Ok(())
    }

    pub fn set_generic_digits(&mut self, dpc: PointCode, cic: Cic, digits: impl Into<String>) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.generic_digits = Some(digits.into());
        Ok(())
    }

    pub fn set_jip(&mut self, dpc: PointCode, cic: Cic, jip: impl Into<String>) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.jip = Some(jip.into());
        Ok(())
    }

    pub fn set_lspi(&mut self, dpc: PointCode, cic: Cic, lspi: Lspi) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.lspi = Some(lspi);
        Ok(())
    }

    pub fn set_call_reference(&mut self, dpc: PointCode, cic: Cic, reference: u32, owner: PointCode) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.call_reference = Some((reference, owner));
        Ok(())
    }

    pub fn set_nature_of_connection(&mut self, dpc: PointCode, cic: Cic, value: u8) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.nature_of_connection = Some(value);
        Ok(())
    }

    pub fn set_forward_call_ind(&mut self, dpc: PointCode, cic: Cic, value: u16) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.forward_call_ind = Some(value);
        Ok(())
    }

    pub fn set_calling_party_category(&mut self, dpc: PointCode, cic: Cic, value: u8) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.calling_party_category = Some(value);
        Ok(())
    }

    pub fn set_transmission_medium_requirement(&mut self, dpc: PointCode, cic: Cic, value: u8) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.transmission_medium_requirement = Some(value);
        Ok(())
    }

    pub fn set_user_service_info(&mut self, dpc: PointCode, cic: Cic, bytes: Vec<u8>) -> Result<(), SsError> {
        self.call_mut(dpc, cic)?.user_service_info = Some(bytes);
        Ok(())
    }

    // -- message builders (spec §6, §4.3 "Send algorithm") --

    /// Build an IAM for `(dpc, cic)`. The call record must already carry
    /// a called-party number (`set_called`); calling party and the
    /// generic-digits/JIP/generic-address optionals are included only
    /// when present.
    pub fn iam(&mut self, dpc: PointCode, cic: Cic) -> Result<Vec<u8>, SsError> {
        let switch = self.switch;
        let call = self.call_mut(dpc, cic)?;
        let called = call.called.clone().ok_or_else(missing_called_party)?;

        let mut fixed = vec![
            EncodedParam::new(ParamCode::NatureOfConnectionInd, vec![call.nature_of_connection.unwrap_or(0)]),
            EncodedParam::new(
                ParamCode::ForwardCallInd,
                call.forward_call_ind.unwrap_or(0).to_le_bytes().to_vec(),
            ),
            EncodedParam::new(
                ParamCode::CallingPartyCategory,
                vec![call.calling_party_category.unwrap_or(0x0a)],
            ),
        ];
        let mut variable = Vec::new();
        match switch {
            SwitchType::Itu => {
                fixed.push(EncodedParam::new(
                    ParamCode::TransmissionMediumRequirement,
                    vec![call.transmission_medium_requirement.unwrap_or(0)],
                ));
                variable.push(EncodedParam::new(ParamCode::CalledPartyNumber, called.encode_called()));
            }
            SwitchType::Ansi => {
                variable.push(EncodedParam::new(
                    ParamCode::UserServiceInfo,
                    call.user_service_info.clone().unwrap_or_default(),
                ));
                variable.push(EncodedParam::new(ParamCode::CalledPartyNumber, called.encode_called()));
            }
        }

        let mut optional = Vec::new();
        if let Some(calling) = &call.calling {
            optional.push(EncodedParam::new(ParamCode::CallingPartyNumber, calling.encode_full()));
        }
        if let Some(digits) = &call.generic_digits {
            optional.push(EncodedParam::new(ParamCode::GenericDigits, digits.as_bytes().to_vec()));
        }
        if let Some(jip) = &call.jip {
            optional.push(EncodedParam::new(ParamCode::Jip, jip.as_bytes().to_vec()));
        }
        if let Some(address) = &call.generic_address {
            optional.push(EncodedParam::new(ParamCode::GenericAddress, address.encode_full()));
        }

        codec::build_message(switch, MessageType::Iam, cic, &fixed, &variable, &optional)
    }

    pub fn acm(&mut self, dpc: PointCode, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.fixed_word_message(dpc, cic, MessageType::Acm, |c| c.backward_call_ind)
    }

    pub fn con(&mut self, dpc: PointCode, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.fixed_word_message(dpc, cic, MessageType::Con, |c| c.backward_call_ind)
    }

    fn fixed_word_message(
        &mut self,
        dpc: PointCode,
        cic: Cic,
        message_type: MessageType,
        field: impl Fn(&IsupCall) -> Option<u16>,
    ) -> Result<Vec<u8>, SsError> {
        let switch = self.switch;
        let call = self.call_mut(dpc, cic)?;
        let fixed = vec![EncodedParam::new(
            ParamCode::BackwardCallInd,
            field(call).unwrap_or(0).to_le_bytes().to_vec(),
        )];
        codec::build_message(switch, message_type, cic, &fixed, &[], &[])
    }

    pub fn anm(&mut self, dpc: PointCode, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.call_mut(dpc, cic)?;
        codec::build_message(self.switch, MessageType::Anm, cic, &[], &[], &[])
    }

    /// `ISUP_REL(cause)`. Does not free the call record — `RLC` does,
    /// mirroring spec §3's lifecycle ("freed on RLC, not on REL").
    pub fn rel(&mut self, dpc: PointCode, cic: Cic, cause: Cause) -> Result<Vec<u8>, SsError> {
        let switch = self.switch;
        let call = self.call_mut(dpc, cic)?;
        call.cause_value = Some(cause.value);
        call.cause_location = Some(cause.location);
        let variable = vec![EncodedParam::new(ParamCode::Cause, parameters::encode_cause(cause))];
        codec::build_message(switch, MessageType::Rel, cic, &[], &variable, &[])
    }

    pub fn rlc(&mut self, dpc: PointCode, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.call_mut(dpc, cic)?;
        let body = codec::build_message(self.switch, MessageType::Rlc, cic, &[], &[], &[])?;
        self.calls.free(dpc, cic);
        Ok(body)
    }

    pub fn cpg(&mut self, dpc: PointCode, cic: Cic, event: EventInfo) -> Result<Vec<u8>, SsError> {
        self.call_mut(dpc, cic)?;
        let fixed = vec![EncodedParam::new(ParamCode::EventInfo, event.encode().to_vec())];
        codec::build_message(self.switch, MessageType::Cpg, cic, &fixed, &[], &[])
    }

    // -- circuit supervision (spec §6: grs/gra/cgb/cgu/cgba/cgua/blo/bla/
    // ubl/uba/rsc/lpa/ucic/ccr/cqr) --

    fn range_message(
        &mut self,
        message_type: MessageType,
        base_cic: Cic,
        startcic: u16,
        endcic: u16,
        status: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, SsError> {
        if endcic < startcic {
            return Err(SsError::new(Layer::Isup, Kind::Config, "circuit range end precedes start"));
        }
        let range = RangeAndStatus { range: (endcic - startcic) as u8, status };
        let variable = vec![EncodedParam::new(ParamCode::RangeAndStatus, range.encode())];
        codec::build_message(self.switch, message_type, base_cic, &[], &variable, &[])
    }

    pub fn grs(&mut self, cic: Cic, startcic: u16, endcic: u16) -> Result<Vec<u8>, SsError> {
        self.range_message(MessageType::Grs, cic, startcic, endcic, None)
    }

    pub fn gra(&mut self, cic: Cic, startcic: u16, endcic: u16, status: Vec<u8>) -> Result<Vec<u8>, SsError> {
        self.range_message(MessageType::Gra, cic, startcic, endcic, Some(status))
    }

    pub fn cqm(&mut self, cic: Cic, startcic: u16, endcic: u16) -> Result<Vec<u8>, SsError> {
        self.range_message(MessageType::Cqm, cic, startcic, endcic, None)
    }

    pub fn cqr(&mut self, cic: Cic, startcic: u16, endcic: u16, status: Vec<u8>) -> Result<Vec<u8>, SsError> {
        self.range_message(MessageType::Cqr, cic, startcic, endcic, Some(status))
    }

    fn group_message(
        &mut self,
        message_type: MessageType,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<Vec<u8>, SsError> {
        if endcic < startcic {
            return Err(SsError::new(Layer::Isup, Kind::Config, "circuit range end precedes start"));
        }
        let fixed = vec![EncodedParam::new(ParamCode::CircuitGroupSupervisionInd, supervision.encode().to_vec())];
        let range = RangeAndStatus { range: (endcic - startcic) as u8, status: None };
        let variable = vec![EncodedParam::new(ParamCode::RangeAndStatus, range.encode())];
        codec::build_message(self.switch, message_type, cic, &fixed, &variable, &[])
    }

    pub fn cgb(
        &mut self,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<Vec<u8>, SsError> {
        self.group_message(MessageType::Cgb, cic, startcic, endcic, supervision)
    }

    pub fn cgu(
        &mut self,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<Vec<u8>, SsError> {
        self.group_message(MessageType::Cgu, cic, startcic, endcic, supervision)
    }

    pub fn cgba(
        &mut self,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<Vec<u8>, SsError> {
        self.group_message(MessageType::Cgba, cic, startcic, endcic, supervision)
    }

    pub fn cgua(
        &mut self,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<Vec<u8>, SsError> {
        self.group_message(MessageType::Cgua, cic, startcic, endcic, supervision)
    }

    fn bare_message(&self, message_type: MessageType, cic: Cic) -> Result<Vec<u8>, SsError> {
        codec::build_message(self.switch, message_type, cic, &[], &[], &[])
    }

    pub fn blo(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Blo, cic)
    }

    pub fn bla(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Bla, cic)
    }

    pub fn ubl(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Ubl, cic)
    }

    pub fn uba(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Uba, cic)
    }

    pub fn rsc(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Rsc, cic)
    }

    pub fn lpa(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Lpa, cic)
    }

    pub fn ucic(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Ucic, cic)
    }

    pub fn ccr(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Ccr, cic)
    }

    pub fn cot(&self, cic: Cic, passed: bool) -> Result<Vec<u8>, SsError> {
        let fixed = vec![EncodedParam::new(ParamCode::ContinuityInd, vec![passed as u8])];
        codec::build_message(self.switch, MessageType::Cot, cic, &fixed, &[], &[])
    }

    pub fn faa(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Faa, cic)
    }

    pub fn far(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Far, cic)
    }

    pub fn sus(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Sus, cic)
    }

    pub fn res(&self, cic: Cic) -> Result<Vec<u8>, SsError> {
        self.bare_message(MessageType::Res, cic)
    }

    /// Parse a wire payload into an [`IsupEvent`], creating, updating, or
    /// freeing the matching call record as spec §3 invariant 3 dictates.
    /// IAM allocates the call-associated record; RLC/RSC free it directly.
    /// GRS/CQM/CGB/CGU/BLO/UBL/LPA/CCR each allocate a transient record
    /// keyed by `(opc, cic)` instead, freed by their completion
    /// counterpart (GRA/CQR/CGBA/CGUA/BLA/UBA/UCIC) — a
    /// CGBA/CGUA/BLA/UBA/UCIC with no matching transient still frees a
    /// stray call-associated record on that CIC.
    pub fn receive(&mut self, opc: PointCode, payload: &[u8]) -> Result<IsupEvent, SsError> {
        let switch = self.switch;
        let parsed = codec::parse_message(switch, payload)?;
        let cic = parsed.cic;

        let event = match parsed.message_type {
            MessageType::Iam => {
                let called = NumberParam::decode_called(parsed.variable_bytes(ParamCode::CalledPartyNumber)?)?;
                let calling = parsed
                    .optional
                    .iter()
                    .find(|(code, _)| *code == ParamCode::CallingPartyNumber)
                    .map(|(_, bytes)| NumberParam::decode_full(bytes))
                    .transpose()?;
                let call = self.calls.create(opc, cic);
                call.called = Some(called.clone());
                call.calling = calling.clone();
                IsupEvent::Iam { cic, opc, called, calling }
            }
            MessageType::Acm => IsupEvent::Acm { cic, opc },
            MessageType::Anm => IsupEvent::Anm { cic, opc },
            MessageType::Con => IsupEvent::Con { cic, opc },
            MessageType::Rel => {
                let cause = parameters::decode_cause(parsed.variable_bytes(ParamCode::Cause)?)?;
                if let Some(call) = self.calls.find_mut(opc, cic) {
                    call.cause_value = Some(cause.value);
                    call.cause_location = Some(cause.location);
                }
                IsupEvent::Rel { cic, opc, cause }
            }
            MessageType::Rlc => {
                self.calls.free(opc, cic);
                IsupEvent::Rlc { cic, opc }
            }
            MessageType::Grs => {
                let range = RangeAndStatus::decode(parsed.variable_bytes(ParamCode::RangeAndStatus)?)?;
                let (startcic, endcic) = (cic.0, cic.0 + range.range as u16);
                let transient = self.calls.create_transient_for(opc, cic);
                transient.group_supervision_start = Some(startcic);
                transient.group_supervision_end = Some(endcic);
                IsupEvent::Grs { cic, opc, startcic, endcic }
            }
            MessageType::Gra => {
                let range = RangeAndStatus::decode(parsed.variable_bytes(ParamCode::RangeAndStatus)?)?;
                self.calls.free_transient_for(opc, cic);
                IsupEvent::Gra { cic, opc, startcic: cic.0, endcic: cic.0 + range.range as u16 }
            }
            MessageType::Cqm => {
                let range = RangeAndStatus::decode(parsed.variable_bytes(ParamCode::RangeAndStatus)?)?;
                let (startcic, endcic) = (cic.0, cic.0 + range.range as u16);
                let transient = self.calls.create_transient_for(opc, cic);
                transient.group_supervision_start = Some(startcic);
                transient.group_supervision_end = Some(endcic);
                IsupEvent::Cqm { cic, opc, startcic, endcic }
            }
            MessageType::Cqr => {
                let range = RangeAndStatus::decode(parsed.variable_bytes(ParamCode::RangeAndStatus)?)?;
                self.calls.free_transient_for(opc, cic);
                IsupEvent::Cqr {
                    cic,
                    opc,
                    startcic: cic.0,
                    endcic: cic.0 + range.range as u16,
                    status: range,
                }
            }
            MessageType::Cgb | MessageType::Cgu | MessageType::Cgba | MessageType::Cgua => {
                let supervision =
                    CircuitGroupSupervisionInd::decode(parsed.fixed_bytes(ParamCode::CircuitGroupSupervisionInd)?)?;
                let range = RangeAndStatus::decode(parsed.variable_bytes(ParamCode::RangeAndStatus)?)?;
                let (startcic, endcic) = (cic.0, cic.0 + range.range as u16);
                match parsed.message_type {
                    MessageType::Cgb => {
                        let transient = self.calls.create_transient_for(opc, cic);
                        transient.group_supervision_start = Some(startcic);
                        transient.group_supervision_end = Some(endcic);
                        IsupEvent::Cgb { cic, opc, startcic, endcic, supervision }
                    }
                    MessageType::Cgu => {
                        let transient = self.calls.create_transient_for(opc, cic);
                        transient.group_supervision_start = Some(startcic);
                        transient.group_supervision_end = Some(endcic);
                        IsupEvent::Cgu { cic, opc, startcic, endcic, supervision }
                    }
                    MessageType::Cgba => {
                        // No matching CGB transient (e.g. an unsolicited ack): fall back to
                        // freeing any call-associated record still sitting on this CIC.
                        if self.calls.free_transient_for(opc, cic).is_none() {
                            self.calls.free(opc, cic);
                        }
                        IsupEvent::Cgba { cic, opc, startcic, endcic }
                    }
                    MessageType::Cgua => {
                        if self.calls.free_transient_for(opc, cic).is_none() {
                            self.calls.free(opc, cic);
                        }
                        IsupEvent::Cgua { cic, opc, startcic, endcic }
                    }
                    _ => unreachable!(),
                }
            }
            MessageType::Cot => {
                let &[passed] = parsed.fixed_bytes(ParamCode::ContinuityInd)? else {
                    return Err(SsError::with_detail(Layer::Isup, Kind::Framing, "truncated parameter", "cot"));
                };
                IsupEvent::Cot { cic, opc, passed: passed != 0 }
            }
            MessageType::Ccr => {
                self.calls.create_transient_for(opc, cic);
                IsupEvent::Ccr { cic, opc }
            }
            MessageType::Blo => {
                self.calls.create_transient_for(opc, cic);
                IsupEvent::Blo { cic, opc }
            }
            MessageType::Ubl => {
                self.calls.create_transient_for(opc, cic);
                IsupEvent::Ubl { cic, opc }
            }
            MessageType::Bla => {
                if self.calls.free_transient_for(opc, cic).is_none() {
                    self.calls.free(opc, cic);
                }
                IsupEvent::Bla { cic, opc }
            }
            MessageType::Uba => {
                if self.calls.free_transient_for(opc, cic).is_none() {
                    self.calls.free(opc, cic);
                }
                IsupEvent::Uba { cic, opc }
            }
            MessageType::Rsc => {
                self.calls.free(opc, cic);
                IsupEvent::Rsc { cic, opc }
            }
            MessageType::Cpg => {
                let event = EventInfo::decode(parsed.fixed_bytes(ParamCode::EventInfo)?)?;
                IsupEvent::Cpg { cic, opc, event }
            }
            MessageType::Ucic => {
                if self.calls.free_transient_for(opc, cic).is_none() {
                    self.calls.free(opc, cic);
                }
                IsupEvent::Ucic { cic, opc }
            }
            MessageType::Lpa => {
                self.calls.create_transient_for(opc, cic);
                IsupEvent::Lpa { cic, opc }
            }
            MessageType::Faa => IsupEvent::Faa { cic, opc },
            MessageType::Far => IsupEvent::Far { cic, opc },
            MessageType::Sus => IsupEvent::Sus { cic, opc },
            MessageType::Res => IsupEvent::Res { cic, opc },
        };
        Ok(event)
    }
}

impl<'a> ParsedMessage<'a> {
    fn fixed_bytes(&self, code: ParamCode) -> Result<&'a [u8], SsError> {
        self.fixed
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, bytes)| *bytes)
            .ok_or_else(|| SsError::with_detail(Layer::Isup, Kind::Framing, "missing fixed parameter", "lookup"))
    }

    fn variable_bytes(&self, code: ParamCode) -> Result<&'a [u8], SsError> {
        self.variable
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, bytes)| *bytes)
            .ok_or_else(|| SsError::with_detail(Layer::Isup, Kind::Framing, "missing variable parameter", "lookup"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iam_requires_called_party_before_build() {
        let mut engine = IsupEngine::new(SwitchType::Itu);
        engine.init_call(PointCode(2), Cic(1));
        let err = engine.iam(PointCode(2), Cic(1)).unwrap_err();
        assert_eq!(err.kind, Kind::Config);
    }

    #[test]
    fn iam_round_trips_through_receive() {
        let mut sender = IsupEngine::new(SwitchType::Itu);
        sender.init_call(PointCode(2), Cic(7));
        sender.set_called(PointCode(2), Cic(7), NumberParam::new(3, "5551234")).unwrap();
        let wire = sender.iam(PointCode(2), Cic(7)).unwrap();

        let mut receiver = IsupEngine::new(SwitchType::Itu);
        let event = receiver.receive(PointCode(9), &wire).unwrap();
        match event {
            IsupEvent::Iam { cic, opc, called, .. } => {
                assert_eq!(cic, Cic(7));
                assert_eq!(opc, PointCode(9));
                assert_eq!(called.digits, "5551234#");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(receiver.calls.contains(PointCode(9), Cic(7)));
    }

    #[test]
    fn rlc_frees_the_call_record() {
        let mut engine = IsupEngine::new(SwitchType::Itu);
        engine.init_call(PointCode(2), Cic(7));
        engine.rlc(PointCode(2), Cic(7)).unwrap();
        assert!(!engine.calls.contains(PointCode(2), Cic(7)));
    }

    #[test]
    fn rel_then_rlc_round_trip_carries_cause() {
        let mut sender = IsupEngine::new(SwitchType::Itu);
        sender.init_call(PointCode(2), Cic(7));
        let cause = Cause::new(0x1, 16);
        let wire = sender.rel(PointCode(2), Cic(7), cause).unwrap();

        let mut receiver = IsupEngine::new(SwitchType::Itu);
        receiver.init_call(PointCode(9), Cic(7));
        let event = receiver.receive(PointCode(9), &wire).unwrap();
        match event {
            IsupEvent::Rel { cause: decoded, .. } => assert_eq!(decoded.value, 16),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn grs_round_trip_reports_circuit_range() {
        let mut sender = IsupEngine::new(SwitchType::Itu);
        let wire = sender.grs(Cic(10), 10, 15).unwrap();

        let mut receiver = IsupEngine::new(SwitchType::Itu);
        let event = receiver.receive(PointCode(1), &wire).unwrap();
        match event {
            IsupEvent::Grs { startcic, endcic, .. } => {
                assert_eq!(startcic, 10);
                assert_eq!(endcic, 15);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn grs_allocates_a_transient_record_freed_by_gra() {
        let mut sender = IsupEngine::new(SwitchType::Itu);
        let grs_wire = sender.grs(Cic(10), 10, 15).unwrap();

        let mut receiver = IsupEngine::new(SwitchType::Itu);
        receiver.receive(PointCode(1), &grs_wire).unwrap();
        assert_eq!(receiver.calls.transient_count(), 1);
        assert!(!receiver.calls.contains(PointCode(1), Cic(10)));

        let gra_wire = receiver.gra(Cic(10), 10, 15, vec![0u8; 1]).unwrap();
        receiver.receive(PointCode(1), &gra_wire).unwrap();
        assert_eq!(receiver.calls.transient_count(), 0);
    }

    #[test]
    fn blo_allocates_a_transient_record_freed_by_bla() {
        let mut engine = IsupEngine::new(SwitchType::Itu);
        let blo_wire = engine.blo(Cic(5)).unwrap();
        engine.receive(PointCode(2), &blo_wire).unwrap();
        assert_eq!(engine.calls.transient_count(), 1);

        let bla_wire = engine.bla(Cic(5)).unwrap();
        engine.receive(PointCode(2), &bla_wire).unwrap();
        assert_eq!(engine.calls.transient_count(), 0);
    }

    #[test]
    fn lpa_allocates_a_transient_record_freed_by_ucic() {
        let mut engine = IsupEngine::new(SwitchType::Itu);
        let lpa_wire = engine.lpa(Cic(5)).unwrap();
        engine.receive(PointCode(2), &lpa_wire).unwrap();
        assert_eq!(engine.calls.transient_count(), 1);

        let ucic_wire = engine.ucic(Cic(5)).unwrap();
        engine.receive(PointCode(2), &ucic_wire).unwrap();
        assert_eq!(engine.calls.transient_count(), 0);
    }

    #[test]
    fn ccr_allocates_a_transient_record() {
        let mut engine = IsupEngine::new(SwitchType::Itu);
        let ccr_wire = engine.ccr(Cic(6)).unwrap();
        engine.receive(PointCode(2), &ccr_wire).unwrap();
        assert_eq!(engine.calls.transient_count(), 1);
    }

    #[test]
    fn ucic_with_no_pending_transient_still_frees_a_stray_call_record() {
        let mut engine = IsupEngine::new(SwitchType::Itu);
        engine.init_call(PointCode(2), Cic(5));
        assert!(engine.calls.contains(PointCode(2), Cic(5)));

        let ucic_wire = engine.ucic(Cic(5)).unwrap();
        engine.receive(PointCode(2), &ucic_wire).unwrap();
        assert!(!engine.calls.contains(PointCode(2), Cic(5)));
    }

    #[test]
    fn bla_with_no_pending_transient_still_frees_a_stray_call_record() {
        let mut engine = IsupEngine::new(SwitchType::Itu);
        engine.init_call(PointCode(2), Cic(5));
        assert!(engine.calls.contains(PointCode(2), Cic(5)));

        let bla_wire = engine.bla(Cic(5)).unwrap();
        engine.receive(PointCode(2), &bla_wire).unwrap();
        assert!(!engine.calls.contains(PointCode(2), Cic(5)));
    }

    #[test]
    fn cgb_round_trip_carries_supervision_kind() {
        let mut sender = IsupEngine::new(SwitchType::Itu);
        let supervision = CircuitGroupSupervisionInd { supervision_type: 1 };
        let wire = sender.cgb(Cic(20), 20, 23, supervision).unwrap();

        let mut receiver = IsupEngine::new(SwitchType::Itu);
        let event = receiver.receive(PointCode(1), &wire).unwrap();
        match event {
            IsupEvent::Cgb { supervision, endcic, .. } => {
                assert_eq!(supervision.supervision_type, 1);
                assert_eq!(endcic, 23);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn ansi_iam_uses_user_service_info_instead_of_tmr() {
        let mut engine = IsupEngine::new(SwitchType::Ansi);
        engine.init_call(PointCode(2), Cic(7));
        engine.set_called(PointCode(2), Cic(7), NumberParam::new(3, "911")).unwrap();
        engine.set_user_service_info(PointCode(2), Cic(7), vec![0x02, 0x00, 0x00]).unwrap();
        let wire = engine.iam(PointCode(2), Cic(7)).unwrap();
        let parsed = codec::parse_message(SwitchType::Ansi, &wire).unwrap();
        assert_eq!(parsed.variable[0].0, ParamCode::UserServiceInfo);
        assert_eq!(parsed.variable[1].0, ParamCode::CalledPartyNumber);
    }
}
