//! The host-facing `Ss7` engine (spec §6): wires one [`mtp3::LinkSet`] and
//! one [`isup::IsupEngine`] to a set of host file descriptors, translating
//! wire bytes into queued [`Ss7Event`]s and host calls into queued wire
//! bytes.
//!
//! Mirrors the source's single `struct ss7` per signalling point: every
//! link, every call record, and the process-wide event ring live behind
//! one `Ss7` value, exactly as `ss7_new`/`ss7_add_link` build up one `struct
//! ss7` with up to `SS7_MAX_LINKS` links hanging off it.

use std::os::unix::io::RawFd;
use std::time::Instant;

use ss7_core::{Cic, EventQueue, PointCode, Slc, SwitchType, Trace};
use ss7_error::{Kind, Layer, SsError};
use isup::{
    Cause, CircuitGroupSupervisionInd, EventInfo, IsupCall, IsupEngine, Lspi, NumberParam,
};
use mtp2::{FdTransport, Transport};
use mtp3::{LinkSet, Mtp3Event, NetworkIndicator, UserPart};

use crate::event::Ss7Event;
use crate::transport::{self, TcpFrame, TcpFramer, TransportKind};

fn unknown_fd() -> SsError {
    SsError::new(Layer::Engine, Kind::Config, "unknown fd")
}

fn os_error(what: &'static str) -> SsError {
    let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
    SsError::with_detail(Layer::Engine, Kind::FatalLink, what, format!("errno {errno}"))
}

/// What the host's poll loop should wait for on one link's fd (spec §6's
/// `pollflags`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollFlags {
    pub read: bool,
    pub write: bool,
}

struct LinkRuntime {
    fd: RawFd,
    slc: Slc,
    kind: TransportKind,
    framer: TcpFramer,
}

/// One SS7 signalling point: a link-set, a call table, and a bounded event
/// queue, addressed by the host through file descriptors rather than
/// [`Slc`]s directly.
pub struct Ss7 {
    own_pc: PointCode,
    linkset: LinkSet,
    isup: IsupEngine,
    events: EventQueue<Ss7Event>,
    links: Vec<LinkRuntime>,
    debug: u32,
    trace: Box<dyn Trace>,
}

impl Ss7 {
    pub fn new(switch_type: SwitchType) -> Self {
        Self::with_trace(switch_type, Box::new(ss7_core::StderrTrace::from_env()))
    }

    pub fn with_trace(switch_type: SwitchType, trace: Box<dyn Trace>) -> Self {
        Self {
            own_pc: PointCode::ZERO,
            linkset: LinkSet::new(switch_type, PointCode::ZERO, NetworkIndicator::National),
            isup: IsupEngine::new(switch_type),
            events: EventQueue::new(),
            links: Vec::new(),
            debug: 0,
            trace,
        }
    }

    // -- configuration (spec §6) --

    pub fn set_pc(&mut self, pc: PointCode) {
        self.own_pc = pc;
        self.linkset.set_pc(pc);
    }

    pub fn set_network_ind(&mut self, ni: NetworkIndicator) {
        self.linkset.set_network_ind(ni);
    }

    pub fn set_default_dpc(&mut self, pc: PointCode) {
        self.linkset.set_default_dpc(pc);
    }

    pub fn set_adjpc(&mut self, fd: RawFd, pc: PointCode) -> Result<(), SsError> {
        let slc = self.slc_of(fd)?;
        self.linkset.set_adjpc(slc, pc)
    }

    pub fn set_debug(&mut self, flags: u32) {
        self.debug = flags;
    }

    pub fn debug(&self) -> u32 {
        self.debug
    }

    /// Add a link bound to `fd`, framed per `transport`. `fd` is a plain
    /// identifier from here on — the engine itself performs `read(2)`/
    /// `write(2)` against it in [`Ss7::read`]/[`Ss7::write`], exactly as the
    /// source's `ss7_read`/`ss7_write` found the link by fd and called
    /// `read()`/`write()` on it directly.
    pub fn add_link(&mut self, transport: TransportKind, fd: RawFd) -> Result<Slc, SsError> {
        let slc = self.linkset.add_link();
        self.links.push(LinkRuntime { fd, slc, kind: transport, framer: TcpFramer::new() });
        Ok(slc)
    }

    /// Begin alignment on every link whose transport runs this engine's
    /// own MTP2 state machine. Links on an MTP2-offload transport (TCP)
    /// never align locally — they come up when their peer says so.
    pub fn start(&mut self) -> Result<(), SsError> {
        let now = Instant::now();
        for idx in 0..self.links.len() {
            let (slc, kind) = (self.links[idx].slc, self.links[idx].kind);
            if !kind.is_mtp2_offload() {
                self.linkset.start_link(slc, false, now)?;
            }
        }
        Ok(())
    }

    pub fn link_alarm(&mut self, fd: RawFd) -> Result<(), SsError> {
        let slc = self.slc_of(fd)?;
        self.linkset.link_alarm(slc)
    }

    pub fn link_noalarm(&mut self, fd: RawFd) -> Result<(), SsError> {
        let slc = self.slc_of(fd)?;
        self.linkset.link_noalarm(slc)
    }

    /// `pollflags(fd)` (spec §6): read is always wanted; write is wanted
    /// unconditionally on a DAHDI-style link (it must always be able to
    /// emit its automatic fill/status SU) and only when output is actually
    /// buffered on an MTP2-offload link.
    pub fn pollflags(&self, fd: RawFd) -> Result<PollFlags, SsError> {
        let rt = self.runtime_of(fd)?;
        let write = if rt.kind.is_mtp2_offload() {
            self.linkset.has_buffered_output(rt.slc)?
        } else {
            true
        };
        Ok(PollFlags { read: true, write })
    }

    // -- byte-stream I/O (spec §6) --

    /// Read whatever is available on `fd` and drive it through this link,
    /// queuing every event produced. DAHDI-style transports deliver exactly
    /// one SU per read, preserved by the kernel driver and read through the
    /// [`FdTransport`] seam; TCP is decoded incrementally through a
    /// length-prefixed, state-tagged frame stream read straight off the fd.
    pub fn read(&mut self, fd: RawFd) -> Result<(), SsError> {
        let idx = self.index_of(fd)?;
        let kind = self.links[idx].kind;
        let slc = self.links[idx].slc;

        let mtp3_events = if kind.is_mtp2_offload() {
            let mut buf = [0u8; 4096];
            let n = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
            if n < 0 {
                return Err(os_error("read(2) failed"));
            }
            if n == 0 {
                return Ok(());
            }
            let bytes = &buf[..n as usize];
            let frames = self.links[idx].framer.push(bytes);
            let mut out = Vec::new();
            for frame in frames {
                match frame {
                    TcpFrame::Up => out.extend(self.linkset.set_link_status_external(slc, true, Instant::now())?),
                    TcpFrame::Down => out.extend(self.linkset.set_link_status_external(slc, false, Instant::now())?),
                    TcpFrame::Isup(payload) => {
                        if let Some(ev) = self.linkset.receive_payload(slc, &payload)? {
                            out.push(ev);
                        }
                    }
                }
            }
            out
        } else {
            match FdTransport(fd).read_su().map_err(|_| os_error("read(2) failed"))? {
                Some(bytes) => self.linkset.receive(slc, &bytes, Instant::now())?,
                None => return Ok(()),
            }
        };
        self.absorb(mtp3_events);
        Ok(())
    }

    /// Write one pending unit of output to `fd`: one SU on a DAHDI-style
    /// link (through [`FdTransport`]), one ISUP-payload frame on an
    /// MTP2-offload link. A no-op (not an error) if there is nothing queued
    /// for an offloaded link.
    pub fn write(&mut self, fd: RawFd) -> Result<(), SsError> {
        let idx = self.index_of(fd)?;
        let kind = self.links[idx].kind;
        let slc = self.links[idx].slc;

        if kind.is_mtp2_offload() {
            let wire = match self.linkset.pop_tx_payload(slc)? {
                Some(payload) => transport::build_isup_frame(&payload),
                None => return Ok(()),
            };
            let n = unsafe { libc::write(fd, wire.as_ptr() as *const libc::c_void, wire.len()) };
            if n < 0 {
                return Err(os_error("write(2) failed"));
            }
        } else {
            let wire = self.linkset.poll_tx(slc)?;
            FdTransport(fd).write_su(&wire).map_err(|_| os_error("write(2) failed"))?;
        }
        Ok(())
    }

    // -- scheduling (spec §6) --

    pub fn schedule_next(&self) -> Option<Instant> {
        self.linkset.next_deadline()
    }

    pub fn schedule_run(&mut self) {
        let events = self.linkset.run_timers(Instant::now());
        self.absorb(events);
    }

    pub fn check_event(&mut self) -> Option<Ss7Event> {
        self.events.pop()
    }

    // -- event/transmit plumbing --

    fn absorb(&mut self, mtp3_events: Vec<Mtp3Event>) {
        for ev in mtp3_events {
            let translated = match ev {
                Mtp3Event::LinkUp(slc) => Ss7Event::LinkUp(slc),
                Mtp3Event::LinkDown(slc) => Ss7Event::LinkDown(slc),
                Mtp3Event::ProcessUp => Ss7Event::ProcessUp,
                Mtp3Event::Isup { opc, payload } => match self.isup.receive(opc, &payload) {
                    Ok(isup_event) => Ss7Event::Isup(isup_event),
                    Err(err) => {
                        self.trace.warn(None, &format!("dropping unparseable isup payload: {err}"));
                        continue;
                    }
                },
            };
            if let Err(err) = self.events.push(translated) {
                self.trace.warn(None, &format!("event queue full, dropping event: {err}"));
            }
        }
    }

    fn transmit(&mut self, dpc: PointCode, body: Vec<u8>) -> Result<(), SsError> {
        self.linkset.send(UserPart::Isup, self.own_pc, dpc, &body)?;
        Ok(())
    }

    fn index_of(&self, fd: RawFd) -> Result<usize, SsError> {
        self.links.iter().position(|l| l.fd == fd).ok_or_else(unknown_fd)
    }

    fn runtime_of(&self, fd: RawFd) -> Result<&LinkRuntime, SsError> {
        self.index_of(fd).map(|idx| &self.links[idx])
    }

    fn slc_of(&self, fd: RawFd) -> Result<Slc, SsError> {
        self.runtime_of(fd).map(|rt| rt.slc)
    }

    // -- ISUP call operations (spec §6) --

    pub fn new_call(&mut self, dpc: PointCode, cic: Cic) -> &mut IsupCall {
        self.isup.new_call(dpc, cic)
    }

    pub fn init_call(&mut self, dpc: PointCode, cic: Cic) -> &mut IsupCall {
        self.isup.init_call(dpc, cic)
    }

    pub fn call(&self, dpc: PointCode, cic: Cic) -> Option<&IsupCall> {
        self.isup.calls().find(dpc, cic)
    }

    pub fn set_called(&mut self, dpc: PointCode, cic: Cic, number: NumberParam) -> Result<(), SsError> {
        self.isup.set_called(dpc, cic, number)
    }

    pub fn set_calling(&mut self, dpc: PointCode, cic: Cic, number: NumberParam) -> Result<(), SsError> {
        self.isup.set_calling(dpc, cic, number)
    }

    pub fn set_charge_number(&mut self, dpc: PointCode, cic: Cic, number: NumberParam) -> Result<(), SsError> {
        self.isup.set_charge_number(dpc, cic, number)
    }

    pub fn set_oli(&mut self, dpc: PointCode, cic: Cic, oli: u8) -> Result<(), SsError> {
        self.isup.set_oli(dpc, cic, oli)
    }

    pub fn set_generic_address(&mut self, dpc: PointCode, cic: Cic, number: NumberParam) -> Result<(), SsError> {
        self.isup.set_generic_address(dpc, cic, number)
    }

    pub fn set_generic_digits(&mut self, dpc: PointCode, cic: Cic, digits: impl Into<String>) -> Result<(), SsError> {
        self.isup.set_generic_digits(dpc, cic, digits)
    }

    pub fn set_jip(&mut self, dpc: PointCode, cic: Cic, jip: impl Into<String>) -> Result<(), SsError> {
        self.isup.set_jip(dpc, cic, jip)
    }

    pub fn set_lspi(&mut self, dpc: PointCode, cic: Cic, lspi: Lspi) -> Result<(), SsError> {
        self.isup.set_lspi(dpc, cic, lspi)
    }

    pub fn set_call_reference(&mut self, dpc: PointCode, cic: Cic, reference: u32, owner: PointCode) -> Result<(), SsError> {
        self.isup.set_call_reference(dpc, cic, reference, owner)
    }

    pub fn set_nature_of_connection(&mut self, dpc: PointCode, cic: Cic, value: u8) -> Result<(), SsError> {
        self.isup.set_nature_of_connection(dpc, cic, value)
    }

    pub fn set_forward_call_ind(&mut self, dpc: PointCode, cic: Cic, value: u16) -> Result<(), SsError> {
        self.isup.set_forward_call_ind(dpc, cic, value)
    }

    pub fn set_calling_party_category(&mut self, dpc: PointCode, cic: Cic, value: u8) -> Result<(), SsError> {
        self.isup.set_calling_party_category(dpc, cic, value)
    }

    pub fn set_transmission_medium_requirement(&mut self, dpc: PointCode, cic: Cic, value: u8) -> Result<(), SsError> {
        self.isup.set_transmission_medium_requirement(dpc, cic, value)
    }

    pub fn set_user_service_info(&mut self, dpc: PointCode, cic: Cic, bytes: Vec<u8>) -> Result<(), SsError> {
        self.isup.set_user_service_info(dpc, cic, bytes)
    }

    pub fn iam(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.iam(dpc, cic)?;
        self.transmit(dpc, body)
    }

    pub fn acm(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.acm(dpc, cic)?;
        self.transmit(dpc, body)
    }

    pub fn anm(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.anm(dpc, cic)?;
        self.transmit(dpc, body)
    }

    pub fn con(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.con(dpc, cic)?;
        self.transmit(dpc, body)
    }

    pub fn rel(&mut self, dpc: PointCode, cic: Cic, cause: Cause) -> Result<(), SsError> {
        let body = self.isup.rel(dpc, cic, cause)?;
        self.transmit(dpc, body)
    }

    pub fn rlc(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.rlc(dpc, cic)?;
        self.transmit(dpc, body)
    }

    pub fn cpg(&mut self, dpc: PointCode, cic: Cic, event: EventInfo) -> Result<(), SsError> {
        let body = self.isup.cpg(dpc, cic, event)?;
        self.transmit(dpc, body)
    }

    pub fn cot(&mut self, dpc: PointCode, cic: Cic, passed: bool) -> Result<(), SsError> {
        let body = self.isup.cot(cic, passed)?;
        self.transmit(dpc, body)
    }

    // -- circuit supervision (spec §6) --

    pub fn grs(&mut self, dpc: PointCode, cic: Cic, startcic: u16, endcic: u16) -> Result<(), SsError> {
        let body = self.isup.grs(cic, startcic, endcic)?;
        self.transmit(dpc, body)
    }

    pub fn gra(&mut self, dpc: PointCode, cic: Cic, startcic: u16, endcic: u16, status: Vec<u8>) -> Result<(), SsError> {
        let body = self.isup.gra(cic, startcic, endcic, status)?;
        self.transmit(dpc, body)
    }

    pub fn cqm(&mut self, dpc: PointCode, cic: Cic, startcic: u16, endcic: u16) -> Result<(), SsError> {
        let body = self.isup.cqm(cic, startcic, endcic)?;
        self.transmit(dpc, body)
    }

    pub fn cqr(&mut self, dpc: PointCode, cic: Cic, startcic: u16, endcic: u16, status: Vec<u8>) -> Result<(), SsError> {
        let body = self.isup.cqr(cic, startcic, endcic, status)?;
        self.transmit(dpc, body)
    }

    pub fn cgb(
        &mut self,
        dpc: PointCode,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<(), SsError> {
        let body = self.isup.cgb(cic, startcic, endcic, supervision)?;
        self.transmit(dpc, body)
    }

    pub fn cgu(
        &mut self,
        dpc: PointCode,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<(), SsError> {
        let body = self.isup.cgu(cic, startcic, endcic, supervision)?;
        self.transmit(dpc, body)
    }

    pub fn cgba(
        &mut self,
        dpc: PointCode,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<(), SsError> {
        let body = self.isup.cgba(cic, startcic, endcic, supervision)?;
        self.transmit(dpc, body)
    }

    pub fn cgua(
        &mut self,
        dpc: PointCode,
        cic: Cic,
        startcic: u16,
        endcic: u16,
        supervision: CircuitGroupSupervisionInd,
    ) -> Result<(), SsError> {
        let body = self.isup.cgua(cic, startcic, endcic, supervision)?;
        self.transmit(dpc, body)
    }

    pub fn blo(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.blo(cic)?;
        self.transmit(dpc, body)
    }

    pub fn bla(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.bla(cic)?;
        self.transmit(dpc, body)
    }

    pub fn ubl(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.ubl(cic)?;
        self.transmit(dpc, body)
    }

    pub fn uba(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.uba(cic)?;
        self.transmit(dpc, body)
    }

    pub fn rsc(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.rsc(cic)?;
        self.transmit(dpc, body)
    }

    pub fn lpa(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.lpa(cic)?;
        self.transmit(dpc, body)
    }

    pub fn ucic(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.ucic(cic)?;
        self.transmit(dpc, body)
    }

    pub fn ccr(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.ccr(cic)?;
        self.transmit(dpc, body)
    }

    pub fn faa(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.faa(cic)?;
        self.transmit(dpc, body)
    }

    pub fn far(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.far(cic)?;
        self.transmit(dpc, body)
    }

    pub fn sus(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.sus(cic)?;
        self.transmit(dpc, body)
    }

    pub fn res(&mut self, dpc: PointCode, cic: Cic) -> Result<(), SsError> {
        let body = self.isup.res(cic)?;
        self.transmit(dpc, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtp3::LinkStatus;
    use std::os::unix::io::AsRawFd;

    fn socketpair() -> (std::os::unix::net::UnixStream, std::os::unix::net::UnixStream) {
        std::os::unix::net::UnixStream::pair().unwrap()
    }

    #[test]
    fn add_link_assigns_fd_and_dahdi_links_start_aligning() {
        let (a, _b) = socketpair();
        let mut ss7 = Ss7::new(SwitchType::Itu);
        ss7.set_pc(PointCode(1));
        ss7.set_default_dpc(PointCode(2));
        let slc = ss7.add_link(TransportKind::DahdiDchan, a.as_raw_fd()).unwrap();
        ss7.start().unwrap();
        assert_eq!(ss7.linkset.link_status(slc).unwrap(), LinkStatus::Aligning);
    }

    #[test]
    fn tcp_link_never_aligns_locally() {
        let (a, _b) = socketpair();
        let mut ss7 = Ss7::new(SwitchType::Itu);
        let slc = ss7.add_link(TransportKind::Tcp, a.as_raw_fd()).unwrap();
        ss7.start().unwrap();
        assert_eq!(ss7.linkset.link_status(slc).unwrap(), LinkStatus::Down);
    }

    #[test]
    fn tcp_up_tag_brings_the_link_up_without_alignment() {
        let (a, b) = socketpair();
        let mut ss7 = Ss7::new(SwitchType::Itu);
        ss7.set_pc(PointCode(1));
        ss7.add_link(TransportKind::Tcp, a.as_raw_fd()).unwrap();
        ss7.start().unwrap();

        use std::io::Write;
        let mut b = b;
        b.write_all(&transport::build_up_frame()).unwrap();

        ss7.read(a.as_raw_fd()).unwrap();
        assert_eq!(ss7.check_event(), Some(Ss7Event::LinkUp(Slc(0))));
        assert_eq!(ss7.check_event(), Some(Ss7Event::ProcessUp));
    }

    #[test]
    fn unknown_fd_is_config_error() {
        let ss7 = Ss7::new(SwitchType::Itu);
        let err = ss7.pollflags(99).unwrap_err();
        assert_eq!(err.kind, Kind::Config);
    }

    #[test]
    fn pollflags_wants_write_only_when_offload_link_has_buffered_output() {
        let (a, _b) = socketpair();
        let mut ss7 = Ss7::new(SwitchType::Itu);
        ss7.set_pc(PointCode(1));
        ss7.set_default_dpc(PointCode(2));
        ss7.add_link(TransportKind::Tcp, a.as_raw_fd()).unwrap();
        assert_eq!(ss7.pollflags(a.as_raw_fd()).unwrap(), PollFlags { read: true, write: false });

        ss7.init_call(PointCode(2), Cic(1));
        ss7.set_called(PointCode(2), Cic(1), NumberParam::new(3, "100")).unwrap();
        ss7.iam(PointCode(2), Cic(1)).unwrap();
        assert_eq!(ss7.pollflags(a.as_raw_fd()).unwrap(), PollFlags { read: true, write: true });
    }

    #[test]
    fn dahdi_link_always_wants_write() {
        let (a, _b) = socketpair();
        let mut ss7 = Ss7::new(SwitchType::Itu);
        ss7.add_link(TransportKind::DahdiDchan, a.as_raw_fd()).unwrap();
        assert_eq!(ss7.pollflags(a.as_raw_fd()).unwrap(), PollFlags { read: true, write: true });
    }

    #[test]
    fn iam_over_tcp_round_trips_through_read() {
        // Two `Ss7` instances on either end of one socketpair, standing in
        // for the host's own TCP connection to each peer: the caller's
        // link fd is one half, the callee's the other.
        let (a, b) = socketpair();

        let mut caller = Ss7::new(SwitchType::Itu);
        caller.set_pc(PointCode(1));
        caller.add_link(TransportKind::Tcp, a.as_raw_fd()).unwrap();

        let mut callee = Ss7::new(SwitchType::Itu);
        callee.set_pc(PointCode(2));
        callee.add_link(TransportKind::Tcp, b.as_raw_fd()).unwrap();

        caller.init_call(PointCode(2), Cic(7));
        caller.set_called(PointCode(2), Cic(7), NumberParam::new(3, "5551234")).unwrap();
        caller.iam(PointCode(2), Cic(7)).unwrap();
        caller.write(a.as_raw_fd()).unwrap();

        callee.read(b.as_raw_fd()).unwrap();
        match callee.check_event() {
            Some(Ss7Event::Isup(isup::IsupEvent::Iam { cic, opc, called, .. })) => {
                assert_eq!(cic, Cic(7));
                assert_eq!(opc, PointCode(1));
                assert_eq!(called.digits, "5551234#");
            }
            other => panic!("expected an Iam event, got {other:?}"),
        }
    }

    #[test]
    fn grs_targets_the_given_dpc_without_a_call_record() {
        let (a, _b) = socketpair();
        let mut ss7 = Ss7::new(SwitchType::Itu);
        ss7.set_pc(PointCode(1));
        ss7.add_link(TransportKind::DahdiDchan, a.as_raw_fd()).unwrap();
        assert!(ss7.grs(PointCode(2), Cic(1), 1, 5).is_ok());
    }
}
