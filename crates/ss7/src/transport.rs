//! Transport framing (spec §6).
//!
//! DAHDI-style transports hand the engine exactly one SU per read and
//! expect exactly one SU per write; the kernel driver preserves those
//! boundaries, so no extra framing is needed on top of [`mtp2::Mtp2Link`]'s
//! own header. A TCP-attached link is instead an "external MTP2 offload":
//! the peer has already run its own alignment state machine and forwards
//! link-status changes and SIO-onward payloads as length-prefixed, tagged
//! frames, so this engine never runs `Mtp2Link`'s state machine against it
//! at all (see [`crate::engine::Ss7`]).

use std::collections::VecDeque;

/// Which byte-stream convention a link's transport follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// DAHDI's D-channel device.
    DahdiDchan,
    /// DAHDI's raw MTP2 device. Framing-wise identical to `DahdiDchan`;
    /// kept as a distinct variant because the source distinguishes them.
    DahdiMtp2,
    /// A peer that has already terminated MTP2 itself.
    Tcp,
}

impl TransportKind {
    /// True for a transport this engine must not run its own MTP2
    /// alignment state machine against — `pollflags`' "external MTP2
    /// offload" (spec §6).
    pub fn is_mtp2_offload(self) -> bool {
        matches!(self, TransportKind::Tcp)
    }
}

const TAG_UP: u8 = 1;
const TAG_DOWN: u8 = 2;
const TAG_ISUP: u8 = 5;

/// A decoded TCP state-tag frame (spec §6: "the first byte of each SU
/// carries a state tag (1=UP, 2=DOWN, 5=ISUP payload)").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TcpFrame {
    Up,
    Down,
    Isup(Vec<u8>),
}

/// Incremental decoder for the TCP length-prefix + state-tag stream.
/// Bytes arrive in arbitrary-sized chunks from `read(2)`; `push` buffers
/// whatever doesn't yet form a complete frame and returns every frame the
/// new bytes completed, in order.
#[derive(Debug, Default)]
pub struct TcpFramer {
    inbuf: VecDeque<u8>,
}

impl TcpFramer {
    pub fn new() -> Self {
        Self { inbuf: VecDeque::new() }
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<TcpFrame> {
        self.inbuf.extend(bytes.iter().copied());
        let mut frames = Vec::new();
        loop {
            if self.inbuf.len() < 2 {
                break;
            }
            let len = u16::from_be_bytes([self.inbuf[0], self.inbuf[1]]) as usize;
            if len == 0 || self.inbuf.len() < 2 + len {
                break;
            }
            self.inbuf.drain(..2);
            let frame: Vec<u8> = self.inbuf.drain(..len).collect();
            match frame[0] {
                TAG_UP => frames.push(TcpFrame::Up),
                TAG_DOWN => frames.push(TcpFrame::Down),
                TAG_ISUP => frames.push(TcpFrame::Isup(frame[1..].to_vec())),
                _ => {} // unrecognized tag: drop silently, stream stays in sync
            }
        }
        frames
    }
}

/// Build an outbound ISUP-payload frame: 2-octet big-endian length (tag +
/// payload), then the tag, then the payload.
pub fn build_isup_frame(payload: &[u8]) -> Vec<u8> {
    build_frame(TAG_ISUP, payload)
}

pub fn build_up_frame() -> Vec<u8> {
    build_frame(TAG_UP, &[])
}

pub fn build_down_frame() -> Vec<u8> {
    build_frame(TAG_DOWN, &[])
}

fn build_frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let len = 1 + payload.len();
    let mut out = Vec::with_capacity(2 + len);
    out.extend_from_slice(&(len as u16).to_be_bytes());
    out.push(tag);
    out.extend_from_slice(payload);
    out
}
