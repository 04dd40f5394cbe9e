//! Signalling Link Test Control procedure (spec §4.2): SLTM/SLTA.
//!
//! Heading octet packs `H1:4 | H0:4`; both messages share `H0 = 1`
//! ("test message group"), distinguished by `H1` (`1` = request, `2` =
//! reply). The payload after the heading octet is `{length-nibble,
//! pattern...}`: the test pattern's length lives in the upper nibble of
//! the second octet, and the pattern itself follows.

const H0_TEST: u8 = 1;
const H1_SLTM: u8 = 1;
const H1_SLTA: u8 = 2;

fn heading(h0: u8, h1: u8) -> u8 {
    (h1 << 4) | (h0 & 0x0f)
}

/// A parsed link-test message: request (SLTM) or reply (SLTA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTestKind {
    Sltm,
    Slta,
}

pub struct LinkTestMessage<'a> {
    pub kind: LinkTestKind,
    pub pattern: &'a [u8],
}

/// Parse a link-test payload (the bytes after the routing label).
pub fn parse(payload: &[u8]) -> Option<LinkTestMessage<'_>> {
    let &head = payload.first()?;
    let h0 = head & 0x0f;
    let h1 = head >> 4;
    if h0 != H0_TEST {
        return None;
    }
    let kind = match h1 {
        H1_SLTM => LinkTestKind::Sltm,
        H1_SLTA => LinkTestKind::Slta,
        _ => return None,
    };
    let &length_octet = payload.get(1)?;
    let len = (length_octet >> 4) as usize;
    let pattern = payload.get(2..2 + len)?;
    Some(LinkTestMessage { kind, pattern })
}

/// Build an SLTM carrying `pattern` (originated on local link-up).
pub fn build_sltm(pattern: &[u8]) -> Vec<u8> {
    build(H1_SLTM, pattern)
}

/// Build the SLTA reply to an inbound SLTM, echoing its pattern.
pub fn build_slta(pattern: &[u8]) -> Vec<u8> {
    build(H1_SLTA, pattern)
}

fn build(h1: u8, pattern: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + pattern.len());
    out.push(heading(H0_TEST, h1));
    out.push(((pattern.len() as u8) & 0x0f) << 4);
    out.extend_from_slice(pattern);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sltm_round_trips() {
        let pattern = [0xde, 0xad, 0xbe, 0xef];
        let wire = build_sltm(&pattern);
        let parsed = parse(&wire).unwrap();
        assert_eq!(parsed.kind, LinkTestKind::Sltm);
        assert_eq!(parsed.pattern, &pattern);
    }

    #[test]
    fn slta_echoes_request_pattern() {
        let pattern = [1, 2, 3];
        let request = build_sltm(&pattern);
        let parsed_request = parse(&request).unwrap();
        let reply = build_slta(parsed_request.pattern);
        let parsed_reply = parse(&reply).unwrap();
        assert_eq!(parsed_reply.kind, LinkTestKind::Slta);
        assert_eq!(parsed_reply.pattern, &pattern);
    }

    #[test]
    fn non_test_heading_is_rejected() {
        assert!(parse(&[0x20, 0x00]).is_none());
    }

    #[test]
    fn truncated_pattern_is_none() {
        assert!(parse(&[0x11, 0x40, 0x01]).is_none()); // claims len=4, only has 1
    }
}
