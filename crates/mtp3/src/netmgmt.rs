//! Network management sub-protocol: currently just enough to recognize
//! TRA (Traffic Restart Allowed, `H0=7, H1=1`) and mark the link up.
//! Other network-management procedures (changeover, forced/controlled
//! rerouting) are out of scope.

const H0_TRA: u8 = 7;
const H1_TRA: u8 = 1;

fn heading(h0: u8, h1: u8) -> u8 {
    (h1 << 4) | (h0 & 0x0f)
}

/// True if `payload`'s first octet is the TRA heading code.
pub fn is_tra(payload: &[u8]) -> bool {
    matches!(payload.first(), Some(&b) if b == heading(H0_TRA, H1_TRA))
}

/// Build a bare TRA message (no further parameters).
pub fn build_tra() -> Vec<u8> {
    vec![heading(H0_TRA, H1_TRA)]
}
