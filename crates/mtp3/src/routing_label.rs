//! Routing label codec: `{OPC, DPC, SLS}`, packed one way for ITU and
//! another for ANSI. Byte-order and field width are the main hazard
//! here, so every field width and byte position is taken straight from
//! the Q.704 routing label layout rather than re-derived from first
//! principles.

use ss7_core::{PointCode, Sls, SwitchType};
use ss7_error::{Kind, Layer, SsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingLabel {
    pub dpc: PointCode,
    pub opc: PointCode,
    pub sls: Sls,
}

impl RoutingLabel {
    pub fn encode(self, switch: SwitchType) -> Vec<u8> {
        match switch {
            SwitchType::Itu => self.encode_itu().to_vec(),
            SwitchType::Ansi => self.encode_ansi().to_vec(),
        }
    }

    pub fn decode(switch: SwitchType, bytes: &[u8]) -> Result<(Self, &[u8]), SsError> {
        let len = switch.routing_label_len();
        if bytes.len() < len {
            return Err(SsError::new(Layer::Mtp3, Kind::Framing, "truncated routing label"));
        }
        let label = match switch {
            SwitchType::Itu => {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(&bytes[..4]);
                Self::decode_itu(&buf)
            }
            SwitchType::Ansi => {
                let mut buf = [0u8; 7];
                buf.copy_from_slice(&bytes[..7]);
                Self::decode_ansi(&buf)
            }
        };
        Ok((label, &bytes[len..]))
    }

    /// ITU packing: `DPC:14 | OPC:14 | SLS:4` across 4 octets, least
    /// significant bits first within the field.
    ///
    /// ```text
    /// octet0: DPC[7:0]
    /// octet1: OPC[1:0] << 6 | DPC[13:8]
    /// octet2: OPC[9:2]
    /// octet3: SLS[3:0] << 4 | OPC[13:10]
    /// ```
    fn encode_itu(self) -> [u8; 4] {
        let dpc = self.dpc.masked(SwitchType::Itu);
        let opc = self.opc.masked(SwitchType::Itu);
        let sls = self.sls.0 & 0x0f;
        [
            (dpc & 0xff) as u8,
            (((opc & 0x03) << 6) | (dpc >> 8)) as u8,
            ((opc >> 2) & 0xff) as u8,
            ((sls << 4) | (opc >> 10)) as u8,
        ]
    }

    fn decode_itu(bytes: &[u8; 4]) -> Self {
        let dpc = (bytes[0] as u32) | (((bytes[1] & 0x3f) as u32) << 8);
        let opc = ((bytes[1] >> 6) as u32) | ((bytes[2] as u32) << 2) | (((bytes[3] & 0x0f) as u32) << 10);
        let sls = bytes[3] >> 4;
        Self { dpc: PointCode(dpc), opc: PointCode(opc), sls: Sls(sls) }
    }

    /// ANSI packing: `DPC:24 | OPC:24 | SLS:8`, each field byte-aligned
    /// and little-endian, across 7 octets.
    fn encode_ansi(self) -> [u8; 7] {
        let dpc = self.dpc.masked(SwitchType::Ansi).to_le_bytes();
        let opc = self.opc.masked(SwitchType::Ansi).to_le_bytes();
        [dpc[0], dpc[1], dpc[2], opc[0], opc[1], opc[2], self.sls.0]
    }

    fn decode_ansi(bytes: &[u8; 7]) -> Self {
        let dpc = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]);
        let opc = u32::from_le_bytes([bytes[3], bytes[4], bytes[5], 0]);
        Self { dpc: PointCode(dpc), opc: PointCode(opc), sls: Sls(bytes[6]) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn itu_round_trip_within_field_widths() {
        let label = RoutingLabel { dpc: PointCode(0x3fff), opc: PointCode(0x1234), sls: Sls(0x0a) };
        let encoded = label.encode(SwitchType::Itu);
        assert_eq!(encoded.len(), 4);
        let (decoded, rest) = RoutingLabel::decode(SwitchType::Itu, &encoded).unwrap();
        assert!(rest.is_empty());
        assert_eq!(decoded, label);
    }

    #[test]
    fn ansi_round_trip_within_field_widths() {
        let label = RoutingLabel { dpc: PointCode(0xabcdef), opc: PointCode(0x112233), sls: Sls(0xff) };
        let encoded = label.encode(SwitchType::Ansi);
        assert_eq!(encoded.len(), 7);
        let (decoded, rest) = RoutingLabel::decode(SwitchType::Ansi, &encoded).unwrap();
        assert!(rest.is_empty());
        assert_eq!(decoded, label);
    }

    #[test]
    fn decode_leaves_trailing_payload_untouched() {
        let label = RoutingLabel { dpc: PointCode(1), opc: PointCode(2), sls: Sls(3) };
        let mut bytes = label.encode(SwitchType::Itu);
        bytes.extend_from_slice(&[0xde, 0xad]);
        let (_, rest) = RoutingLabel::decode(SwitchType::Itu, &bytes).unwrap();
        assert_eq!(rest, &[0xde, 0xad]);
    }

    #[test]
    fn truncated_label_is_framing_error() {
        let err = RoutingLabel::decode(SwitchType::Ansi, &[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind, Kind::Framing);
    }
}
