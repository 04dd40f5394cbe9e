//! User-part dispatch: routes an inbound MSU's payload to the layer that
//! understands it, keyed by the SIO's user-part nibble.
//!
//! A trait at the seam between "decode the header" and "hand the rest
//! to whoever owns that protocol", so a host wanting to add SCCP
//! support later can supply its own [`UserPartRouter`] instead of this
//! engine growing an SCCP stack of its own.

use ss7_core::PointCode;

use crate::sio::UserPart;

/// Where an inbound payload should go, after SIO/routing-label parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Isup { opc: PointCode, payload: &'a [u8] },
    LinkTest { opc: PointCode, payload: &'a [u8] },
    NetMgmt { opc: PointCode, payload: &'a [u8] },
    /// SCCP or a genuinely unrecognized user part: out of scope, dropped.
    Dropped { reason: &'static str },
}

pub trait UserPartRouter {
    fn route<'a>(&self, user_part: UserPart, opc: PointCode, payload: &'a [u8]) -> Route<'a>;
}

/// The routing table named in spec §4.2: ISUP, link test (both the
/// standard and special variants share one sub-protocol), network
/// management's TRA handling, and a drop for everything else.
pub struct DefaultRouter;

impl UserPartRouter for DefaultRouter {
    fn route<'a>(&self, user_part: UserPart, opc: PointCode, payload: &'a [u8]) -> Route<'a> {
        match user_part {
            UserPart::Isup => Route::Isup { opc, payload },
            UserPart::StdTest | UserPart::SpecTest => Route::LinkTest { opc, payload },
            UserPart::NetMng => Route::NetMgmt { opc, payload },
            UserPart::Sccp => Route::Dropped { reason: "sccp user part not implemented" },
            UserPart::Unknown(_) => Route::Dropped { reason: "unrecognized user part" },
        }
    }
}
