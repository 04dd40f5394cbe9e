//! MTP3: the signalling network layer — SIO/routing-label codec, user-part
//! dispatch, link-test and network-management sub-protocols, and the
//! link-set controller that ties them to a set of MTP2 links (spec §4.2).

pub mod dispatch;
pub mod linkset;
pub mod linktest;
pub mod netmgmt;
pub mod routing_label;
pub mod sio;

pub use dispatch::{DefaultRouter, Route, UserPartRouter};
pub use linkset::{LinkSet, LinkStatus, Mtp3Event};
pub use linktest::{LinkTestKind, LinkTestMessage};
pub use routing_label::RoutingLabel;
pub use sio::{NetworkIndicator, Sio, UserPart};
