//! The unified event surfaced by [`crate::engine::Ss7::check_event`] (spec
//! §6 "Event variants surfaced").

use ss7_core::Slc;

/// Every event the engine can hand back to the host.
///
/// `LinkUp`/`LinkDown` and `ProcessUp` come from MTP3's link-set
/// (`mtp3::Mtp3Event`, minus its `Isup` variant, which has already been run
/// through [`isup::IsupEngine::receive`] by the time it reaches here); every
/// other variant is one `isup::IsupEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ss7Event {
    /// A single link came up.
    LinkUp(Slc),
    /// A single link went down.
    LinkDown(Slc),
    /// The first link of the whole process came up (`SS7_EVENT_UP`).
    ProcessUp,
    /// An ISUP message was received and parsed.
    Isup(isup::IsupEvent),
}

impl From<isup::IsupEvent> for Ss7Event {
    fn from(event: isup::IsupEvent) -> Self {
        Ss7Event::Isup(event)
    }
}
