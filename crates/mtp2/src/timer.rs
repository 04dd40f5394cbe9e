//! MTP2 alignment timer identities and per-dialect durations (spec §3).

use std::time::Duration;

use ss7_core::SwitchType;

/// Which of the four alignment timers a fired [`ss7_core::scheduler`]
/// entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Wait for aligned-ready → in-service.
    T1,
    /// Wait for a status SU while NOT_ALIGNED.
    T2,
    /// Wait while ALIGNED, before proving starts.
    T3,
    /// Proving period, normal or emergency.
    T4,
}

/// Timer durations for one dialect, per Q.703.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerProfile {
    pub t1: Duration,
    pub t2: Duration,
    pub t3: Duration,
    pub t4_normal: Duration,
    pub t4_emergency: Duration,
}

impl TimerProfile {
    pub fn for_switch(switch: SwitchType) -> Self {
        match switch {
            SwitchType::Itu => Self {
                t1: Duration::from_millis(45_000),
                t2: Duration::from_millis(50_000),
                t3: Duration::from_millis(1_500),
                t4_normal: Duration::from_millis(8_500),
                t4_emergency: Duration::from_millis(500),
            },
            SwitchType::Ansi => Self {
                t1: Duration::from_millis(16_000),
                t2: Duration::from_millis(11_500),
                t3: Duration::from_millis(11_500),
                t4_normal: Duration::from_millis(2_300),
                t4_emergency: Duration::from_millis(600),
            },
        }
    }

    pub fn t4(&self, emergency: bool) -> Duration {
        if emergency {
            self.t4_emergency
        } else {
            self.t4_normal
        }
    }
}
