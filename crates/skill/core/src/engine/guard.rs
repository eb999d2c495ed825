//! Per-template rate limiting (inter-cast cooldown and per-second cap).
//!
//! A rejected trigger is ordinary throttling: the engine drops it silently.

/// Rate-limit settings declared on a template. Both limits are optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuardSpec {
    /// Minimum milliseconds between accepted triggers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub icd_ms: Option<u64>,
    /// Maximum accepted triggers per wall-clock second bucket.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cap_per_second: Option<u32>,
}

impl GuardSpec {
    pub const NONE: Self = Self {
        icd_ms: None,
        cap_per_second: None,
    };

    pub const fn cooldown(icd_ms: u64) -> Self {
        Self {
            icd_ms: Some(icd_ms),
            cap_per_second: None,
        }
    }

    pub const fn per_second(cap: u32) -> Self {
        Self {
            icd_ms: None,
            cap_per_second: Some(cap),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.icd_ms.is_none() && self.cap_per_second.is_none()
    }
}

/// Mutable guard record for one template, owned by the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuntimeState {
    /// Time of the last accepted trigger.
    pub last_trigger: Option<u64>,
    /// Second bucket (`now / 1000`) the counter belongs to.
    pub window_second: u64,
    /// Accepted triggers in `window_second`.
    pub window_count: u32,
}

/// Result of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Cooldown { remaining_ms: u64 },
    RateCapped { cap: u32 },
}

impl GuardDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Evaluates `spec` at `now`, updating `state` on acceptance.
///
/// The cooldown is checked first; a cooldown rejection leaves the per-second
/// counter untouched.
pub fn guards_pass(spec: &GuardSpec, state: &mut RuntimeState, now: u64) -> GuardDecision {
    if spec.is_noop() {
        return GuardDecision::Pass;
    }

    if let Some(icd) = spec.icd_ms
        && let Some(last) = state.last_trigger
    {
        let elapsed = now.saturating_sub(last);
        if elapsed < icd {
            return GuardDecision::Cooldown {
                remaining_ms: icd - elapsed,
            };
        }
    }

    if let Some(cap) = spec.cap_per_second {
        let bucket = now / 1000;
        if bucket != state.window_second {
            state.window_second = bucket;
            state.window_count = 0;
        }
        if state.window_count >= cap {
            return GuardDecision::RateCapped { cap };
        }
        state.window_count += 1;
    }

    state.last_trigger = Some(now);
    GuardDecision::Pass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_always_passes() {
        let mut state = RuntimeState::default();
        for t in [0, 0, 1, 1] {
            assert!(guards_pass(&GuardSpec::NONE, &mut state, t).is_pass());
        }
        assert_eq!(state, RuntimeState::default());
    }

    #[test]
    fn cooldown_blocks_inside_window() {
        let spec = GuardSpec::cooldown(800);
        let mut state = RuntimeState::default();
        assert!(guards_pass(&spec, &mut state, 0).is_pass());
        assert_eq!(
            guards_pass(&spec, &mut state, 500),
            GuardDecision::Cooldown { remaining_ms: 300 }
        );
        assert!(guards_pass(&spec, &mut state, 800).is_pass());
    }

    #[test]
    fn per_second_cap_resets_on_rollover() {
        let spec = GuardSpec::per_second(2);
        let mut state = RuntimeState::default();
        assert!(guards_pass(&spec, &mut state, 100).is_pass());
        assert!(guards_pass(&spec, &mut state, 200).is_pass());
        assert_eq!(
            guards_pass(&spec, &mut state, 300),
            GuardDecision::RateCapped { cap: 2 }
        );
        assert!(guards_pass(&spec, &mut state, 1_050).is_pass());
        assert_eq!(state.window_second, 1);
        assert_eq!(state.window_count, 1);
    }

    #[test]
    fn both_limits_share_one_record() {
        let spec = GuardSpec {
            icd_ms: Some(100),
            cap_per_second: Some(3),
        };
        let mut state = RuntimeState::default();
        assert!(guards_pass(&spec, &mut state, 0).is_pass());
        assert!(!guards_pass(&spec, &mut state, 50).is_pass());
        assert_eq!(state.window_count, 1);
        assert!(guards_pass(&spec, &mut state, 150).is_pass());
        assert_eq!(state.last_trigger, Some(150));
    }
}
