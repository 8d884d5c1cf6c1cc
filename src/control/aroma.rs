//! Aromatherapy spray cycle.
//!
//! Inside the music window the diffuser runs a 5-second-on / 5-minute-off
//! pattern:
//!
//! ```text
//!  IDLE ──[enabled && in window]──▶ SPRAYING ──[5 s]──▶ COOLDOWN
//!    ▲                                  ▲                   │
//!    │                                  └──────[300 s]──────┘
//!    └──[intent withdrawn or window closed: relay low]
//! ```
//!
//! The first spray of an activation fires immediately — cooldown bookkeeping
//! only exists once a spray has ended.  Leaving the window resets the cycle
//! to `Idle` but leaves `aromatherapy.enabled` untouched: window closure
//! stops execution, never intent, so the scenario re-arms on the next day's
//! window.

use log::info;

use crate::app::ports::SprayPort;
use crate::app::state::{ExecState, SprayState};
use crate::config::UserSettings;

/// Spray relay on-time.
pub const SPRAY_ON_MS: u64 = 5_000;

/// Minimum gap between the end of one spray and the start of the next.
pub const SPRAY_COOLDOWN_MS: u64 = 300_000;

/// Advance the spray cycle by one evaluation.
///
/// Every transition drives the relay exactly once; the relay is never
/// re-commanded into the state it is already in.
pub fn drive(
    settings: &UserSettings,
    exec: &mut ExecState,
    now_ms: u64,
    relay: &mut impl SprayPort,
) {
    let gated_on = settings.aromatherapy.enabled && exec.in_music_window;

    if !gated_on {
        match exec.spray {
            SprayState::Idle => {}
            SprayState::Spraying { .. } => {
                relay.set_active(false);
                exec.spray = SprayState::Idle;
                info!("aroma: cycle stopped mid-spray, relay low");
            }
            SprayState::Cooldown { .. } => {
                // Relay already low; drop the bookkeeping only.
                exec.spray = SprayState::Idle;
                info!("aroma: cycle stopped");
            }
        }
        return;
    }

    match exec.spray {
        SprayState::Idle => {
            relay.set_active(true);
            exec.spray = SprayState::Spraying { since_ms: now_ms };
            info!("aroma: first spray of this window");
        }
        SprayState::Spraying { since_ms } => {
            if now_ms.saturating_sub(since_ms) >= SPRAY_ON_MS {
                relay.set_active(false);
                exec.spray = SprayState::Cooldown { since_ms: now_ms };
                info!("aroma: spray done, cooling down");
            }
        }
        SprayState::Cooldown { since_ms } => {
            if now_ms.saturating_sub(since_ms) >= SPRAY_COOLDOWN_MS {
                relay.set_active(true);
                exec.spray = SprayState::Spraying { since_ms: now_ms };
                info!("aroma: cooldown elapsed, spraying again");
            }
        }
    }
}
