//! Attack resolution.
//!
//! An attack is an area query around the attack origin followed by one hit
//! per adversary found. The resolver is stateless: the character decides
//! when an attack happens and with what [`Strike`], the resolver decides who
//! it lands on.
//!
//! # Ordering
//!
//! Hits are applied in ascending handle order. Bodies found by the query
//! that are not in the roster (already removed, or owned by the host alone)
//! are skipped.

use glam::Vec2;
use tracing::{debug, trace};

use crate::adversary::{HitOutcome, Roster};
use crate::entity::BodyTag;
use crate::frame::Frame;
use crate::host::Host;

/// Parameters of one attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    /// Center of the hit area.
    pub origin: Vec2,
    /// Radius of the hit area.
    pub radius: f32,
    /// Damage per adversary hit.
    pub amount: i32,
    /// Charged hits bypass light immunity.
    pub is_charged: bool,
}

/// Tally of what a strike did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrikeReport {
    /// Adversaries that lost health, kills included.
    pub hits: usize,
    /// Adversaries whose health reached zero.
    pub kills: usize,
    /// Hits absorbed by immunity.
    pub blocked: usize,
}

impl StrikeReport {
    /// Returns true if the strike touched nobody.
    #[must_use]
    pub const fn is_whiff(&self) -> bool {
        self.hits == 0 && self.blocked == 0
    }
}

/// Resolves strikes against the adversary roster.
///
/// # Example
///
/// ```
/// use flipstrike_core::adversary::{Adversary, AdversaryKind, Roster};
/// use flipstrike_core::arena::Arena;
/// use flipstrike_core::combat::{CombatResolver, Strike};
/// use flipstrike_core::config::{AdversaryTuning, SessionTuning};
/// use flipstrike_core::events::EventLog;
/// use flipstrike_core::frame::Frame;
/// use flipstrike_core::host::Lifecycle;
/// use flipstrike_core::scheduler::Scheduler;
/// use flipstrike_core::session::SessionTracker;
/// use glam::Vec2;
///
/// let mut arena = Arena::new();
/// let tuning = AdversaryTuning::default();
/// let mut roster = Roster::new();
/// for (kind, x) in [(AdversaryKind::Basic, 1.0), (AdversaryKind::Medium, 8.0)] {
///     let handle = arena.spawn(kind, Vec2::new(x, 0.0), false);
///     roster.insert(Adversary::new(handle, kind, &tuning, 0, false));
/// }
///
/// let mut scheduler = Scheduler::new();
/// let mut events = EventLog::new();
/// let mut session = SessionTracker::new(SessionTuning::default());
/// let mut frame = Frame::new(&mut arena, &mut scheduler, &mut events, &mut session);
///
/// let strike = Strike { origin: Vec2::ZERO, radius: 1.5, amount: 25, is_charged: false };
/// let report = CombatResolver::new().resolve(&strike, &mut roster, &mut frame);
///
/// // Only the basic adversary is in reach, and one light hit kills it.
/// assert_eq!((report.hits, report.kills, report.blocked), (1, 1, 0));
/// assert_eq!(roster.live_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies `strike` to every adversary within its radius.
    ///
    /// # Arguments
    ///
    /// * `strike` - Hit area and damage
    /// * `roster` - Adversaries that can receive hits
    /// * `frame` - Host and bookkeeping for the current tick
    ///
    /// # Returns
    ///
    /// Counts of hits, kills and blocks.
    pub fn resolve<H: Host>(
        &self,
        strike: &Strike,
        roster: &mut Roster,
        frame: &mut Frame<'_, H>,
    ) -> StrikeReport {
        let targets = frame.host.area_query(strike.origin, strike.radius, BodyTag::Adversary);
        let mut report = StrikeReport::default();

        for handle in targets {
            let Some(adversary) = roster.get_mut(handle) else {
                trace!(%handle, "strike target not in roster");
                continue;
            };
            match adversary.take_damage(strike.amount, strike.is_charged, frame) {
                HitOutcome::Ignored => {}
                HitOutcome::Blocked => report.blocked += 1,
                HitOutcome::Damaged => report.hits += 1,
                HitOutcome::Killed => {
                    report.hits += 1;
                    report.kills += 1;
                }
            }
        }

        debug!(
            charged = strike.is_charged,
            hits = report.hits,
            kills = report.kills,
            blocked = report.blocked,
            "strike resolved"
        );
        report
    }
}
