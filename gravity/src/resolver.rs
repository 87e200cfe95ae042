//! Per-tick reduction of overlapping zones to one net gravity per body.
//!
//! The resolver owns the zone registry and the overlap index. The host feeds
//! it zone lifecycle events (register/unregister) and overlap events
//! (entered/left), then calls [`GravityResolver::tick`] once per simulation
//! step. Everything is single-threaded and synchronous: mutations are expected
//! to happen outside an in-progress tick, and each tick resolves every body
//! against a snapshot of the membership taken at its start.
//!
//! Blend rules (per body, per tick):
//! - Only the highest-priority overlapping zones contribute to gravity;
//!   lower-priority zones are fully ignored, not blended in.
//! - A grounded character takes the single strongest candidate vector instead
//!   of the sum. This stops a character standing astride two equal-priority
//!   zones from leaning toward their blended centroid; its contact normal
//!   should dominate.
//! - Anything airborne (or not a character) takes the unweighted vector sum.
//! - Damping is the per-axis maximum across all overlapping zones regardless
//!   of priority: a stability floor, not a field.

use std::collections::HashMap;

use crate::apply::ResolvedGravity;
use crate::handle::{BodyHandle, ZoneId};
use crate::index::OverlapIndex;
use crate::zone::GravityZone;
use crate::Vec3;

/// Per-body facts supplied by the host, queried fresh each tick and at each
/// enter event; the resolver caches none of them.
pub trait BodyState {
    /// False once the host has destroyed the body (stale handles are pruned
    /// lazily at tick time).
    fn is_alive(&self, body: BodyHandle) -> bool;
    /// Character-like bodies are the only ones that can be grounded and the
    /// only ones eligible for the kinematic/ragdoll application paths.
    fn is_character(&self, body: BodyHandle) -> bool;
    fn is_falling(&self, body: BodyHandle) -> bool;
    /// True when the body carries a physically simulated component.
    fn has_physics(&self, body: BodyHandle) -> bool;
    fn position(&self, body: BodyHandle) -> Vec3;
    fn tags(&self, body: BodyHandle) -> Vec<String>;
}

#[derive(Debug, Default)]
pub struct GravityResolver {
    zones: HashMap<ZoneId, GravityZone>,
    next_zone_id: ZoneId,
    index: OverlapIndex,
}

impl GravityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a zone and bootstraps membership from the host's spatial
    /// overlap query (`overlapping` is the set of bodies currently inside the
    /// zone's volume). Eligibility and exclusion tags are checked per body,
    /// exactly as for a live enter event.
    pub fn register_zone<B: BodyState>(
        &mut self,
        zone: GravityZone,
        overlapping: impl IntoIterator<Item = BodyHandle>,
        bodies: &B,
    ) -> ZoneId {
        let id = self.next_zone_id;
        self.next_zone_id += 1;
        log::debug!("registered gravity zone {id} (priority {})", zone.priority);
        self.zones.insert(id, zone);
        for body in overlapping {
            self.notify_entered(body, id, bodies);
        }
        id
    }

    /// Unregisters a zone: removes it from the registry and from every body's
    /// membership set, pruning bodies left with an empty set.
    pub fn unregister_zone(&mut self, zone: ZoneId) {
        if self.zones.remove(&zone).is_some() {
            self.index.purge_zone(zone);
            log::debug!("unregistered gravity zone {zone}");
        }
    }

    /// Overlap-begin notification from the host.
    ///
    /// The body joins the zone only if it is alive, eligible (character-like
    /// or carrying a physics component), and none of its tags appear in the
    /// zone's exclusion list. The checks run fresh on every call; nothing is
    /// cached between entries. Anything else is a no-op.
    pub fn notify_entered<B: BodyState>(&mut self, body: BodyHandle, zone: ZoneId, bodies: &B) {
        let Some(z) = self.zones.get(&zone) else {
            return;
        };
        if !bodies.is_alive(body) {
            return;
        }
        if !(bodies.is_character(body) || bodies.has_physics(body)) {
            return;
        }
        let tags = bodies.tags(body);
        if z.excludes_any(tags.iter().map(String::as_str)) {
            return;
        }
        if self.index.insert(body, zone) {
            log::trace!("body {body:#x} entered zone {zone}");
        }
    }

    /// Overlap-end notification from the host. A leave for a body that was
    /// never a member is a silent no-op (recorded at trace level so mismatched
    /// enter/leave pairs stay diagnosable).
    pub fn notify_left(&mut self, body: BodyHandle, zone: ZoneId) {
        log::trace!("body {body:#x} left zone {zone}");
        self.index.remove(body, zone);
    }

    /// Resolves every tracked body once; call once per simulation step.
    ///
    /// Iterates a snapshot of the membership taken at the start of the tick,
    /// so zones registered mid-tick never affect bodies already resolved this
    /// tick. Stale handles are dropped, and bodies whose membership emptied
    /// are emitted once with the zero result and then pruned.
    pub fn tick<B: BodyState>(&mut self, bodies: &B) -> Vec<(BodyHandle, ResolvedGravity)> {
        let mut snapshot = self.index.bodies();
        snapshot.sort_unstable();

        let mut out = Vec::with_capacity(snapshot.len());
        for body in snapshot {
            if !bodies.is_alive(body) {
                log::trace!("pruning stale body handle {body:#x}");
                self.index.remove_body(body);
                continue;
            }
            let resolved = self.resolve_body(body, bodies);
            if self.index.zones_of(body).is_none_or(|set| set.is_empty()) {
                self.index.remove_body(body);
            }
            out.push((body, resolved));
        }
        out
    }

    /// Reduces one body's overlapping zone set to a net gravity and damping
    /// pair. Pure with respect to the index; pruning happens in
    /// [`GravityResolver::tick`].
    fn resolve_body<B: BodyState>(&self, body: BodyHandle, bodies: &B) -> ResolvedGravity {
        let Some(set) = self.index.zones_of(body) else {
            return ResolvedGravity::zero();
        };
        // Sorted ids make the "first seen" max-magnitude tie-break
        // deterministic: earlier-registered zones win ties.
        let mut ids: Vec<ZoneId> = set
            .iter()
            .copied()
            .filter(|id| self.zones.contains_key(id))
            .collect();
        ids.sort_unstable();
        if ids.is_empty() {
            return ResolvedGravity::zero();
        }

        let position = bodies.position(body);
        // Only character-like bodies can be grounded for the blend rule.
        let grounded = bodies.is_character(body) && !bodies.is_falling(body);

        let highest = ids
            .iter()
            .map(|id| self.zones[id].priority)
            .max()
            .unwrap_or(i32::MIN);

        // Gravity: candidates from the highest-priority zones only.
        let mut sum = Vec3::zeros();
        let mut strongest = Vec3::zeros();
        let mut strongest_sq = -1.0f32;
        for id in &ids {
            let zone = &self.zones[id];
            if zone.priority != highest {
                continue;
            }
            let v = zone.field_at(position);
            sum += v;
            let m = v.norm_squared();
            if m > strongest_sq {
                strongest = v;
                strongest_sq = m;
            }
        }
        let vector = if grounded { strongest } else { sum };

        // Damping: maximum across all overlapping zones, ignoring priority.
        let mut linear = 0.0f32;
        let mut angular = 0.0f32;
        for id in &ids {
            let zone = &self.zones[id];
            linear = linear.max(zone.linear_damping_at(position));
            angular = angular.max(zone.angular_damping_at(position));
        }

        ResolvedGravity {
            vector,
            linear_damping: linear,
            angular_damping: angular,
        }
    }

    /// Read access to a registered zone (host configuration surface).
    pub fn zone(&self, id: ZoneId) -> Option<&GravityZone> {
        self.zones.get(&id)
    }

    /// Mutable access for externally editable zone parameters.
    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut GravityZone> {
        self.zones.get_mut(&id)
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Number of bodies currently tracked by the overlap index.
    pub fn tracked_bodies(&self) -> usize {
        self.index.len()
    }
}
