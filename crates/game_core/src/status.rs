//! Timed status conditions and the legal-action gate.
//!
//! Every condition kind blocks a fixed set of action categories; the gate
//! answers "is this category currently permitted" from the union of active
//! conditions. Durations are decremented by the tick schedule before any
//! gate query in the same tick runs.

use data_runtime::configs::status::StatusPolicy;

/// Closed set of gateable action categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LegalAction {
    Move,
    Act,
    Cast,
}

impl LegalAction {
    /// Parse a config name (`"move"`, `"act"`, `"cast"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "move" => Some(Self::Move),
            "act" => Some(Self::Act),
            "cast" => Some(Self::Cast),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Stun,
    Root,
    Disarm,
    Silence,
}

impl StatusKind {
    /// Action categories blocked while a condition of this kind is active.
    pub fn blocks(self) -> &'static [LegalAction] {
        match self {
            StatusKind::Stun => &[LegalAction::Move, LegalAction::Act, LegalAction::Cast],
            StatusKind::Root => &[LegalAction::Move],
            StatusKind::Disarm => &[LegalAction::Act],
            StatusKind::Silence => &[LegalAction::Cast],
        }
    }

    /// Parse a config name (`"stun"`, `"root"`, `"disarm"`, `"silence"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stun" => Some(Self::Stun),
            "root" => Some(Self::Root),
            "disarm" => Some(Self::Disarm),
            "silence" => Some(Self::Silence),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StatusInstance {
    pub kind: StatusKind,
    pub remaining_s: f32,
}

/// Per-actor condition tracking.
#[derive(Debug, Clone, Default)]
pub struct StatusSet {
    policy: StatusPolicy,
    active: Vec<StatusInstance>,
}

impl StatusSet {
    pub fn new(policy: StatusPolicy) -> Self {
        Self {
            policy,
            active: Vec::new(),
        }
    }

    /// Apply a condition. Re-applying an active kind refreshes the full
    /// duration; it never stacks. Under the single policy any existing
    /// condition is replaced outright.
    pub fn apply(&mut self, kind: StatusKind, duration_s: f32) {
        match self.policy {
            StatusPolicy::Single => {
                self.active.clear();
                self.active.push(StatusInstance {
                    kind,
                    remaining_s: duration_s,
                });
            }
            StatusPolicy::Multi => {
                if let Some(existing) = self.active.iter_mut().find(|s| s.kind == kind) {
                    existing.remaining_s = duration_s;
                } else {
                    self.active.push(StatusInstance {
                        kind,
                        remaining_s: duration_s,
                    });
                }
            }
        }
    }

    /// Tick durations down and drop expired conditions.
    pub fn advance(&mut self, dt: f32) {
        for s in &mut self.active {
            s.remaining_s -= dt;
        }
        self.active.retain(|s| s.remaining_s > 0.0);
    }

    /// True iff no active condition blocks `action`.
    pub fn has_legal_action(&self, action: LegalAction) -> bool {
        !self
            .active
            .iter()
            .any(|s| s.kind.blocks().contains(&action))
    }

    #[inline]
    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.active.iter().any(|s| s.kind == kind)
    }

    pub fn remaining(&self, kind: StatusKind) -> Option<f32> {
        self.active
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.remaining_s)
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &StatusInstance> {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stun_blocks_everything() {
        let mut set = StatusSet::default();
        set.apply(StatusKind::Stun, 1.0);
        assert!(!set.has_legal_action(LegalAction::Move));
        assert!(!set.has_legal_action(LegalAction::Act));
        assert!(!set.has_legal_action(LegalAction::Cast));
    }

    #[test]
    fn expiry_restores_legality() {
        let mut set = StatusSet::default();
        set.apply(StatusKind::Root, 0.5);
        assert!(!set.has_legal_action(LegalAction::Move));
        set.advance(0.5);
        assert!(set.has_legal_action(LegalAction::Move));
        assert!(!set.is_active(StatusKind::Root));
    }

    #[test]
    fn reapply_refreshes_instead_of_stacking() {
        let mut set = StatusSet::default();
        set.apply(StatusKind::Stun, 2.0);
        set.advance(1.5);
        set.apply(StatusKind::Stun, 2.0);
        assert_eq!(set.remaining(StatusKind::Stun), Some(2.0));
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn multi_policy_tracks_distinct_kinds() {
        let mut set = StatusSet::new(StatusPolicy::Multi);
        set.apply(StatusKind::Root, 5.0);
        set.apply(StatusKind::Silence, 1.0);
        assert!(!set.has_legal_action(LegalAction::Move));
        assert!(!set.has_legal_action(LegalAction::Cast));
        assert!(set.has_legal_action(LegalAction::Act));
        set.advance(1.0);
        assert!(set.has_legal_action(LegalAction::Cast));
        assert!(!set.has_legal_action(LegalAction::Move));
    }

    #[test]
    fn single_policy_replaces_outright() {
        let mut set = StatusSet::new(StatusPolicy::Single);
        set.apply(StatusKind::Root, 5.0);
        set.apply(StatusKind::Silence, 1.0);
        assert!(set.has_legal_action(LegalAction::Move));
        assert!(!set.has_legal_action(LegalAction::Cast));
        assert_eq!(set.iter().count(), 1);
    }
}
