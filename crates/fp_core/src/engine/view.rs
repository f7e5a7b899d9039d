//! Derived per-participant flags.
//!
//! Flags are never stored; they are projected from the roster and the
//! animation state on every read so a roster edit can't leave stale flags.

use serde::{Deserialize, Serialize};

use super::sequencer::AnimationState;
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct EntityView {
    /// 찌를 드리운 상태 (Waiting 동안 전원)
    pub is_casting: bool,
    /// 물고기를 낚은 당첨자 (Catching 이후)
    pub has_result: bool,
}

pub fn entity_view(name: &str, state: &AnimationState) -> EntityView {
    EntityView {
        is_casting: state.phase.is_casting(),
        has_result: state.outcome.as_ref().is_some_and(|o| o.winner_name == name),
    }
}

/// One view per roster entry, in roster order.
pub fn project(roster: &Roster, state: &AnimationState) -> Vec<EntityView> {
    roster.names().iter().map(|name| entity_view(name, state)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::outcome::{PrizeKind, RunOutcome};
    use crate::engine::phase::CastingPhase;

    fn state(phase: CastingPhase, winner: Option<&str>) -> AnimationState {
        AnimationState {
            phase,
            is_running: phase != CastingPhase::Ready,
            outcome: winner
                .map(|w| RunOutcome { winner_name: w.into(), prize: PrizeKind::Octopus }),
            result_visible: false,
        }
    }

    #[test]
    fn test_waiting_casts_everyone() {
        let roster = Roster::from_names(["A", "B", "C"]);
        let views = project(&roster, &state(CastingPhase::Waiting, None));
        assert!(views.iter().all(|v| v.is_casting && !v.has_result));
    }

    #[test]
    fn test_catching_marks_only_winner() {
        let roster = Roster::from_names(["A", "B", "C"]);
        let views = project(&roster, &state(CastingPhase::Catching, Some("B")));
        assert_eq!(
            views,
            vec![
                EntityView { is_casting: false, has_result: false },
                EntityView { is_casting: false, has_result: true },
                EntityView { is_casting: false, has_result: false },
            ]
        );
    }

    #[test]
    fn test_idle_and_throwing_have_no_flags() {
        let roster = Roster::from_names(["A", "B"]);
        for phase in [CastingPhase::Ready, CastingPhase::Throwing] {
            let views = project(&roster, &state(phase, None));
            assert!(views.iter().all(|v| *v == EntityView::default()));
        }
    }

    #[test]
    fn test_projection_follows_roster_edits() {
        let mut roster = Roster::from_names(["A", "B", "C"]);
        let st = state(CastingPhase::Ready, Some("C"));
        roster.remove("A");
        let views = project(&roster, &st);
        assert_eq!(views.len(), 2);
        assert!(views[1].has_result);
    }
}
