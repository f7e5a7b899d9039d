//! Read-only snapshot published to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::engine::layout::{DensityTier, LayoutCache, Placement};
use crate::engine::outcome::RunOutcome;
use crate::engine::phase::CastingPhase;
use crate::engine::sequencer::AnimationState;
use crate::engine::view::entity_view;
use crate::roster::{participant_id, Roster, RosterReadiness};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: String,
    pub name: String,
    /// Name as drawn, shortened for very large rosters
    pub label: String,
    pub position: usize,
    pub placement: Placement,
    pub is_casting: bool,
    pub has_result: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionSnapshot {
    /// Bumped on every publish
    pub revision: u64,
    pub participants: Vec<ParticipantView>,
    pub phase: CastingPhase,
    pub is_running: bool,
    pub outcome: Option<RunOutcome>,
    pub result_visible: bool,
    pub density: DensityTier,
    pub readiness: RosterReadiness,
}

impl SessionSnapshot {
    pub fn build(
        revision: u64,
        roster: &Roster,
        state: &AnimationState,
        layout: &mut LayoutCache,
        min_participants: usize,
    ) -> Self {
        let total = roster.len();
        let tiers = *layout.tiers();
        let placements = layout.placements(roster);

        let participants = roster
            .names()
            .iter()
            .zip(placements.iter())
            .enumerate()
            .map(|(position, (name, placement))| {
                let view = entity_view(name, state);
                ParticipantView {
                    id: participant_id(position),
                    name: name.clone(),
                    label: tiers.display_label(name, total),
                    position,
                    placement: *placement,
                    is_casting: view.is_casting,
                    has_result: view.has_result,
                }
            })
            .collect();

        Self {
            revision,
            participants,
            phase: state.phase,
            is_running: state.is_running,
            outcome: state.outcome.clone(),
            result_visible: state.result_visible,
            density: tiers.density(total),
            readiness: roster.readiness(min_participants),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn winner(&self) -> Option<&ParticipantView> {
        self.participants.iter().find(|p| p.has_result)
    }
}
