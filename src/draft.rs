//! Turn-order validation for live drafts.
//!
//! Pure functions: nothing persists between calls, every input is
//! passed explicitly. Picks carry a 1-based overall order; `round` and
//! the position within a round are derived from it.

use crate::cli::types::Guid;
use crate::error::{Result, SyncError};
use crate::model::{DraftResult, DraftType, PickCandidate};

/// 1-based round a given overall pick number falls in.
///
/// With a 10-team order, picks 1-10 are round 1 and pick 11 opens
/// round 2.
pub fn round_for_pick(order: u32, team_count: usize) -> u32 {
    let team_count = team_count as u32;
    (order + team_count - 1) / team_count
}

/// The drafting order in effect for a round.
///
/// Snake drafts reverse on odd rounds; traditional drafts never
/// reverse.
pub fn effective_order(draft_order: &[Guid], draft_type: DraftType, round: u32) -> Vec<Guid> {
    let mut order = draft_order.to_vec();
    if draft_type == DraftType::Snake && round % 2 == 1 {
        order.reverse();
    }
    order
}

/// Validate that a candidate pick is submitted by the user whose turn
/// it is.
///
/// Picks must arrive in exact sequence: the candidate's order has to be
/// exactly one past the prior results, regardless of who submits.
/// Within a round the expected drafter comes from the round's effective
/// order; a commissioner may pick out of turn (but never out of
/// sequence).
pub fn validate_turn(
    candidate: &PickCandidate,
    draft_order: &[Guid],
    prior_results: &[DraftResult],
    draft_type: DraftType,
    commissioners: &[Guid],
) -> Result<()> {
    if draft_order.is_empty() {
        return Err(SyncError::EmptyDraftOrder);
    }

    if candidate.order as usize != prior_results.len() + 1 {
        return Err(SyncError::OutOfSequence {
            order: candidate.order,
            prior: prior_results.len(),
        });
    }

    let team_count = draft_order.len();
    let round = round_for_pick(candidate.order, team_count);
    let position = candidate.order - (round - 1) * team_count as u32;

    let expected = if draft_type == DraftType::Snake && round % 2 == 1 {
        &draft_order[team_count - position as usize]
    } else {
        &draft_order[position as usize - 1]
    };

    if candidate.user_id == *expected || commissioners.contains(&candidate.user_id) {
        return Ok(());
    }

    Err(SyncError::TurnViolation {
        user_id: candidate.user_id.to_string(),
        expected: expected.to_string(),
    })
}

/// Check the append-only (round, pick) invariant over a league's
/// results as submitted: strictly monotonic, no gaps, no duplicates.
pub fn verify_pick_sequence(results: &[DraftResult], team_count: usize) -> Result<()> {
    if team_count == 0 {
        return if results.is_empty() {
            Ok(())
        } else {
            Err(SyncError::EmptyDraftOrder)
        };
    }

    for (index, result) in results.iter().enumerate() {
        let overall = index as u32 + 1;
        if result.pick != overall || result.round != round_for_pick(overall, team_count) {
            return Err(SyncError::OutOfSequence {
                order: result.pick,
                prior: index,
            });
        }
    }
    Ok(())
}
