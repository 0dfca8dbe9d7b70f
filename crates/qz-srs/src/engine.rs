//! Scheduler engine.
//!
//! Pure functions: given a review state and an answer outcome, compute the
//! next state; given a pool, pick the next question to review. Neither reads
//! the wall clock, callers pass `now` in.

use chrono::{DateTime, Duration, Utc};

use crate::{InvalidStateError, ReviewState, StudyPool};

/// Strength gained on a correct answer, scaled by the level multiplier.
pub const CORRECT_STRENGTH_GAIN: f64 = 0.15;
/// Strength lost on an incorrect answer.
pub const MISS_STRENGTH_PENALTY: f64 = 0.25;
/// Correct answers in a row needed to move up one level.
pub const PROMOTION_STREAK: u32 = 3;
/// Upper bound on a scheduled interval (100 years).
pub const MAX_INTERVAL_DAYS: f64 = 36_500.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Compute the state that follows `state` after one answer.
///
/// # Arguments
///
/// * `state` - Current review state; it is not modified
/// * `correct` - Whether the learner answered correctly
/// * `response_latency_ms` - Time taken to answer. Recorded in the trace only,
///   it does not influence scheduling
/// * `now` - Reference time for the next review date
///
/// # Algorithm
///
/// On a correct answer the streak grows, strength gains
/// `0.15 * multiplier(level)` (capped at 1), a streak of 3 below Expert promotes
/// one level and resets the streak, then the interval becomes
/// `interval * multiplier(level) * (1 + strength)`, never shorter than before.
///
/// On an incorrect answer the streak resets, strength loses 0.25 (floored at 0),
/// the level drops one step unless already Beginner, and the interval resets to
/// the base interval of the resulting level.
///
/// # Errors
///
/// Returns [`InvalidStateError`] if `state` has a strength outside [0, 1] or a
/// non-positive interval.
pub fn compute_next_state(
    state: &ReviewState,
    correct: bool,
    response_latency_ms: u64,
    now: DateTime<Utc>,
) -> Result<ReviewState, InvalidStateError> {
    state.validate()?;

    let mut next = state.clone();
    if correct {
        next.consecutive_correct = next.consecutive_correct.saturating_add(1);
        next.encoding_strength =
            (next.encoding_strength + CORRECT_STRENGTH_GAIN * state.level.multiplier()).min(1.0);

        if next.consecutive_correct >= PROMOTION_STREAK
            && let Some(promoted) = next.level.promoted()
        {
            next.level = promoted;
            next.consecutive_correct = 0;
        }

        let grown = state.current_interval_days
            * next.level.multiplier()
            * (1.0 + next.encoding_strength);
        next.current_interval_days = grown
            .max(state.current_interval_days)
            .min(MAX_INTERVAL_DAYS);
    } else {
        next.consecutive_correct = 0;
        next.encoding_strength = (next.encoding_strength - MISS_STRENGTH_PENALTY).max(0.0);
        next.level = next.level.demoted().unwrap_or(next.level);
        next.current_interval_days = next.level.base_interval_days();
    }

    next.encoding_strength = next.encoding_strength.clamp(0.0, 1.0);
    next.next_review_at = now
        .checked_add_signed(interval_to_duration(next.current_interval_days))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    tracing::debug!(
        question_id = %state.question_id,
        correct,
        response_latency_ms,
        from_level = %state.level,
        to_level = %next.level,
        interval_days = next.current_interval_days,
        encoding_strength = next.encoding_strength,
        "Computed next review state"
    );

    Ok(next)
}

/// Pick the next state to review.
///
/// Returns the due state (`next_review_at <= now`) with the earliest review
/// date. Among states due at the same instant the weakest memory (lowest
/// encoding strength) wins, then the lowest question id. Returns `None` when
/// nothing is due.
pub fn select_next(pool: &StudyPool, now: DateTime<Utc>) -> Option<&ReviewState> {
    let mut due = pool.due(now);
    let first = due.next()?;
    let earliest = first.next_review_at;

    let chosen = due
        .take_while(|state| state.next_review_at == earliest)
        .fold(first, |best, candidate| {
            if candidate.encoding_strength < best.encoding_strength {
                candidate
            } else {
                best
            }
        });

    Some(chosen)
}

fn interval_to_duration(days: f64) -> Duration {
    Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}
