//! Admission and waitlist promotion.
//!
//! Everything in here is a pure function of the current team list and the
//! capacity limit. Callers load a snapshot from the [`crate::store::Store`],
//! run one of these functions and write the resulting list back as a unit.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod team;

pub use team::{Athlete, ShirtSize, Team, TeamDraft, TeamStatus};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no team with id {0} is registered")]
    TeamNotFound(Uuid),
}

/// The outcome of [`remove`].
#[derive(Debug, Clone)]
pub struct Removal {
    pub teams: Vec<Team>,
    pub removed: Team,
    /// The waitlisted team which took over the freed slot, if any.
    pub promoted: Option<Team>,
}

/// The outcome of [`rebalance`].
#[derive(Debug, Clone)]
pub struct Rebalance {
    pub teams: Vec<Team>,
    pub promoted: Vec<Team>,
}

pub fn confirmed_count(teams: &[Team]) -> usize {
    teams.iter().filter(|team| team.is_confirmed()).count()
}

pub fn waitlisted_count(teams: &[Team]) -> usize {
    teams.iter().filter(|team| team.is_waitlisted()).count()
}

fn has_free_slot(teams: &[Team], capacity: u32) -> bool {
    confirmed_count(teams) < capacity as usize
}

/// Index of the waitlisted team which should be promoted next: the earliest
/// timestamp wins, and teams registered at the same instant are ordered by
/// their position in the list (which is insertion order, as [`admit`] only
/// ever appends).
fn next_in_line(teams: &[Team]) -> Option<usize> {
    teams
        .iter()
        .enumerate()
        .filter(|(_, team)| team.is_waitlisted())
        .min_by(|(i, a), (j, b)| a.timestamp.cmp(&b.timestamp).then(i.cmp(j)))
        .map(|(i, _)| i)
}

/// Creates a new team from `draft`. The team is confirmed if fewer than
/// `capacity` teams are currently confirmed, and waitlisted otherwise.
///
/// The returned team is not added to `teams`; appending it is up to the
/// caller.
pub fn admit(draft: TeamDraft, teams: &[Team], capacity: u32) -> Team {
    admit_at(draft, teams, capacity, Uuid::now_v7(), Utc::now())
}

pub fn admit_at(
    draft: TeamDraft,
    teams: &[Team],
    capacity: u32,
    id: Uuid,
    now: DateTime<Utc>,
) -> Team {
    let status = if has_free_slot(teams, capacity) {
        TeamStatus::Confirmed
    } else {
        TeamStatus::Waitlisted
    };

    tracing::debug!(
        confirmed = confirmed_count(teams),
        capacity,
        %status,
        "admitting team"
    );

    Team::from_draft(draft, status, id, now)
}

/// Removes the team with the given id. If it held a confirmed slot which is
/// now free, the next waitlisted team is promoted into it.
pub fn remove(
    team_id: Uuid,
    teams: &[Team],
    capacity: u32,
) -> Result<Removal, RegistryError> {
    let position = teams
        .iter()
        .position(|team| team.id == team_id)
        .ok_or(RegistryError::TeamNotFound(team_id))?;

    let mut teams = teams.to_vec();
    let removed = teams.remove(position);

    let promoted = if removed.is_confirmed() && has_free_slot(&teams, capacity)
    {
        next_in_line(&teams).map(|i| {
            teams[i].status = TeamStatus::Confirmed;
            teams[i].clone()
        })
    } else {
        None
    };

    Ok(Removal {
        teams,
        removed,
        promoted,
    })
}

/// Fills every free slot from the waitlist. Used when the capacity limit is
/// raised; confirmed teams are never demoted.
pub fn rebalance(teams: &[Team], capacity: u32) -> Rebalance {
    let mut teams = teams.to_vec();
    let mut promoted = Vec::new();

    while has_free_slot(&teams, capacity) {
        match next_in_line(&teams) {
            Some(i) => {
                teams[i].status = TeamStatus::Confirmed;
                promoted.push(teams[i].clone());
            }
            None => break,
        }
    }

    Rebalance { teams, promoted }
}

pub fn clear_all() -> Vec<Team> {
    Vec::new()
}
