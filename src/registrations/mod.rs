//! Registrations: the request handlers, and the operations they share.
//!
//! Every operation which changes the team list holds
//! [`AppState::write_lock`] from the moment it loads the teams until the
//! store has accepted the new list.

use hypertext::prelude::*;
use uuid::Uuid;

use crate::{
    msg::MsgContents,
    registry::{self, RegistryError, Removal, Team, TeamDraft},
    settings::Settings,
    state::AppState,
    store::StoreError,
    util_resp::{FailureResponse, error_page},
};

pub mod manage;
pub mod public;

#[derive(thiserror::Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("{0}")]
    Invalid(String),
}

impl From<ActionError> for FailureResponse {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Store(err) => FailureResponse::from(err),
            ActionError::Registry(RegistryError::TeamNotFound(id)) => {
                tracing::debug!(%id, "no such team");
                FailureResponse::NotFound(())
            }
            ActionError::Invalid(msg) => {
                FailureResponse::BadRequest(error_page(&msg))
            }
        }
    }
}

/// Admits a new team and appends it to the stored list.
pub async fn register_team(
    state: &AppState,
    draft: TeamDraft,
) -> Result<Team, StoreError> {
    let _guard = state.write_lock.lock().await;
    let settings = state.settings().await;

    let mut teams = state.store.load_teams().await?;
    let team = registry::admit(draft, &teams, settings.capacity_limit);
    teams.push(team.clone());
    state.store.save_teams(&teams).await?;

    tracing::info!(
        team_id = %team.id,
        status = %team.status,
        "registered team"
    );
    state.notify(&settings, MsgContents::TeamRegistered(team.clone()));

    Ok(team)
}

/// Deletes a team, promoting the next waitlisted team if a confirmed slot
/// came free.
pub async fn delete_team(
    state: &AppState,
    team_id: Uuid,
) -> Result<Removal, ActionError> {
    let _guard = state.write_lock.lock().await;
    let settings = state.settings().await;

    let teams = state.store.load_teams().await?;
    let removal = registry::remove(team_id, &teams, settings.capacity_limit)?;
    state.store.save_teams(&removal.teams).await?;

    tracing::info!(
        team_id = %removal.removed.id,
        promoted = ?removal.promoted.as_ref().map(|team| team.id),
        "deleted team"
    );
    state.notify(&settings, MsgContents::TeamRemoved(removal.removed.clone()));
    if let Some(promoted) = &removal.promoted {
        state.notify(&settings, MsgContents::TeamPromoted(promoted.clone()));
    }

    Ok(removal)
}

/// Deletes every registration. Returns how many teams were removed.
pub async fn clear_all(state: &AppState) -> Result<usize, StoreError> {
    let _guard = state.write_lock.lock().await;
    let settings = state.settings().await;

    let count = state.store.load_teams().await?.len();
    state.store.save_teams(&registry::clear_all()).await?;

    tracing::warn!(count, "cleared all registrations");
    state.notify(&settings, MsgContents::RegistrationsCleared { count });

    Ok(count)
}

/// Replaces the settings. Raising the capacity limit promotes waitlisted
/// teams into the new slots; the promoted teams are returned.
///
/// The limit may not drop below the number of teams already confirmed, as
/// confirmed teams are never demoted.
pub async fn update_settings(
    state: &AppState,
    new_settings: Settings,
) -> Result<Vec<Team>, ActionError> {
    new_settings.validate().map_err(ActionError::Invalid)?;

    let _guard = state.write_lock.lock().await;

    let teams = state.store.load_teams().await?;
    let confirmed = registry::confirmed_count(&teams);
    if (new_settings.capacity_limit as usize) < confirmed {
        return Err(ActionError::Invalid(format!(
            "The capacity limit cannot be lower than the {confirmed} teams \
             which are already confirmed. Delete teams first."
        )));
    }

    state.store.save_settings(&new_settings).await?;
    *state.settings.write().await = new_settings.clone();
    tracing::info!(
        capacity_limit = new_settings.capacity_limit,
        "updated settings"
    );
    state.notify(&new_settings, MsgContents::SettingsUpdated);

    let rebalance = registry::rebalance(&teams, new_settings.capacity_limit);
    if !rebalance.promoted.is_empty() {
        state.store.save_teams(&rebalance.teams).await?;
        for team in &rebalance.promoted {
            tracing::info!(team_id = %team.id, "promoted team from waitlist");
            state.notify(&new_settings, MsgContents::TeamPromoted(team.clone()));
        }
    }

    Ok(rebalance.promoted)
}

/// The list of teams. The admin view adds contact details and a delete
/// link for each team.
pub struct TeamTable<'r> {
    pub teams: &'r [Team],
    pub admin: bool,
}

impl<'r> Renderable for TeamTable<'r> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud! {
            @if self.teams.is_empty() {
                p class="text-muted" { "No teams have registered yet." }
            } @else {
                div class="table-responsive" {
                    table class="table table-striped align-middle" {
                        thead {
                            tr {
                                th scope="col" { "#" }
                                th scope="col" { "Team" }
                                th scope="col" { "Athletes" }
                                @if self.admin {
                                    th scope="col" { "Contact" }
                                    th scope="col" { "Registered" }
                                }
                                th scope="col" { "Status" }
                                @if self.admin {
                                    th scope="col" {}
                                }
                            }
                        }
                        tbody {
                            @for (i, team) in self.teams.iter().enumerate() {
                                tr {
                                    th scope="row" { ((i + 1).to_string()) }
                                    td { (team.team_name) }
                                    td {
                                        @for athlete in &team.athletes {
                                            div {
                                                (athlete.name)
                                                @if self.admin {
                                                    span class="text-muted small" {
                                                        " (" (athlete.shirt_size.as_str()) ", " (athlete.phone) ")"
                                                    }
                                                }
                                            }
                                        }
                                    }
                                    @if self.admin {
                                        td { (team.contact_email) }
                                        td class="small" { (team.registered_at()) }
                                    }
                                    td {
                                        @if team.is_confirmed() {
                                            span class="badge text-bg-success" { "Confirmed" }
                                        } @else {
                                            span class="badge text-bg-warning" { "Waitlist" }
                                        }
                                    }
                                    @if self.admin {
                                        td {
                                            a class="btn btn-sm btn-outline-danger"
                                                href=(format!("/admin/teams/{}/delete", team.id)) {
                                                "Delete"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        .render_to(buffer);
    }
}
