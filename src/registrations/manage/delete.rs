use axum::{
    extract::{Path, State},
    response::Redirect,
};
use hypertext::prelude::*;
use uuid::Uuid;

use crate::{
    auth::Admin,
    registrations::delete_team,
    state::AppState,
    util_resp::{StandardResponse, err_not_found, see_other_ok, success},
};

pub async fn delete_team_page(
    _admin: Admin,
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> StandardResponse {
    let Ok(team_id) = Uuid::parse_str(&team_id) else {
        return err_not_found();
    };
    let teams = state.store.load_teams().await?;
    let Some(team) = teams.into_iter().find(|team| team.id == team_id) else {
        return err_not_found();
    };

    success(state.page().await.admin(true).body(maud! {
        h1 class="mb-4" { "Delete " (team.team_name) "?" }
        p {
            (team.athletes[0].name) " and " (team.athletes[1].name)
            " will lose their registration."
            @if team.is_confirmed() {
                " The first team on the waitlist, if there is one, will take their place."
            }
        }
        form method="post" action=(format!("/admin/teams/{}/delete", team.id)) {
            button type="submit" class="btn btn-danger me-2" { "Delete" }
            a class="btn btn-secondary" href="/admin" { "Cancel" }
        }
    }).render())
}

pub async fn do_delete_team(
    _admin: Admin,
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> StandardResponse {
    let Ok(team_id) = Uuid::parse_str(&team_id) else {
        return err_not_found();
    };
    delete_team(&state, team_id).await?;
    see_other_ok(Redirect::to("/admin"))
}
