use axum::extract::{Form, State};
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    auth::Admin,
    registrations::clear_all,
    state::AppState,
    util_resp::{StandardResponse, bad_request, success},
    widgets::alert::{ErrorAlert, SuccessAlert, WarningAlert},
};

pub async fn clear_all_page(
    _admin: Admin,
    State(state): State<AppState>,
) -> StandardResponse {
    success(state.page().await.admin(true).body(maud! {
        h1 class="mb-4" { "Clear all registrations" }
        WarningAlert msg="This deletes every team, confirmed and waitlisted. It cannot be undone. Consider exporting a CSV first.";
        form method="post" action="/admin/clear" {
            div class="form-check mb-3" {
                input class="form-check-input" type="checkbox" id="confirm" name="confirm" value="yes";
                label class="form-check-label" for="confirm" {
                    "I understand that all registrations will be deleted"
                }
            }
            button type="submit" class="btn btn-danger me-2" { "Clear everything" }
            a class="btn btn-secondary" href="/admin" { "Cancel" }
        }
    }).render())
}

#[derive(Deserialize, Debug, Default)]
pub struct ClearForm {
    #[serde(default)]
    confirm: Option<String>,
}

pub async fn do_clear_all(
    _admin: Admin,
    State(state): State<AppState>,
    Form(form): Form<ClearForm>,
) -> StandardResponse {
    if form.confirm.as_deref() != Some("yes") {
        return bad_request(state.page().await.admin(true).body(maud! {
            ErrorAlert msg="Tick the confirmation box to clear the registrations.";
            a href="/admin/clear" { "Back" }
        }).render());
    }

    let count = clear_all(&state).await?;

    success(state.page().await.admin(true).body(maud! {
        SuccessAlert msg=(format!("Deleted {count} registrations."));
        a href="/admin" { "Back to the admin page" }
    }).render())
}
