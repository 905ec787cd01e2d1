//! The admin area. Every handler in here requires an [`Admin`] session.

use axum::extract::State;
use hypertext::prelude::*;

use crate::{
    auth::Admin,
    registrations::TeamTable,
    registry,
    state::AppState,
    util_resp::{StandardResponse, success},
    widgets::actions::Actions,
};

pub mod clear;
pub mod delete;
pub mod export;
pub mod settings;

pub async fn admin_dashboard(
    _admin: Admin,
    State(state): State<AppState>,
) -> StandardResponse {
    let settings = state.settings().await;
    let teams = state.store.load_teams().await?;
    let confirmed = registry::confirmed_count(&teams);
    let waitlisted = registry::waitlisted_count(&teams);

    success(state.page().await.admin(true).body(maud! {
        h1 class="mb-4" { "Administration" }

        h2 class="h4" { "Settings" }
        form method="post" action="/admin/settings" class="mb-5" {
            div class="row g-3 mb-3" {
                div class="col-md-8" {
                    label for="payment_reference" class="form-label" { "Payment reference" }
                    input type="text" class="form-control" id="payment_reference"
                        name="payment_reference" value=(settings.payment_reference);
                    div class="form-text" { "Shown to teams as where to pay the entry fee." }
                }
                div class="col-md-4" {
                    label for="capacity_limit" class="form-label" { "Team limit" }
                    input type="number" class="form-control" id="capacity_limit"
                        name="capacity_limit" min="1"
                        value=(settings.capacity_limit.to_string()) required;
                }
            }
            div class="row g-3 mb-3" {
                div class="col-md-6" {
                    label for="logo_url" class="form-label" { "Logo URL" }
                    input type="text" class="form-control" id="logo_url" name="logo_url"
                        value=(settings.logo_url.clone().unwrap_or_default());
                }
                div class="col-md-6" {
                    label for="banner_url" class="form-label" { "Banner URL" }
                    input type="text" class="form-control" id="banner_url" name="banner_url"
                        value=(settings.banner_url.clone().unwrap_or_default());
                }
            }
            div class="mb-3" {
                label for="admin_email" class="form-label" { "Administrator email" }
                input type="email" class="form-control" id="admin_email" name="admin_email"
                    value=(settings.admin_email.clone().unwrap_or_default());
                div class="form-text" { "Receives new registrations and contact messages." }
            }
            button type="submit" class="btn btn-primary" { "Save settings" }
        }

        h2 class="h4" { "Data" }
        Actions options=(&[
            ("/admin/export.csv", "Export CSV"),
            ("/admin/clear", "Clear all registrations"),
        ]);

        h2 class="h4" {
            "Teams "
            span class="text-muted small" {
                (confirmed.to_string()) " confirmed, "
                (waitlisted.to_string()) " on the waitlist, limit "
                (settings.capacity_limit.to_string())
            }
        }
        TeamTable teams=(&teams) admin=(true);
    }).render())
}
