//! The pages anyone can see: the event page and the registration form.

use axum::extract::{Form, State};
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    registrations::{TeamTable, register_team},
    registry::{self, Athlete, ShirtSize, TeamDraft, TeamStatus},
    state::AppState,
    util_resp::{StandardResponse, bad_request, success},
    validation::{is_at_most, is_non_empty, is_valid_email},
    widgets::{
        alert::{ErrorAlert, SuccessAlert, WarningAlert},
        capacity::CapacityCard,
    },
};

pub const MAX_NAME_CHARS: usize = 128;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_PHONE_CHARS: usize = 32;

pub async fn home(State(state): State<AppState>) -> StandardResponse {
    let settings = state.settings().await;
    let teams = state.store.load_teams().await?;

    let confirmed = registry::confirmed_count(&teams);
    let waitlisted = registry::waitlisted_count(&teams);
    let full = confirmed >= settings.capacity_limit as usize;

    success(state.page().await.body(maud! {
        h1 class="mb-4" { (state.site.event_name) }
        CapacityCard
            confirmed=(confirmed)
            waitlisted=(waitlisted)
            capacity=(settings.capacity_limit);
        @if !settings.payment_reference.is_empty() {
            p {
                "Entry fees are paid to "
                strong { (settings.payment_reference) }
                ". A place is guaranteed once the payment has been received."
            }
        }
        a class="btn btn-primary mb-4" href="/register" {
            @if full {
                "Join the waitlist"
            } @else {
                "Register a team"
            }
        }
        h2 class="h4" { "Registered teams" }
        TeamTable teams=(&teams) admin=(false);
    }).render())
}

/// Just the capacity card; polled by the card itself.
pub async fn status_fragment(State(state): State<AppState>) -> StandardResponse {
    let capacity = state.settings().await.capacity_limit;
    let teams = state.store.load_teams().await?;

    success(maud! {
        CapacityCard
            confirmed=(registry::confirmed_count(&teams))
            waitlisted=(registry::waitlisted_count(&teams))
            capacity=(capacity);
    }.render())
}

struct AthleteFields {
    n: usize,
}

impl Renderable for AthleteFields {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        let prefix = format!("athlete{}", self.n);
        maud! {
            fieldset class="mb-3" {
                legend class="h5" { "Athlete " (self.n.to_string()) }
                div class="row g-3" {
                    div class="col-md-6" {
                        label for=(format!("{prefix}_name")) class="form-label" { "Name" }
                        input type="text" class="form-control"
                            id=(format!("{prefix}_name"))
                            name=(format!("{prefix}_name"))
                            maxlength=(MAX_NAME_CHARS.to_string())
                            required;
                    }
                    div class="col-md-2" {
                        label for=(format!("{prefix}_shirt_size")) class="form-label" { "Shirt" }
                        select class="form-select"
                            id=(format!("{prefix}_shirt_size"))
                            name=(format!("{prefix}_shirt_size")) {
                            @for size in ShirtSize::ALL {
                                @if size == ShirtSize::default() {
                                    option value=(size.as_str()) selected { (size.as_str()) }
                                } @else {
                                    option value=(size.as_str()) { (size.as_str()) }
                                }
                            }
                        }
                    }
                    div class="col-md-4" {
                        label for=(format!("{prefix}_phone")) class="form-label" { "Phone" }
                        input type="tel" class="form-control"
                            id=(format!("{prefix}_phone"))
                            name=(format!("{prefix}_phone"))
                            maxlength=(MAX_PHONE_CHARS.to_string())
                            required;
                    }
                }
            }
        }
        .render_to(buffer);
    }
}

pub async fn register_page(State(state): State<AppState>) -> StandardResponse {
    let capacity = state.settings().await.capacity_limit;
    let teams = state.store.load_teams().await?;
    let full = registry::confirmed_count(&teams) >= capacity as usize;

    success(state.page().await.body(maud! {
        h1 class="mb-4" { "Register a team" }
        @if full {
            WarningAlert msg="All places are taken. Your team will be added to the waitlist, and moved up automatically if a place opens.";
        }
        form method="post" action="/register" {
            div class="row g-3 mb-3" {
                div class="col-md-6" {
                    label for="team_name" class="form-label" { "Team name" }
                    input type="text" class="form-control" id="team_name" name="team_name"
                        maxlength=(MAX_NAME_CHARS.to_string()) required;
                }
                div class="col-md-6" {
                    label for="contact_email" class="form-label" { "Contact email" }
                    input type="email" class="form-control" id="contact_email" name="contact_email"
                        maxlength=(MAX_EMAIL_CHARS.to_string()) required;
                }
            }
            AthleteFields n=(1);
            AthleteFields n=(2);
            button type="submit" class="btn btn-primary" { "Register" }
        }
    }).render())
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RegisterForm {
    pub team_name: String,
    pub contact_email: String,
    pub athlete1_name: String,
    pub athlete1_shirt_size: String,
    pub athlete1_phone: String,
    pub athlete2_name: String,
    pub athlete2_shirt_size: String,
    pub athlete2_phone: String,
}

fn athlete(
    n: usize,
    name: &str,
    shirt_size: &str,
    phone: &str,
) -> Result<Athlete, String> {
    let (name, phone) = (name.trim(), phone.trim());
    is_non_empty(&format!("Athlete {n} name"), name)?;
    is_at_most(&format!("Athlete {n} name"), name, MAX_NAME_CHARS)?;
    is_non_empty(&format!("Athlete {n} phone"), phone)?;
    is_at_most(&format!("Athlete {n} phone"), phone, MAX_PHONE_CHARS)?;
    let shirt_size = shirt_size
        .parse::<ShirtSize>()
        .map_err(|e| format!("Athlete {n}: {e}"))?;

    Ok(Athlete {
        name: name.to_string(),
        shirt_size,
        phone: phone.to_string(),
    })
}

impl RegisterForm {
    pub fn into_draft(self) -> Result<TeamDraft, String> {
        let team_name = self.team_name.trim();
        is_non_empty("Team name", team_name)?;
        is_at_most("Team name", team_name, MAX_NAME_CHARS)?;

        let contact_email = self.contact_email.trim();
        is_non_empty("Contact email", contact_email)?;
        is_at_most("Contact email", contact_email, MAX_EMAIL_CHARS)?;
        is_valid_email(contact_email)
            .map_err(|_| "Please enter a valid contact email.".to_string())?;

        Ok(TeamDraft {
            team_name: team_name.to_string(),
            contact_email: contact_email.to_string(),
            athletes: [
                athlete(
                    1,
                    &self.athlete1_name,
                    &self.athlete1_shirt_size,
                    &self.athlete1_phone,
                )?,
                athlete(
                    2,
                    &self.athlete2_name,
                    &self.athlete2_shirt_size,
                    &self.athlete2_phone,
                )?,
            ],
        })
    }
}

pub async fn do_register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> StandardResponse {
    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(e) => {
            return bad_request(state.page().await.body(maud! {
                ErrorAlert msg=(&e);
                a href="/register" { "Back to the registration form" }
            }).render());
        }
    };

    let team = register_team(&state, draft).await?;
    let payment_reference = state.settings().await.payment_reference;

    success(state.page().await.body(maud! {
        @if team.status == TeamStatus::Confirmed {
            SuccessAlert msg=(format!("Team {} is pre-registered!", team.team_name));
            @if !payment_reference.is_empty() {
                p {
                    "Your place is guaranteed once the entry fee has been paid to "
                    strong { (payment_reference) }
                    "."
                }
            }
        } @else {
            WarningAlert msg=(format!(
                "All places are taken, so team {} is on the waitlist. It will be moved up automatically if a place opens.",
                team.team_name
            ));
        }
        a href="/" { "Back to the event page" }
    }).render())
}
