use axum::extract::{Form, State};
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    auth::Admin,
    registrations::update_settings,
    settings::Settings,
    state::AppState,
    util_resp::{StandardResponse, bad_request, success},
    validation::parse_capacity_limit,
    widgets::alert::{ErrorAlert, SuccessAlert},
};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SettingsForm {
    pub payment_reference: String,
    pub capacity_limit: String,
    pub logo_url: String,
    pub banner_url: String,
    pub admin_email: String,
}

fn non_empty(value: &str) -> Option<String> {
    match value.trim() {
        "" => None,
        value => Some(value.to_string()),
    }
}

impl SettingsForm {
    pub fn into_settings(self) -> Result<Settings, String> {
        Ok(Settings {
            payment_reference: self.payment_reference.trim().to_string(),
            capacity_limit: parse_capacity_limit(&self.capacity_limit)?,
            logo_url: non_empty(&self.logo_url),
            banner_url: non_empty(&self.banner_url),
            admin_email: non_empty(&self.admin_email),
        })
    }
}

pub async fn do_update_settings(
    _admin: Admin,
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> StandardResponse {
    let settings = match form.into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            return bad_request(state.page().await.admin(true).body(maud! {
                ErrorAlert msg=(&e);
                a href="/admin" { "Back to the admin page" }
            }).render());
        }
    };

    let promoted = update_settings(&state, settings).await?;

    success(state.page().await.admin(true).body(maud! {
        SuccessAlert msg="Settings saved.";
        @if !promoted.is_empty() {
            p { "Moved up from the waitlist:" }
            ul {
                @for team in &promoted {
                    li { (team.team_name) }
                }
            }
        }
        a href="/admin" { "Back to the admin page" }
    }).render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_become_none() {
        let settings = SettingsForm {
            payment_reference: " PT50 0000 ".to_string(),
            capacity_limit: "24".to_string(),
            logo_url: "   ".to_string(),
            banner_url: String::new(),
            admin_email: String::new(),
        }
        .into_settings()
        .unwrap();

        assert_eq!(settings.payment_reference, "PT50 0000");
        assert_eq!(settings.capacity_limit, 24);
        assert_eq!(settings.logo_url, None);
        assert_eq!(settings.admin_email, None);
    }

    #[test]
    fn capacity_must_be_a_positive_number() {
        for bad in ["0", "-3", "twelve", ""] {
            let form = SettingsForm {
                capacity_limit: bad.to_string(),
                ..Default::default()
            };
            assert!(form.into_settings().is_err(), "{bad} was accepted");
        }
    }
}
