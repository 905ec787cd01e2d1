//! The "contact the organisers" form. Messages go to the notifier, which
//! would forward them to the administrator's address.

use axum::extract::{Form, State};
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    msg::{ContactMessage, MsgContents},
    state::AppState,
    util_resp::{StandardResponse, bad_request, success},
    validation::{is_at_most, is_non_empty, is_valid_email},
    widgets::alert::{ErrorAlert, SuccessAlert},
};

const MAX_MESSAGE_CHARS: usize = 4000;

pub async fn contact_page(State(state): State<AppState>) -> StandardResponse {
    success(state.page().await.body(maud! {
        h1 class="mb-4" { "Contact the organisers" }
        form method="post" action="/contact" {
            div class="row g-3 mb-3" {
                div class="col-md-6" {
                    label for="name" class="form-label" { "Name" }
                    input type="text" class="form-control" id="name" name="name" required;
                }
                div class="col-md-6" {
                    label for="email" class="form-label" { "Email" }
                    input type="email" class="form-control" id="email" name="email" required;
                }
            }
            div class="mb-3" {
                label for="subject" class="form-label" { "Subject" }
                input type="text" class="form-control" id="subject" name="subject" required;
            }
            div class="mb-3" {
                label for="message" class="form-label" { "Message" }
                textarea class="form-control" id="message" name="message" rows="5" required {}
            }
            button type="submit" class="btn btn-primary" { "Send" }
        }
    }).render())
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn into_message(self) -> Result<ContactMessage, String> {
        let (name, email, subject, message) = (
            self.name.trim(),
            self.email.trim(),
            self.subject.trim(),
            self.message.trim(),
        );
        is_non_empty("Name", name)?;
        is_non_empty("Email", email)?;
        is_valid_email(email)
            .map_err(|_| "Please enter a valid email.".to_string())?;
        is_non_empty("Subject", subject)?;
        is_non_empty("Message", message)?;
        is_at_most("Message", message, MAX_MESSAGE_CHARS)?;

        Ok(ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }
}

pub async fn do_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> StandardResponse {
    let message = match form.into_message() {
        Ok(message) => message,
        Err(e) => {
            return bad_request(state.page().await.body(maud! {
                ErrorAlert msg=(&e);
                a href="/contact" { "Back to the contact form" }
            }).render());
        }
    };

    let settings = state.settings().await;
    tracing::info!(from = %message.email, "received contact message");
    state.notify(&settings, MsgContents::ContactMessage(message));

    success(state.page().await.body(maud! {
        SuccessAlert msg="Thanks! Your message has been passed on to the organisers.";
        a href="/" { "Back to the event page" }
    }).render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_trimmed() {
        let message = ContactForm {
            name: " Joana ".to_string(),
            email: "joana@example.com".to_string(),
            subject: "Parking".to_string(),
            message: "  Is there parking?\n".to_string(),
        }
        .into_message()
        .unwrap();
        assert_eq!(message.name, "Joana");
        assert_eq!(message.message, "Is there parking?");
    }

    #[test]
    fn all_fields_are_required() {
        let err = ContactForm {
            name: "Joana".to_string(),
            email: "joana@example.com".to_string(),
            subject: "Parking".to_string(),
            message: "   ".to_string(),
        }
        .into_message()
        .unwrap_err();
        assert_eq!(err, "Message is required");
    }
}
