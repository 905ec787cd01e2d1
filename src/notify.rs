//! Email notifications.
//!
//! Delivery is switched off: the notifier works out which emails a message
//! would produce and logs them, but nothing is sent.

use tokio::{
    sync::broadcast::{Receiver, error::RecvError},
    task::JoinHandle,
};

use crate::{
    msg::{Msg, MsgContents},
    registry::TeamStatus,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The emails which `msg` would cause to be sent.
pub fn outbox(msg: &Msg) -> Vec<Email> {
    let admin = msg.settings.admin_email.clone();
    let mut emails = Vec::new();

    match &msg.inner {
        MsgContents::TeamRegistered(team) => {
            let body = match team.status {
                TeamStatus::Confirmed if msg.settings.payment_reference.is_empty() => {
                    format!(
                        "Team {} is pre-registered. Your place is guaranteed once \
                         the entry fee has been paid.",
                        team.team_name
                    )
                }
                TeamStatus::Confirmed => format!(
                    "Team {} is pre-registered. Your place is guaranteed once \
                     the entry fee has been paid to {}.",
                    team.team_name, msg.settings.payment_reference
                ),
                TeamStatus::Waitlisted => format!(
                    "All places are taken, so team {} is on the waitlist. We \
                     will let you know if a place opens up.",
                    team.team_name
                ),
            };
            emails.push(Email {
                to: team.contact_email.clone(),
                subject: format!("Registration received: {}", team.team_name),
                body,
            });
            if let Some(admin) = admin {
                emails.push(Email {
                    to: admin,
                    subject: format!("New registration: {}", team.team_name),
                    body: format!(
                        "{} ({} / {}) registered as {}.",
                        team.team_name,
                        team.athletes[0].name,
                        team.athletes[1].name,
                        team.status
                    ),
                });
            }
        }
        MsgContents::TeamPromoted(team) => {
            emails.push(Email {
                to: team.contact_email.clone(),
                subject: format!("A place opened up for {}", team.team_name),
                body: format!(
                    "Team {} has moved from the waitlist to a confirmed place.",
                    team.team_name
                ),
            });
        }
        MsgContents::ContactMessage(contact) => {
            if let Some(admin) = admin {
                emails.push(Email {
                    to: admin,
                    subject: format!("[contact] {}", contact.subject),
                    body: format!(
                        "From {} <{}>:\n\n{}",
                        contact.name, contact.email, contact.message
                    ),
                });
            }
        }
        MsgContents::TeamRemoved(_)
        | MsgContents::RegistrationsCleared { .. }
        | MsgContents::SettingsUpdated => {}
    }

    emails
}

/// Logs the emails for every message received on `rx` until the channel
/// closes.
pub fn spawn(mut rx: Receiver<Msg>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    for email in outbox(&msg) {
                        tracing::info!(
                            to = %email.to,
                            subject = %email.subject,
                            "email delivery is disabled; not sending"
                        );
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "notifier fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{
        msg::ContactMessage,
        registry::{Athlete, ShirtSize, Team},
        settings::Settings,
    };

    fn team(status: TeamStatus) -> Team {
        let athlete = |name: &str| Athlete {
            name: name.to_string(),
            shirt_size: ShirtSize::Medium,
            phone: "912345678".to_string(),
        };
        Team {
            id: Uuid::now_v7(),
            team_name: "Bandeja".to_string(),
            contact_email: "bandeja@example.com".to_string(),
            athletes: [athlete("Ana"), athlete("Rui")],
            status,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn registration_mails_team_and_admin() {
        let settings = Settings {
            payment_reference: "AO06 0040 0000".to_string(),
            ..Default::default()
        };
        let emails = outbox(&Msg {
            settings,
            inner: MsgContents::TeamRegistered(team(TeamStatus::Confirmed)),
        });

        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].to, "bandeja@example.com");
        assert!(emails[0].body.contains("AO06 0040 0000"));
        assert_eq!(emails[1].to, "admin@example.com");
        assert!(emails[1].body.contains("confirmed"));
    }

    #[test]
    fn waitlisted_teams_are_told_so() {
        let emails = outbox(&Msg {
            settings: Settings::default(),
            inner: MsgContents::TeamRegistered(team(TeamStatus::Waitlisted)),
        });
        assert!(emails[0].body.contains("waitlist"));
    }

    #[test]
    fn contact_messages_need_an_admin_address() {
        let contact = ContactMessage {
            name: "Joana".to_string(),
            email: "joana@example.com".to_string(),
            subject: "Parking".to_string(),
            message: "Is there parking at the venue?".to_string(),
        };
        let settings = Settings {
            admin_email: None,
            ..Default::default()
        };
        let emails = outbox(&Msg {
            settings,
            inner: MsgContents::ContactMessage(contact.clone()),
        });
        assert!(emails.is_empty());

        let emails = outbox(&Msg {
            settings: Settings::default(),
            inner: MsgContents::ContactMessage(contact),
        });
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].subject, "[contact] Parking");
    }

    #[test]
    fn removals_send_nothing() {
        let emails = outbox(&Msg {
            settings: Settings::default(),
            inner: MsgContents::TeamRemoved(team(TeamStatus::Confirmed)),
        });
        assert!(emails.is_empty());
    }
}
