use crate::{registry::Team, settings::Settings};

#[derive(Clone, Debug)]
/// A message which is sent following a change to the registrations. The
/// settings in force at the time are attached, as most consumers need the
/// payment reference or the administrator's address.
pub struct Msg {
    pub settings: Settings,
    pub inner: MsgContents,
}

#[derive(Clone, Debug)]
pub enum MsgContents {
    TeamRegistered(Team),
    /// A team was deleted by an administrator.
    TeamRemoved(Team),
    /// A waitlisted team took over a confirmed slot.
    TeamPromoted(Team),
    RegistrationsCleared { count: usize },
    SettingsUpdated,
    ContactMessage(ContactMessage),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
