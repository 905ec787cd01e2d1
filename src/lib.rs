//! Team registration for a single doubles event.
//!
//! Teams sign up through a public form and are confirmed until the capacity
//! limit is reached; later teams join a waitlist and are promoted, oldest
//! first, whenever a confirmed team is removed. An admin area edits the
//! settings, deletes teams and exports the list as CSV.

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub mod auth;
pub mod config;
pub mod contact;
pub mod export;
pub mod msg;
pub mod notify;
pub mod registrations;
pub mod registry;
pub mod schema;
pub mod settings;
pub mod state;
pub mod store;
pub mod template;
pub mod util_resp;
pub mod validation;
pub mod widgets;

#[cfg(test)]
mod test;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();
