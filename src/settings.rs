use serde::{Deserialize, Serialize};

use crate::validation::{is_valid_email, is_valid_image_ref};

pub const DEFAULT_CAPACITY_LIMIT: u32 = 16;
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

/// Event-wide settings edited from the admin area. These are always saved as
/// a whole; there is no partial update.
///
/// Missing keys in a stored document take their default value, so older or
/// hand-edited documents still load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Shown to registered teams as the destination for the entry fee.
    pub payment_reference: String,
    pub capacity_limit: u32,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub admin_email: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            payment_reference: String::new(),
            capacity_limit: DEFAULT_CAPACITY_LIMIT,
            logo_url: None,
            banner_url: None,
            admin_email: Some(DEFAULT_ADMIN_EMAIL.to_string()),
        }
    }
}

impl Settings {
    /// Settings with the branding images from the configuration file used as
    /// defaults.
    pub fn with_branding(
        logo_url: Option<String>,
        banner_url: Option<String>,
    ) -> Self {
        Self {
            logo_url,
            banner_url,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.capacity_limit == 0 {
            return Err(
                "The team limit must be a valid, positive number.".to_string()
            );
        }
        if let Some(email) = &self.admin_email {
            if is_valid_email(email).is_err() {
                return Err("Please enter a valid administrator email."
                    .to_string());
            }
        }
        for image in [&self.logo_url, &self.banner_url].into_iter().flatten() {
            is_valid_image_ref(image)?;
        }
        Ok(())
    }
}
