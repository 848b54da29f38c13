//! User-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to user enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UserEvent {
    /// A new user signed up.
    SignedUp {
        /// The user ID.
        user_id: Uuid,
        /// Display name, used to greet the user.
        name: String,
        /// Where the welcome message goes.
        email: String,
        /// Base64 PNG of the MFA provisioning code, when MFA was enrolled.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        qr_image: Option<String>,
    },
    /// An existing user completed a late MFA enrollment.
    MfaEnrolled {
        /// The user ID.
        user_id: Uuid,
        /// Where the provisioning code goes.
        email: String,
        /// Base64 PNG of the MFA provisioning code.
        qr_image: String,
    },
}

impl UserEvent {
    /// The email address the event concerns.
    pub fn email(&self) -> &str {
        match self {
            Self::SignedUp { email, .. } | Self::MfaEnrolled { email, .. } => email,
        }
    }
}
