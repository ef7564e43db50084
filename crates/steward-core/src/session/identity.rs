//! SessionIdentity value object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the device, application and authenticated entity behind a request.
///
/// Every field defaults to an empty sentinel (`""` or the nil UUID), so a
/// default identity is a well-defined anonymous value rather than a missing one.
/// Fields are private: an identity is constructed once by the authentication
/// collaborator and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    #[serde(default)]
    device_id: String,
    #[serde(default)]
    application_id: String,
    #[serde(default)]
    entity_key: Uuid,
    #[serde(default)]
    user_name: String,
}

impl SessionIdentity {
    /// Creates a new identity.
    ///
    /// # Arguments
    ///
    /// * `device_id` - Identifier of the calling device
    /// * `application_id` - Identifier of the calling application
    /// * `entity_key` - Key of the authenticated entity (user, service account)
    /// * `user_name` - Display name of the authenticated entity
    pub fn new(
        device_id: impl Into<String>,
        application_id: impl Into<String>,
        entity_key: Uuid,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            application_id: application_id.into(),
            entity_key,
            user_name: user_name.into(),
        }
    }

    /// The anonymous identity (all sentinels).
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn entity_key(&self) -> Uuid {
        self.entity_key
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns true when no authenticated entity is attached.
    pub fn is_anonymous(&self) -> bool {
        self.entity_key.is_nil()
    }
}
