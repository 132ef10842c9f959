use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::vless::ConnectionLink;

/// A credential rendered as ready-to-use connection links, one per
/// masking profile.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConnectionBundle {
    pub client_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub links: Vec<ConnectionLink>,
}
