use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Closed set of traffic-obfuscation variants. Each profile changes the
/// credential's websocket path and host-header template without changing
/// the credential's identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MaskingProfile {
    Primary,
    Netflix,
    Youtube,
    Whatsapp,
}

impl MaskingProfile {
    pub const ALL: [MaskingProfile; 4] = [
        MaskingProfile::Primary,
        MaskingProfile::Netflix,
        MaskingProfile::Youtube,
        MaskingProfile::Whatsapp,
    ];

    /// Stable slug mixed into the obfuscation-path hash.
    pub fn slug(&self) -> &'static str {
        match self {
            MaskingProfile::Primary => "primary",
            MaskingProfile::Netflix => "netflix",
            MaskingProfile::Youtube => "youtube",
            MaskingProfile::Whatsapp => "whatsapp",
        }
    }

    /// Service name appended to the link label for masked variants.
    pub fn masked_service_name(&self) -> Option<&'static str> {
        match self {
            MaskingProfile::Primary => None,
            MaskingProfile::Netflix => Some("Netflix"),
            MaskingProfile::Youtube => Some("YouTube"),
            MaskingProfile::Whatsapp => Some("WhatsApp"),
        }
    }

    /// Host header template mimicking the masked service's traffic.
    pub fn host_header(&self, domain: &str) -> String {
        match self {
            MaskingProfile::Primary => domain.to_string(),
            MaskingProfile::Netflix => format!("netflix-cdn.{}", domain),
            MaskingProfile::Youtube => format!("yt-stream.{}", domain),
            MaskingProfile::Whatsapp => format!("wa-media.{}", domain),
        }
    }

    /// Masked variants pin a browser fingerprint and ALPN list.
    pub fn browser_fingerprint(&self) -> bool {
        !matches!(self, MaskingProfile::Primary)
    }
}

impl Display for MaskingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}
