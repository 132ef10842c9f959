use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::value_objects::enums::masking_profiles::MaskingProfile;

/// Path segment encoding: everything except unreserved characters,
/// including `/`, so the websocket path survives as a single query value.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Fragment label keeps `/` readable; `@` and spaces are encoded.
const LABEL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

const WS_PATH_SUFFIX_LEN: usize = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConnectionLink {
    pub profile: MaskingProfile,
    pub ws_path: String,
    pub uri: String,
}

/// Derives the obfuscation path for one masking profile. The salt is
/// fixed per credential issue, so the path is stable for the credential's
/// lifetime and distinct from any previously issued credential's paths.
pub fn derive_ws_path(prefix: &str, user_id: i64, path_salt: &str, profile: MaskingProfile) -> String {
    let digest = Sha256::digest(format!("{}{}{}", user_id, path_salt, profile.slug()));
    let hex: String = digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect();
    format!("{}{}", prefix, &hex[..WS_PATH_SUFFIX_LEN])
}

/// Builds the scheme-qualified connection URI. The format is fixed for
/// client compatibility; the path and fragment label are each
/// percent-encoded independently.
pub fn build_connection_uri(
    client_id: &Uuid,
    domain: &str,
    ws_path: &str,
    label: &str,
    profile: MaskingProfile,
) -> String {
    let encoded_path = utf8_percent_encode(ws_path, PATH_ENCODE_SET);
    let encoded_label = utf8_percent_encode(label, LABEL_ENCODE_SET);
    let host_header = profile.host_header(domain);

    let mut uri = format!(
        "vless://{}@{}:443?encryption=none&security=tls&type=ws&path={}&host={}&sni={}",
        client_id, domain, encoded_path, host_header, domain,
    );
    if profile.browser_fingerprint() {
        uri.push_str("&fp=chrome&alpn=h2,http/1.1");
    }
    uri.push('#');
    uri.push_str(&encoded_label.to_string());
    uri
}

/// Label for a profile's link: `user<id>@<domain>`, with the masked
/// service name appended for non-primary variants.
pub fn link_label(base_label: &str, profile: MaskingProfile) -> String {
    match profile.masked_service_name() {
        Some(service) => format!("{} - {}", base_label, service),
        None => base_label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "vpn.example.com";

    #[test]
    fn primary_uri_matches_expected_format() {
        let client_id = Uuid::parse_str("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap();
        let uri = build_connection_uri(
            &client_id,
            DOMAIN,
            "/vless/0a1b2c3d4e",
            "user42@vpn.example.com",
            MaskingProfile::Primary,
        );

        assert_eq!(
            uri,
            "vless://6ba7b810-9dad-11d1-80b4-00c04fd430c8@vpn.example.com:443\
             ?encryption=none&security=tls&type=ws\
             &path=%2Fvless%2F0a1b2c3d4e\
             &host=vpn.example.com&sni=vpn.example.com\
             #user42%40vpn.example.com"
        );
    }

    #[test]
    fn masked_uri_appends_fingerprint_and_alpn() {
        let client_id = Uuid::new_v4();
        let uri = build_connection_uri(
            &client_id,
            DOMAIN,
            "/vless/deadbeef00",
            "user42@vpn.example.com - Netflix",
            MaskingProfile::Netflix,
        );

        assert!(uri.contains("&fp=chrome&alpn=h2,http/1.1#"));
        assert!(uri.contains("&host=netflix-cdn.vpn.example.com&sni=vpn.example.com"));
        assert!(uri.ends_with("#user42%40vpn.example.com%20-%20Netflix"));
    }

    #[test]
    fn ws_path_is_stable_for_same_salt_and_distinct_across_profiles() {
        let first = derive_ws_path("/vless/", 42, "salt-a", MaskingProfile::Primary);
        let again = derive_ws_path("/vless/", 42, "salt-a", MaskingProfile::Primary);
        let masked = derive_ws_path("/vless/", 42, "salt-a", MaskingProfile::Netflix);
        let reissued = derive_ws_path("/vless/", 42, "salt-b", MaskingProfile::Primary);

        assert_eq!(first, again);
        assert_ne!(first, masked);
        assert_ne!(first, reissued);
        assert!(first.starts_with("/vless/"));
        assert_eq!(first.len(), "/vless/".len() + 10);
    }

    #[test]
    fn labels_append_masked_service_names() {
        assert_eq!(
            link_label("user42@vpn.example.com", MaskingProfile::Primary),
            "user42@vpn.example.com"
        );
        assert_eq!(
            link_label("user42@vpn.example.com", MaskingProfile::Whatsapp),
            "user42@vpn.example.com - WhatsApp"
        );
    }
}
