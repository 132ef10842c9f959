use anyhow::Result;

use super::config_model::DotEnvyConfig;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = super::config_model::Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let vpn = super::config_model::Vpn {
        domain: std::env::var("VPN_DOMAIN").expect("VPN_DOMAIN is invalid"),
        ws_path_prefix: std::env::var("VPN_WS_PATH_PREFIX")
            .unwrap_or_else(|_| "/vless/".to_string()),
    };

    let billing = super::config_model::Billing {
        currency: std::env::var("BILLING_CURRENCY").unwrap_or_else(|_| "XTR".to_string()),
    };

    let referral = super::config_model::Referral {
        bonus_days: std::env::var("REFERRAL_BONUS_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()?,
        bonus_stars: std::env::var("REFERRAL_BONUS_STARS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?,
        trial_hours: std::env::var("TRIAL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()?,
    };

    let admin = super::config_model::Admin {
        external_id: std::env::var("ADMIN_EXTERNAL_ID")
            .expect("ADMIN_EXTERNAL_ID is invalid")
            .parse()?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        vpn,
        billing,
        referral,
        admin,
    })
}
