#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub vpn: Vpn,
    pub billing: Billing,
    pub referral: Referral,
    pub admin: Admin,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Vpn {
    pub domain: String,
    pub ws_path_prefix: String,
}

#[derive(Debug, Clone)]
pub struct Billing {
    /// The single provider currency accepted on completion notices.
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct Referral {
    pub bonus_days: i64,
    pub bonus_stars: i32,
    pub trial_hours: i64,
}

#[derive(Debug, Clone)]
pub struct Admin {
    pub external_id: i64,
}
