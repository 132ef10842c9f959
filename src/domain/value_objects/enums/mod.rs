pub mod masking_profiles;
pub mod payment_statuses;
pub mod transaction_kinds;
