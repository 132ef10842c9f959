pub mod credentials;
pub mod ledger;
pub mod payments;
pub mod referrals;
pub mod subscriptions;
