pub mod auth_service;
pub mod referral_service;

pub use auth_service::{AuthError, AuthService};
pub use referral_service::{ReferralError, ReferralService};
