//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 86_400;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const SESSION_COOKIE_NAME: &str = "crm_session";

/// Window inside which an identical notification is not created twice.
pub const NOTIFICATION_DEDUP_HOURS: i64 = 24;
pub const DEFAULT_REMINDER_DAYS_BEFORE: i32 = 3;
pub const DEFAULT_CONTRACT_EXPIRY_DAYS: i64 = 30;
pub const DEFAULT_ADMIN_FEE_PERCENT: f64 = 10.0;
pub const DEFAULT_LATE_FEE_PERCENT: f64 = 2.0;
pub const DEFAULT_DAILY_INTEREST_PERCENT: f64 = 0.033;
