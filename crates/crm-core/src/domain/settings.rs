//! Per-user settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crm_shared::constants::DEFAULT_REMINDER_DAYS_BEFORE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub user_id: Uuid,
    pub company_id: Uuid,
    /// Days before the due date a payment reminder is sent.
    pub reminder_days_before: i32,
    /// Share properties and leads with other brokers for partnership matching.
    pub partnerships_enabled: bool,
    pub lead_match_notifications: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SettingsInput {
    #[validate(range(min = 0, max = 30, message = "Reminder days must be between 0 and 30"))]
    pub reminder_days_before: i32,
    pub partnerships_enabled: bool,
    pub lead_match_notifications: bool,
}

impl Settings {
    pub fn defaults(user_id: Uuid, company_id: Uuid) -> Self {
        Self {
            user_id,
            company_id,
            reminder_days_before: DEFAULT_REMINDER_DAYS_BEFORE,
            partnerships_enabled: true,
            lead_match_notifications: true,
            updated_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, input: SettingsInput) -> Result<(), validator::ValidationErrors> {
        input.validate()?;
        self.reminder_days_before = input.reminder_days_before;
        self.partnerships_enabled = input.partnerships_enabled;
        self.lead_match_notifications = input.lead_match_notifications;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_days_bounds() {
        let mut settings = Settings::defaults(Uuid::new_v4(), Uuid::new_v4());
        let too_many = SettingsInput {
            reminder_days_before: 45,
            partnerships_enabled: false,
            lead_match_notifications: true,
        };
        assert!(settings.apply(too_many).is_err());
        assert_eq!(settings.reminder_days_before, DEFAULT_REMINDER_DAYS_BEFORE);

        let ok = SettingsInput {
            reminder_days_before: 7,
            partnerships_enabled: false,
            lead_match_notifications: true,
        };
        assert!(settings.apply(ok).is_ok());
        assert!(!settings.partnerships_enabled);
    }
}
