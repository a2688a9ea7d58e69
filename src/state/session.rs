//! USSD session model
//!
//! One record per gateway-assigned session identifier, reconstructed on
//! every hop. The engine mutates sessions by value-replace: read the full
//! record, compute the new record, write the full record.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ussd::menu::MenuScreen;
use crate::utils::errors::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UssdSession {
    /// Gateway-assigned opaque session identifier
    pub session_id: String,
    /// Caller MSISDN, normalized
    pub phone_number: String,
    /// Resolved farmer id, set once the farmer record is loaded
    pub farmer_id: Option<i64>,
    /// Screen the session is waiting on
    pub screen: MenuScreen,
    /// Transient per-flow data, cleared whenever the session returns to
    /// the main menu
    pub data: HashMap<String, serde_json::Value>,
    /// Receipt of a completed write flow, kept so a gateway retry of the
    /// same submission replays the original reply instead of writing twice
    submitted_token: Option<String>,
    submitted_reply: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UssdSession {
    /// Create a fresh session parked on the main menu
    pub fn new(session_id: &str, phone_number: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.to_string(),
            phone_number: phone_number.to_string(),
            farmer_id: None,
            screen: MenuScreen::Main,
            data: HashMap::new(),
            submitted_token: None,
            submitted_reply: None,
            expires_at: now + ttl,
            updated_at: now,
        }
    }

    /// Move to another screen
    pub fn goto(&mut self, screen: MenuScreen) {
        self.screen = screen;
        self.updated_at = Utc::now();
    }

    /// Return to the main menu, discarding transient sub-flow data so no
    /// stale value can leak into a later flow
    pub fn reset_to_main(&mut self) {
        self.screen = MenuScreen::Main;
        self.data.clear();
        self.updated_at = Utc::now();
    }

    /// Set transient data for the current flow
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Get string data (convenience method)
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.data.get(key).and_then(|v| v.as_str()).map(String::from)
    }

    /// Get float data (convenience method)
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(|v| v.as_f64())
    }

    /// Record the terminal reply of a completed write flow
    pub fn record_submission(&mut self, token: impl Into<String>, reply: impl Into<String>) {
        self.submitted_token = Some(token.into());
        self.submitted_reply = Some(reply.into());
        self.updated_at = Utc::now();
    }

    /// Replay the recorded reply if `token` matches a prior submission
    pub fn replay(&self, token: &str) -> Option<String> {
        if self.submitted_token.as_deref() == Some(token) {
            self.submitted_reply.clone()
        } else {
            None
        }
    }

    /// Push the expiry forward after a processed hop
    pub fn touch(&mut self, ttl: Duration) {
        let now = Utc::now();
        self.expires_at = now + ttl;
        self.updated_at = now;
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ussd::menu::ProfileField;

    fn session() -> UssdSession {
        UssdSession::new("ATUid_1", "+254712345678", Duration::seconds(300))
    }

    #[test]
    fn test_new_session_starts_on_main_menu() {
        let session = session();
        assert_eq!(session.screen, MenuScreen::Main);
        assert!(session.farmer_id.is_none());
        assert!(session.data.is_empty());
        assert!(!session.is_expired());
    }

    #[test]
    fn test_reset_to_main_clears_transient_data() {
        let mut session = session();
        session.goto(MenuScreen::ProfileInput {
            field: ProfileField::FarmSize,
        });
        session.set_data("loan_reference", "FL00000001").unwrap();

        session.reset_to_main();
        assert_eq!(session.screen, MenuScreen::Main);
        assert!(session.data.is_empty());
    }

    #[test]
    fn test_data_round_trip() {
        let mut session = session();
        session.set_data("loan_reference", "FL12345678").unwrap();
        session.set_data("monthly_payment", 9583.33).unwrap();

        assert_eq!(
            session.get_string("loan_reference"),
            Some("FL12345678".to_string())
        );
        assert_eq!(session.get_f64("monthly_payment"), Some(9583.33));
        assert_eq!(session.get_string("missing"), None);
    }

    #[test]
    fn test_submission_receipt_replay() {
        let mut session = session();
        assert!(session.replay("loan:2").is_none());

        session.record_submission("loan:2", "END Application received");
        assert_eq!(
            session.replay("loan:2"),
            Some("END Application received".to_string())
        );
        assert!(session.replay("loan:1").is_none());
    }

    #[test]
    fn test_expiry() {
        let mut session = session();
        session.expires_at = Utc::now() - Duration::seconds(1);
        assert!(session.is_expired());

        session.touch(Duration::seconds(300));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_serde_round_trip() {
        let mut session = session();
        session.goto(MenuScreen::ProfileInput {
            field: ProfileField::YearsFarming,
        });
        session.record_submission("loan:1", "END ok");

        let json = serde_json::to_string(&session).unwrap();
        let restored: UssdSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.screen, session.screen);
        assert_eq!(restored.replay("loan:1"), Some("END ok".to_string()));
    }
}
