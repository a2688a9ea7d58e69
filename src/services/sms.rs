//! SMS gateway service implementation
//!
//! This service handles delivery of outbound SMS through an
//! Africa's-Talking-style HTTP API: form-encoded requests, an `apiKey`
//! header, and a JSON delivery report with per-recipient status.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SmsConfig;
use crate::utils::errors::{Result, ShambaCreditError, SmsError};

/// SMS API response structure
#[derive(Debug, Clone, Deserialize)]
pub struct SmsApiResponse {
    #[serde(rename = "SMSMessageData")]
    pub message_data: SmsMessageData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsMessageData {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Recipients", default)]
    pub recipients: Vec<SmsRecipient>,
}

/// Per-recipient delivery result
#[derive(Debug, Clone, Deserialize)]
pub struct SmsRecipient {
    pub number: String,
    pub status: String,
    #[serde(rename = "statusCode")]
    pub status_code: i32,
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(default)]
    pub cost: Option<String>,
}

/// Summary of one dispatch
#[derive(Debug, Clone)]
pub struct SmsDeliveryReport {
    pub accepted: usize,
    pub rejected: usize,
    pub recipients: Vec<SmsRecipient>,
}

/// SMS service for outbound notifications
#[derive(Debug, Clone)]
pub struct SmsService {
    client: Client,
    config: SmsConfig,
}

impl SmsService {
    /// Create a new SmsService instance
    pub fn new(config: SmsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("ShambaCredit/1.0")
            .build()
            .map_err(ShambaCreditError::Http)?;

        Ok(Self { client, config })
    }

    /// Send one message to a list of recipients
    pub async fn send_message(
        &self,
        recipients: &[String],
        message: &str,
    ) -> Result<SmsDeliveryReport> {
        if recipients.is_empty() {
            return Err(SmsError::RequestFailed("No recipients given".to_string()).into());
        }

        let to = recipients.join(",");
        let mut params: Vec<(&str, &str)> = vec![
            ("username", self.config.username.as_str()),
            ("to", to.as_str()),
            ("message", message),
        ];
        if let Some(sender_id) = &self.config.sender_id {
            params.push(("from", sender_id.as_str()));
        }

        debug!(recipients = recipients.len(), "Sending SMS");

        let response = self
            .client
            .post(&self.config.api_url)
            .header("apiKey", &self.config.api_key)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ShambaCreditError::Sms(SmsError::Timeout)
                } else if e.is_connect() {
                    ShambaCreditError::Sms(SmsError::ServiceUnavailable)
                } else {
                    ShambaCreditError::Sms(SmsError::RequestFailed(e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SmsError::RequestFailed(format!("HTTP {}: {}", status, error_text)).into());
        }

        let api_response: SmsApiResponse = response
            .json()
            .await
            .map_err(|e| ShambaCreditError::Sms(SmsError::InvalidResponse(e.to_string())))?;

        let recipients = api_response.message_data.recipients;
        let accepted = recipients.iter().filter(|r| r.status == "Success").count();
        let rejected = recipients.len() - accepted;

        if accepted == 0 {
            // The provider answered but took nothing; surface the first
            // per-recipient status if there is one.
            return match recipients.first() {
                Some(recipient) => Err(SmsError::Rejected {
                    number: recipient.number.clone(),
                    status: recipient.status.clone(),
                }
                .into()),
                None => Err(SmsError::InvalidResponse(api_response.message_data.message).into()),
            };
        }

        for recipient in recipients.iter().filter(|r| r.status != "Success") {
            warn!(
                number = %recipient.number,
                status = %recipient.status,
                status_code = recipient.status_code,
                "SMS recipient rejected"
            );
        }

        Ok(SmsDeliveryReport {
            accepted,
            rejected,
            recipients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_deserialization() {
        let json = r#"{
            "SMSMessageData": {
                "Message": "Sent to 1/1 Total Cost: KES 0.8000",
                "Recipients": [{
                    "number": "+254712345678",
                    "status": "Success",
                    "statusCode": 101,
                    "messageId": "ATXid_abc123",
                    "cost": "KES 0.8000"
                }]
            }
        }"#;

        let response: SmsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message_data.recipients.len(), 1);
        assert_eq!(response.message_data.recipients[0].status, "Success");
        assert_eq!(response.message_data.recipients[0].status_code, 101);
    }

    #[test]
    fn test_api_response_without_recipients() {
        let json = r#"{"SMSMessageData": {"Message": "InvalidSenderId"}}"#;
        let response: SmsApiResponse = serde_json::from_str(json).unwrap();
        assert!(response.message_data.recipients.is_empty());
    }
}
