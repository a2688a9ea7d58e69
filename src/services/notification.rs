//! Notification dispatch
//!
//! The menu state machine fires a confirmation SMS after a loan
//! submission. Dispatch is best-effort: by the time it runs the user has
//! already received their terminal USSD reply, so a delivery failure is
//! logged and dropped, never propagated.

use async_trait::async_trait;

use crate::models::loan::Loan;
use crate::services::sms::SmsService;
use crate::utils::errors::Result;
use crate::utils::logging;

/// Outbound notification seam used by the menu state machine
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, recipients: &[String], message: &str) -> Result<()>;
}

#[async_trait]
impl NotificationDispatcher for SmsService {
    async fn send(&self, recipients: &[String], message: &str) -> Result<()> {
        let report = self.send_message(recipients, message).await?;
        logging::log_sms_result(recipients.len(), report.accepted, report.rejected);
        Ok(())
    }
}

/// Confirmation message for a submitted loan application
pub fn loan_submitted_message(loan: &Loan) -> String {
    format!(
        "Your {} application of KES {:.0} (ref {}) has been received and is pending review. Repayment: KES {:.2}/month for {} months.",
        loan.product, loan.amount, loan.reference, loan.monthly_payment, loan.term_months
    )
}
