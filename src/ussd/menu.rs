//! Menu screens and user-visible text
//!
//! The set of screens a session can be parked on between hops is a closed
//! enumeration: an unhandled screen is a compile error, not a silent
//! fallthrough. Screens that answer within the hop that selects them
//! (credit score, loan status) need no variant.

use serde::{Deserialize, Serialize};

use crate::models::credit_score::RiskBand;
use crate::models::farmer::UpdateFarmerProfileRequest;
use crate::models::loan::{Loan, LoanProduct};
use crate::utils::helpers;

/// Screen a session is waiting on for its next input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum MenuScreen {
    Main,
    LoanMenu,
    PaymentMenu,
    ProfileMenu,
    ProfileInput { field: ProfileField },
}

/// Profile field being collected on the profile input screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    FarmSize,
    YearsFarming,
}

impl ProfileField {
    pub fn prompt(&self) -> &'static str {
        match self {
            ProfileField::FarmSize => "Enter your farm size in acres:",
            ProfileField::YearsFarming => "Enter your years of farming experience:",
        }
    }

    /// Parse the raw token as this field's value. Returns the partial
    /// profile update on success, `None` on anything unparseable.
    pub fn parse(&self, input: &str) -> Option<UpdateFarmerProfileRequest> {
        let input = input.trim();
        match self {
            ProfileField::FarmSize => input
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| UpdateFarmerProfileRequest {
                    farm_size_acres: Some(v),
                    ..Default::default()
                }),
            ProfileField::YearsFarming => input
                .parse::<i32>()
                .ok()
                .filter(|v| *v >= 0)
                .map(|v| UpdateFarmerProfileRequest {
                    years_farming: Some(v),
                    ..Default::default()
                }),
        }
    }
}

pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";
pub const NO_CREDIT_SCORE: &str =
    "Your credit score is not available yet. Please try again later.";
pub const NO_ACTIVE_LOAN: &str = "You have no active loan.";
pub const INVALID_NUMBER: &str = "That is not a valid number.";

pub fn main_menu_text() -> String {
    "Welcome to ShambaCredit\n\
     1. My credit score\n\
     2. Apply for a loan\n\
     3. Make a payment\n\
     4. Loan status\n\
     5. Update farm profile"
        .to_string()
}

pub fn loan_menu_text() -> String {
    let mut text = String::from("Select a loan product:");
    for product in LoanProduct::catalog() {
        text.push_str(&format!(
            "\n{}. {} (up to KES {:.0})",
            product.code, product.name, product.max_amount
        ));
    }
    text
}

pub fn profile_menu_text() -> String {
    "Update farm profile:\n\
     1. Farm size (acres)\n\
     2. Years farming"
        .to_string()
}

pub fn credit_score_text(score: f64) -> String {
    format!(
        "Your credit score is {:.0} ({}).",
        score,
        RiskBand::from_score(score)
    )
}

pub fn loan_submitted_text(loan: &Loan) -> String {
    format!(
        "Application received: {} of KES {:.0} over {} months. Ref {}. An SMS confirmation is on its way.",
        loan.product, loan.amount, loan.term_months, loan.reference
    )
}

pub fn payment_menu_text(loan: &Loan) -> String {
    format!(
        "Loan {}: KES {:.2} outstanding, monthly payment KES {:.2}.\n\
         1. Get payment instructions\n\
         2. Main menu",
        loan.reference, loan.amount, loan.monthly_payment
    )
}

pub fn payment_instructions_text(paybill: &str, reference: &str, monthly_payment: f64) -> String {
    format!(
        "Pay KES {:.2} via M-Pesa paybill {}, account {}.",
        monthly_payment, paybill, reference
    )
}

pub fn loan_status_text(loan: &Loan) -> String {
    let due = loan
        .next_payment_date
        .map(helpers::format_date)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Loan {}: KES {:.2}\nStatus: {}\nNext payment: KES {:.2} due {}",
        loan.reference, loan.amount, loan.status, loan.monthly_payment, due
    )
}

pub fn profile_updated_text(update: &UpdateFarmerProfileRequest) -> String {
    if let Some(acres) = update.farm_size_acres {
        format!("Profile updated. Farm size set to {} acres.", acres)
    } else if let Some(years) = update.years_farming {
        format!("Profile updated. Years farming set to {}.", years)
    } else {
        "Profile updated.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_lists_all_options() {
        let text = main_menu_text();
        for option in ["1.", "2.", "3.", "4.", "5."] {
            assert!(text.contains(option), "missing option {option}");
        }
    }

    #[test]
    fn test_loan_menu_renders_catalog() {
        let text = loan_menu_text();
        assert!(text.contains("Equipment Loan"));
        assert!(text.contains("200000"));
    }

    #[test]
    fn test_farm_size_parses_as_float() {
        let update = ProfileField::FarmSize.parse("12.5").unwrap();
        assert_eq!(update.farm_size_acres, Some(12.5));
        assert_eq!(update.years_farming, None);

        assert!(ProfileField::FarmSize.parse("twelve").is_none());
        assert!(ProfileField::FarmSize.parse("-3").is_none());
    }

    #[test]
    fn test_years_farming_parses_as_integer() {
        let update = ProfileField::YearsFarming.parse("8").unwrap();
        assert_eq!(update.years_farming, Some(8));

        // Years are whole numbers; fractions are rejected, not rounded.
        assert!(ProfileField::YearsFarming.parse("3.5").is_none());
        assert!(ProfileField::YearsFarming.parse("-1").is_none());
    }

    #[test]
    fn test_credit_score_text_includes_band() {
        assert_eq!(
            credit_score_text(712.0),
            "Your credit score is 712 (Low Risk)."
        );
    }
}
