//! USSD menu state machine
//!
//! The engine is invoked once per hop. Each hop reconstructs the session
//! from the store, runs one state transition, persists the new session,
//! and returns the tagged response text. Transitions take the session by
//! value and hand back the replacement together with the response; nothing
//! is persisted until the transition has fully succeeded, so a mid-hop
//! fault leaves the previous state in place.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use super::gateway::FarmerGateway;
use super::menu::{self, MenuScreen, ProfileField};
use super::response::UssdResponse;
use crate::models::farmer::Farmer;
use crate::models::loan::{self, CreateLoanRequest, LoanProduct};
use crate::services::notification::{self, NotificationDispatcher};
use crate::state::{SessionLocks, SessionStore, UssdSession};
use crate::utils::errors::Result;
use crate::utils::helpers;

/// Outcome of one state transition: the session to persist and the reply
/// to hand back to the gateway.
struct Transition {
    session: UssdSession,
    response: UssdResponse,
}

impl Transition {
    fn con(session: UssdSession, text: impl Into<String>) -> Self {
        Self {
            session,
            response: UssdResponse::con(text),
        }
    }

    fn end(session: UssdSession, text: impl Into<String>) -> Self {
        Self {
            session,
            response: UssdResponse::end(text),
        }
    }

    /// Self-loop back to the main menu; the answer to any input the
    /// current screen does not recognize.
    fn main_menu(mut session: UssdSession) -> Self {
        session.reset_to_main();
        Self::con(session, menu::main_menu_text())
    }
}

pub struct UssdEngine {
    sessions: Arc<dyn SessionStore>,
    gateway: Arc<dyn FarmerGateway>,
    notifier: Arc<dyn NotificationDispatcher>,
    locks: SessionLocks,
    session_ttl: Duration,
    paybill: String,
}

impl UssdEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        gateway: Arc<dyn FarmerGateway>,
        notifier: Arc<dyn NotificationDispatcher>,
        session_ttl: Duration,
        paybill: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            gateway,
            notifier,
            locks: SessionLocks::new(),
            session_ttl,
            paybill: paybill.into(),
        }
    }

    /// Process one hop. Never surfaces an error to the gateway: any
    /// internal fault collapses to a single generic terminal message, and
    /// the details go to the log only.
    pub async fn handle_input(
        &self,
        session_id: &str,
        phone_number: &str,
        text: &str,
    ) -> UssdResponse {
        let _guard = self.locks.acquire(session_id).await;

        match self.process(session_id, phone_number, text).await {
            Ok(response) => response,
            Err(e) => {
                error!(session_id = session_id, error = %e, "USSD hop failed");
                UssdResponse::end(menu::GENERIC_ERROR)
            }
        }
    }

    async fn process(
        &self,
        session_id: &str,
        phone_number: &str,
        text: &str,
    ) -> Result<UssdResponse> {
        let phone = helpers::normalize_phone(phone_number)?;
        let input = last_token(text);

        let mut session = match self.sessions.load(session_id).await? {
            Some(existing) => existing,
            None => UssdSession::new(session_id, &phone, self.session_ttl),
        };

        let farmer = self.gateway.farmer_by_phone(&phone).await?;
        session.farmer_id = Some(farmer.id);

        debug!(
            session_id = session_id,
            screen = ?session.screen,
            input = input,
            "Processing USSD input"
        );

        let Transition {
            mut session,
            response,
        } = match session.screen.clone() {
            MenuScreen::Main => self.main_menu(session, &farmer, input).await?,
            MenuScreen::LoanMenu => self.loan_menu(session, &farmer, input).await?,
            MenuScreen::PaymentMenu => self.payment_menu(session, input),
            MenuScreen::ProfileMenu => self.profile_menu(session, input),
            MenuScreen::ProfileInput { field } => {
                self.profile_input(session, &farmer, field, input).await?
            }
        };

        session.touch(self.session_ttl);
        self.sessions.save(&session).await?;

        Ok(response)
    }

    /// Level 1. Unrecognized input, the empty first hop included,
    /// re-renders the main menu; that is the protocol's self-loop, not an
    /// error.
    async fn main_menu(
        &self,
        mut session: UssdSession,
        farmer: &Farmer,
        input: &str,
    ) -> Result<Transition> {
        match input {
            "1" => {
                let response = match self.gateway.latest_credit_score(farmer.id).await? {
                    Some(score) => menu::credit_score_text(score.score),
                    None => menu::NO_CREDIT_SCORE.to_string(),
                };
                Ok(Transition::end(session, response))
            }
            "2" => {
                session.goto(MenuScreen::LoanMenu);
                Ok(Transition::con(session, menu::loan_menu_text()))
            }
            "3" => match self.gateway.open_loan(farmer.id).await? {
                Some(loan) => {
                    session.goto(MenuScreen::PaymentMenu);
                    session.set_data("loan_reference", &loan.reference)?;
                    session.set_data("monthly_payment", loan.monthly_payment)?;
                    Ok(Transition::con(session, menu::payment_menu_text(&loan)))
                }
                None => Ok(Transition::end(session, menu::NO_ACTIVE_LOAN)),
            },
            "4" => {
                let response = match self.gateway.open_loan(farmer.id).await? {
                    Some(loan) => menu::loan_status_text(&loan),
                    None => menu::NO_ACTIVE_LOAN.to_string(),
                };
                Ok(Transition::end(session, response))
            }
            "5" => {
                session.goto(MenuScreen::ProfileMenu);
                Ok(Transition::con(session, menu::profile_menu_text()))
            }
            _ => Ok(Transition::main_menu(session)),
        }
    }

    async fn loan_menu(
        &self,
        mut session: UssdSession,
        farmer: &Farmer,
        input: &str,
    ) -> Result<Transition> {
        let Some(product) = LoanProduct::by_choice(input) else {
            return Ok(Transition::main_menu(session));
        };

        // A gateway retry replays the same cumulative input against the
        // same session; answer it with the recorded receipt instead of
        // writing a second loan.
        let token = format!("loan:{}", product.code);
        if let Some(reply) = session.replay(&token) {
            info!(
                session_id = %session.session_id,
                "Replaying loan submission receipt for retried request"
            );
            return Ok(Transition::end(session, reply));
        }

        let credit_score_id = self
            .gateway
            .latest_credit_score(farmer.id)
            .await?
            .map(|score| score.id);

        let amount = product.max_amount * loan::PRINCIPAL_FRACTION;
        let request = CreateLoanRequest {
            farmer_id: farmer.id,
            credit_score_id,
            reference: helpers::generate_reference(),
            product: product.name.to_string(),
            amount,
            term_months: loan::TERM_MONTHS,
            monthly_payment: loan::monthly_payment(amount, loan::TERM_MONTHS),
        };

        let created = self.gateway.create_loan(request).await?;
        info!(
            session_id = %session.session_id,
            farmer_id = farmer.id,
            reference = %created.reference,
            amount = created.amount,
            "Loan application submitted"
        );

        self.dispatch_notification(
            &session.phone_number,
            notification::loan_submitted_message(&created),
        );

        let reply = menu::loan_submitted_text(&created);
        session.record_submission(token, reply.clone());
        Ok(Transition::end(session, reply))
    }

    /// Entered only when an open loan exists; its reference and monthly
    /// figure were stashed in the session on entry.
    fn payment_menu(&self, session: UssdSession, input: &str) -> Transition {
        match input {
            "1" => {
                let reference = session.get_string("loan_reference").unwrap_or_default();
                let monthly_payment = session.get_f64("monthly_payment").unwrap_or_default();
                let reply =
                    menu::payment_instructions_text(&self.paybill, &reference, monthly_payment);
                Transition::end(session, reply)
            }
            // "2" is the advertised way back; anything else lands there too
            _ => Transition::main_menu(session),
        }
    }

    fn profile_menu(&self, mut session: UssdSession, input: &str) -> Transition {
        let field = match input {
            "1" => ProfileField::FarmSize,
            "2" => ProfileField::YearsFarming,
            _ => return Transition::main_menu(session),
        };

        session.goto(MenuScreen::ProfileInput { field });
        Transition::con(session, field.prompt())
    }

    async fn profile_input(
        &self,
        mut session: UssdSession,
        farmer: &Farmer,
        field: ProfileField,
        input: &str,
    ) -> Result<Transition> {
        match field.parse(input) {
            Some(update) => {
                self.gateway.update_profile(farmer.id, update.clone()).await?;
                info!(
                    session_id = %session.session_id,
                    farmer_id = farmer.id,
                    "Farm profile updated"
                );
                session.reset_to_main();
                Ok(Transition::end(session, menu::profile_updated_text(&update)))
            }
            // Unparseable value: hold the screen and ask again
            None => Ok(Transition::con(
                session,
                format!("{}\n{}", menu::INVALID_NUMBER, field.prompt()),
            )),
        }
    }

    /// Fire-and-forget: a failed SMS must never fail the USSD reply that
    /// triggered it.
    fn dispatch_notification(&self, phone_number: &str, message: String) {
        let notifier = Arc::clone(&self.notifier);
        let recipients = vec![phone_number.to_string()];
        tokio::spawn(async move {
            if let Err(e) = notifier.send(&recipients, &message).await {
                warn!(error = %e, "Loan confirmation SMS failed");
            }
        });
    }
}

/// Reduce the gateway's cumulative input to the latest token.
///
/// Gateways deliver the full input history joined with `*`; some deliver
/// only the increment. Taking the final `*`-separated segment handles
/// both.
pub fn last_token(text: &str) -> &str {
    text.rsplit('*').next().unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_token_of_cumulative_input() {
        assert_eq!(last_token("2*1"), "1");
        assert_eq!(last_token("5*1*12.5"), "12.5");
    }

    #[test]
    fn test_last_token_of_single_hop() {
        assert_eq!(last_token("2"), "2");
        assert_eq!(last_token(""), "");
        assert_eq!(last_token(" 4 "), "4");
    }
}
