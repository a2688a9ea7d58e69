//! Test helpers module
//!
//! In-memory fakes for the data gateway and notification dispatcher, plus
//! fixture constructors, so engine scenarios run without Postgres or
//! Redis.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Months, Utc};

use ShambaCredit::models::credit_score::CreditScore;
use ShambaCredit::models::farmer::{Farmer, UpdateFarmerProfileRequest};
use ShambaCredit::models::loan::{CreateLoanRequest, Loan, STATUS_PENDING};
use ShambaCredit::services::NotificationDispatcher;
use ShambaCredit::state::MemorySessionStore;
use ShambaCredit::ussd::{FarmerGateway, UssdEngine};
use ShambaCredit::utils::errors::{Result, ShambaCreditError, SmsError};

pub const PHONE: &str = "+254712345678";
pub const SESSION: &str = "ATUid_test_1";

pub fn test_farmer(phone_number: &str) -> Farmer {
    Farmer {
        id: 7,
        phone_number: phone_number.to_string(),
        full_name: None,
        farm_size_acres: 0.0,
        years_farming: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_credit_score(score: f64) -> CreditScore {
    CreditScore {
        id: 42,
        farmer_id: 7,
        score,
        score_date: Utc::now(),
        created_at: Utc::now(),
    }
}

pub fn test_loan() -> Loan {
    Loan {
        id: 1,
        farmer_id: 7,
        credit_score_id: Some(42),
        reference: "FL00000042".to_string(),
        product: "Equipment Loan".to_string(),
        amount: 100_000.0,
        term_months: 12,
        monthly_payment: 9583.33,
        status: STATUS_PENDING.to_string(),
        next_payment_date: Utc::now().checked_add_months(Months::new(1)),
        created_at: Utc::now(),
    }
}

/// In-memory stand-in for the relational data gateway
#[derive(Default)]
pub struct MockGateway {
    pub credit_score: Mutex<Option<CreditScore>>,
    pub open_loan: Mutex<Option<Loan>>,
    pub created_loans: Mutex<Vec<Loan>>,
    pub profile_updates: Mutex<Vec<UpdateFarmerProfileRequest>>,
    /// When set, every call fails like a store outage
    pub fail: AtomicBool,
    next_loan_id: AtomicI64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            next_loan_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    pub fn set_credit_score(&self, score: f64) {
        *self.credit_score.lock().unwrap() = Some(test_credit_score(score));
    }

    pub fn set_open_loan(&self, loan: Loan) {
        *self.open_loan.lock().unwrap() = Some(loan);
    }

    fn check_available(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(ShambaCreditError::Config(
                "simulated store outage".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FarmerGateway for MockGateway {
    async fn farmer_by_phone(&self, phone_number: &str) -> Result<Farmer> {
        self.check_available()?;
        Ok(test_farmer(phone_number))
    }

    async fn latest_credit_score(&self, _farmer_id: i64) -> Result<Option<CreditScore>> {
        self.check_available()?;
        Ok(self.credit_score.lock().unwrap().clone())
    }

    async fn open_loan(&self, _farmer_id: i64) -> Result<Option<Loan>> {
        self.check_available()?;
        Ok(self.open_loan.lock().unwrap().clone())
    }

    async fn create_loan(&self, request: CreateLoanRequest) -> Result<Loan> {
        self.check_available()?;
        let loan = Loan {
            id: self.next_loan_id.fetch_add(1, Ordering::SeqCst),
            farmer_id: request.farmer_id,
            credit_score_id: request.credit_score_id,
            reference: request.reference,
            product: request.product,
            amount: request.amount,
            term_months: request.term_months,
            monthly_payment: request.monthly_payment,
            status: STATUS_PENDING.to_string(),
            next_payment_date: Utc::now().checked_add_months(Months::new(1)),
            created_at: Utc::now(),
        };
        self.created_loans.lock().unwrap().push(loan.clone());
        *self.open_loan.lock().unwrap() = Some(loan.clone());
        Ok(loan)
    }

    async fn update_profile(
        &self,
        _farmer_id: i64,
        request: UpdateFarmerProfileRequest,
    ) -> Result<Farmer> {
        self.check_available()?;
        self.profile_updates.lock().unwrap().push(request.clone());

        let mut farmer = test_farmer(PHONE);
        if let Some(acres) = request.farm_size_acres {
            farmer.farm_size_acres = acres;
        }
        if let Some(years) = request.years_farming {
            farmer.years_farming = years;
        }
        Ok(farmer)
    }
}

/// Dispatcher that records every send instead of talking to a provider
#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<(Vec<String>, String)>>,
    pub fail: AtomicBool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, recipients: &[String], message: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ShambaCreditError::Sms(SmsError::ServiceUnavailable));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipients.to_vec(), message.to_string()));
        Ok(())
    }
}

pub struct TestHarness {
    pub engine: UssdEngine,
    pub gateway: Arc<MockGateway>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub store: Arc<MemorySessionStore>,
}

pub fn harness() -> TestHarness {
    let gateway = Arc::new(MockGateway::new());
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let store = Arc::new(MemorySessionStore::new());

    let engine = UssdEngine::new(
        store.clone(),
        gateway.clone(),
        dispatcher.clone(),
        Duration::seconds(300),
        "877444",
    );

    TestHarness {
        engine,
        gateway,
        dispatcher,
        store,
    }
}
