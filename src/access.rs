//! Getting into a trip: access code, optional security question, and the
//! separate recovery question for a forgotten code.
//!
//! The flows below mirror what a person sees while joining. They are written
//! against [`TripGate`] so they run the same over the service layer or any
//! other backend.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use tokio::task;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::trip::{
        normalize_access_code, normalize_answer, CodeLookup, RecoveredCode, RecoveryLookup,
        SecurityChallenge, TripView,
    },
};

/// Argon2 runs on the blocking pool; it would otherwise stall a runtime worker.
pub async fn hash_answer(answer: &str) -> Result<String, AppError> {
    let answer = normalize_answer(answer);
    task::spawn_blocking(move || hash_normalized(&answer))
        .await
        .map_err(|err| AppError::Other(anyhow::anyhow!("answer hashing task failed: {err}")))?
}

pub async fn verify_answer(answer: &str, answer_hash: &str) -> Result<bool, AppError> {
    let answer = normalize_answer(answer);
    let answer_hash = answer_hash.to_string();
    task::spawn_blocking(move || verify_normalized(&answer, &answer_hash))
        .await
        .map_err(|err| AppError::Other(anyhow::anyhow!("answer check task failed: {err}")))?
}

fn hash_normalized(answer: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|err| AppError::Other(anyhow::anyhow!("salt encoding failed: {err}")))?;
    let hash = Argon2::default()
        .hash_password(answer.as_bytes(), &salt)
        .map_err(|err| AppError::Other(anyhow::anyhow!("hashing answer failed: {err}")))?;
    Ok(hash.to_string())
}

fn verify_normalized(answer: &str, answer_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(answer_hash)
        .map_err(|err| AppError::Other(anyhow::anyhow!("stored answer hash unreadable: {err}")))?;
    Ok(Argon2::default()
        .verify_password(answer.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
pub trait TripGate: Send + Sync {
    async fn lookup_code(&self, code: &str) -> Result<CodeLookup, AppError>;

    async fn verify_security(&self, trip_id: &str, answer: &str) -> Result<TripView, AppError>;

    async fn recovery_lookup(
        &self,
        name: &str,
        destination: &str,
    ) -> Result<RecoveryLookup, AppError>;

    async fn recover(
        &self,
        name: &str,
        destination: &str,
        answer: &str,
    ) -> Result<RecoveredCode, AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinState {
    EnteringCode,
    AnsweringSecurity {
        code: String,
        challenge: SecurityChallenge,
    },
    Granted(Box<TripView>),
}

#[derive(Debug, Clone)]
pub struct JoinFlow {
    state: JoinState,
    error: Option<String>,
}

impl Default for JoinFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl JoinFlow {
    pub fn new() -> Self {
        Self {
            state: JoinState::EnteringCode,
            error: None,
        }
    }

    pub fn state(&self) -> &JoinState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn granted(&self) -> Option<&TripView> {
        match &self.state {
            JoinState::Granted(trip) => Some(trip),
            _ => None,
        }
    }

    /// Starts a fresh attempt with `code`, whatever state the flow was in.
    pub async fn submit_code<G>(&mut self, gate: &G, code: &str) -> &JoinState
    where
        G: TripGate + ?Sized,
    {
        self.state = JoinState::EnteringCode;
        self.error = None;
        let code = normalize_access_code(code);
        let outcome = gate.lookup_code(&code).await;
        match outcome {
            Ok(CodeLookup::Granted(trip)) => self.state = JoinState::Granted(trip),
            Ok(CodeLookup::Challenge(challenge)) => {
                self.state = JoinState::AnsweringSecurity { code, challenge }
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        &self.state
    }

    /// A wrong answer keeps the same challenge on screen.
    pub async fn submit_answer<G>(&mut self, gate: &G, answer: &str) -> &JoinState
    where
        G: TripGate + ?Sized,
    {
        let JoinState::AnsweringSecurity { challenge, .. } = &self.state else {
            self.error = Some("no security question is pending".into());
            return &self.state;
        };
        let trip_id = challenge.trip_id.clone();
        let outcome = gate.verify_security(&trip_id, answer).await;
        match outcome {
            Ok(trip) => {
                self.error = None;
                self.state = JoinState::Granted(Box::new(trip));
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        &self.state
    }

    pub fn back(&mut self) {
        self.state = JoinState::EnteringCode;
        self.error = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryState {
    EnteringTripDetails,
    AnsweringRecoveryQuestion {
        name: String,
        destination: String,
        question: String,
    },
    Disclosed(RecoveredCode),
}

#[derive(Debug, Clone)]
pub struct RecoveryFlow {
    state: RecoveryState,
    error: Option<String>,
}

impl Default for RecoveryFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryFlow {
    pub fn new() -> Self {
        Self {
            state: RecoveryState::EnteringTripDetails,
            error: None,
        }
    }

    pub fn state(&self) -> &RecoveryState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit_details<G>(&mut self, gate: &G, name: &str, destination: &str) -> &RecoveryState
    where
        G: TripGate + ?Sized,
    {
        self.error = None;
        let outcome = gate.recovery_lookup(name, destination).await;
        match outcome {
            Ok(RecoveryLookup::Disclosed(code)) => self.state = RecoveryState::Disclosed(code),
            Ok(RecoveryLookup::Question(question)) => {
                self.state = RecoveryState::AnsweringRecoveryQuestion {
                    name: name.to_string(),
                    destination: destination.to_string(),
                    question: question.recovery_question,
                }
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        &self.state
    }

    pub async fn submit_answer<G>(&mut self, gate: &G, answer: &str) -> &RecoveryState
    where
        G: TripGate + ?Sized,
    {
        let RecoveryState::AnsweringRecoveryQuestion {
            name, destination, ..
        } = &self.state
        else {
            self.error = Some("no recovery question is pending".into());
            return &self.state;
        };
        let (name, destination) = (name.clone(), destination.clone());
        let outcome = gate.recover(&name, &destination, answer).await;
        match outcome {
            Ok(code) => {
                self.error = None;
                self.state = RecoveryState::Disclosed(code);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = RecoveryState::EnteringTripDetails;
        self.error = None;
    }
}
