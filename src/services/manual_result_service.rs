// src/services/manual_result_service.rs
use crate::models::game::GameMode;
use crate::repository::game_repository::{GameRepository, SubmitError};
use crate::services::lifecycle_service::MANUAL_WINDOW_SECS;

pub const BAD_REQUEST_MESSAGE: &str =
    "Results can only be added within 30 seconds of the endTime";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to set winner";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMode {
    Automatic,
    Manual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success(String),
    Error(String),
}

pub struct ManualResultGate {
    mode: GameMode,
    result_mode: ResultMode,
    staged: Option<String>,
    last_outcome: Option<SubmitOutcome>,
    toasts: Vec<String>,
}

impl ManualResultGate {
    pub fn new(mode: GameMode) -> Self {
        ManualResultGate {
            mode,
            result_mode: ResultMode::Automatic,
            staged: None,
            last_outcome: None,
            toasts: Vec::new(),
        }
    }

    pub fn result_mode(&self) -> ResultMode {
        self.result_mode
    }

    pub fn staged(&self) -> Option<&str> {
        self.staged.as_deref()
    }

    pub fn last_outcome(&self) -> Option<&SubmitOutcome> {
        self.last_outcome.as_ref()
    }

    // Anahtar yalnızca turun son 30 saniyesinde çalışır
    pub fn window_open(remaining_secs: Option<i64>) -> bool {
        matches!(remaining_secs, Some(r) if r <= MANUAL_WINDOW_SECS)
    }

    pub fn toggle(&mut self, remaining_secs: Option<i64>) -> Result<ResultMode, String> {
        if !Self::window_open(remaining_secs) {
            return Err("Time Out".to_string());
        }
        self.result_mode = match self.result_mode {
            ResultMode::Automatic => ResultMode::Manual,
            ResultMode::Manual => ResultMode::Automatic,
        };
        Ok(self.result_mode)
    }

    pub fn stage(&mut self, option: &str, remaining_secs: Option<i64>) -> Result<(), String> {
        if self.result_mode == ResultMode::Automatic {
            return Err("otomatik modda kazanan seçilemez".to_string());
        }
        if !Self::window_open(remaining_secs) {
            return Err("Time Out".to_string());
        }
        if !self.mode.options().iter().any(|o| o == option) {
            return Err(format!("{} için geçersiz seçenek: {}", self.mode.title(), option));
        }
        self.staged = Some(option.to_string());
        Ok(())
    }

    pub fn can_submit(&self, remaining_secs: Option<i64>) -> bool {
        self.result_mode == ResultMode::Manual
            && self.staged.is_some()
            && Self::window_open(remaining_secs)
    }

    pub async fn submit(
        &mut self,
        repo: &GameRepository,
        game_db_id: &str,
        remaining_secs: Option<i64>,
    ) -> SubmitOutcome {
        if !self.can_submit(remaining_secs) {
            let outcome = SubmitOutcome::Error(
                "kazanan gönderimi için manuel mod, seçim ve son 30 saniye gerekir".to_string(),
            );
            self.last_outcome = Some(outcome.clone());
            return outcome;
        }

        let option = self.staged.clone().unwrap_or_default();
        let outcome = match repo.post_manual_result(game_db_id, self.mode, &option).await {
            Ok(message) => {
                self.toasts.push(message.clone());
                SubmitOutcome::Success(message)
            }
            Err(SubmitError::BadRequest) => {
                self.toasts.push(BAD_REQUEST_MESSAGE.to_string());
                SubmitOutcome::Error(BAD_REQUEST_MESSAGE.to_string())
            }
            Err(SubmitError::Other(err)) => {
                eprintln!("kazanan gönderilemedi: {}", err);
                self.toasts
                    .push("Failed to set winner. Please try again.".to_string());
                SubmitOutcome::Error(GENERIC_FAILURE_MESSAGE.to_string())
            }
        };
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    pub fn drain_toasts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.toasts)
    }
}
