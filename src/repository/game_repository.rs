// src/repository/game_repository.rs
use crate::config::app_config::AppConfig;
use crate::models::game::{Game, GameMode, LastGameResults, OngoingGamesResponse};
use reqwest::StatusCode;
use std::error::Error;

type RepoResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// Manuel sonuç gönderiminin sonucu; 400 özel olarak ele alınır
#[derive(Debug)]
pub enum SubmitError {
    BadRequest,
    Other(String),
}

#[derive(Clone)]
pub struct GameRepository {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GameRepository {
    pub fn new(config: &AppConfig) -> Self {
        GameRepository {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    pub async fn fetch_ongoing_games(&self) -> RepoResult<Vec<Game>> {
        let response = self
            .http
            .get(format!("{}/api/games/ongoing", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("ongoing games isteği başarısız: {}", response.status()).into());
        }
        let body: OngoingGamesResponse = response.json().await?;
        if !body.success {
            return Err("Failed to fetch ongoing games".into());
        }
        let mut games = body.data;
        // Panel sırası: önce blackWhite, sonra tenColors
        games.sort_by_key(|g| match g.mode {
            GameMode::BlackWhite => 0,
            GameMode::TenColors => 1,
        });
        Ok(games)
    }

    // Admin detayları; istemci tarafında moda göre süzülür
    pub async fn fetch_game_details(&self, mode: GameMode) -> RepoResult<Vec<Game>> {
        let games = self.fetch_all_game_details().await?;
        Ok(games.into_iter().filter(|g| g.mode == mode).collect())
    }

    pub async fn fetch_all_game_details(&self) -> RepoResult<Vec<Game>> {
        let response = self
            .http
            .get(format!("{}/admin/ongoing-game-details", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("game details isteği başarısız: {}", response.status()).into());
        }
        let body: serde_json::Value = response.json().await?;
        if !body.is_array() {
            return Err("API response is not an array".into());
        }
        Ok(serde_json::from_value(body)?)
    }

    pub async fn fetch_last_results(&self) -> RepoResult<LastGameResults> {
        let response = self
            .http
            .get(format!("{}/admin/last-game-results", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("last results isteği başarısız: {}", response.status()).into());
        }
        Ok(response.json().await?)
    }

    pub async fn post_manual_result(
        &self,
        game_db_id: &str,
        mode: GameMode,
        option: &str,
    ) -> Result<String, SubmitError> {
        let url = format!(
            "{}/api/games/{}/{}",
            self.base_url,
            game_db_id,
            mode.result_endpoint()
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "results": option }))
            .send()
            .await
            .map_err(|e| SubmitError::Other(e.to_string()))?;

        match response.status() {
            StatusCode::BAD_REQUEST => Err(SubmitError::BadRequest),
            status if status.is_success() => {
                let body: serde_json::Value = response.json().await.unwrap_or_default();
                let message = body
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Winner set successfully: {}", option));
                Ok(message)
            }
            status => Err(SubmitError::Other(format!("beklenmeyen durum kodu: {}", status))),
        }
    }
}
