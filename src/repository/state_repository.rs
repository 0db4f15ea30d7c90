// src/repository/state_repository.rs
use crate::models::game::{CompletedGameResult, GameMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// Sayfa yenilemeyi atlatan istemci durumu (localStorage karşılığı)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    #[serde(default)]
    pub completed_games: Vec<CompletedGameResult>,
    #[serde(default)]
    pub next_round: HashMap<GameMode, DateTime<Utc>>,
}

pub struct StateRepository {
    path: PathBuf,
}

impl StateRepository {
    pub fn new(path: PathBuf) -> Self {
        StateRepository { path }
    }

    pub fn load(&self) -> PersistedState {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(err) => {
                    eprintln!("durum dosyası okunamadı, sıfırdan başlanıyor: {}", err);
                    PersistedState::default()
                }
            },
            Err(_) => PersistedState::default(),
        }
    }

    pub fn save(&self, state: &PersistedState) {
        match serde_json::to_string_pretty(state) {
            Ok(raw) => {
                if let Err(err) = std::fs::write(&self.path, raw) {
                    eprintln!("durum dosyası yazılamadı: {}", err);
                }
            }
            Err(err) => eprintln!("durum serileştirilemedi: {}", err),
        }
    }
}
