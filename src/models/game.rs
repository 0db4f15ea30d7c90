use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    #[serde(rename = "blackWhite")]
    BlackWhite,
    #[serde(rename = "tenColors")]
    TenColors,
}

impl GameMode {
    pub fn all() -> [GameMode; 2] {
        [GameMode::BlackWhite, GameMode::TenColors]
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameMode::BlackWhite => "Black & White",
            GameMode::TenColors => "Ten Colors",
        }
    }

    // Operatörün seçebileceği sonuçlar
    pub fn options(&self) -> Vec<String> {
        match self {
            GameMode::BlackWhite => vec!["Black".to_string(), "White".to_string()],
            GameMode::TenColors => (0..10).map(|i| format!("Color{}", i)).collect(),
        }
    }

    pub fn payout_note(&self) -> &'static str {
        match self {
            GameMode::BlackWhite => "Win Bet Amount * 1.9",
            GameMode::TenColors => "Win Bet Amount * 9",
        }
    }

    pub fn result_endpoint(&self) -> &'static str {
        match self {
            GameMode::BlackWhite => "blackWhiteResultsBeforeEnd",
            GameMode::TenColors => "tenColorsResultsBeforeEnd",
        }
    }

    pub fn parse(s: &str) -> Option<GameMode> {
        match s {
            "blackWhite" | "bw" => Some(GameMode::BlackWhite),
            "tenColors" | "tc" => Some(GameMode::TenColors),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientBet {
    pub client: String,
    #[serde(rename = "betAmount")]
    pub bet_amount: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OptionDetail {
    pub color: String,
    #[serde(rename = "totalUsers", default)]
    pub total_users: Option<u32>,
    #[serde(default)]
    pub clients: Vec<ClientBet>,
    #[serde(rename = "totalFinalAmount", default)]
    pub total_final_amount: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Game {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "gameId")]
    pub game_id: String,
    pub mode: GameMode,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub results: Option<String>,
    #[serde(default)]
    pub details: Vec<OptionDetail>,
    #[serde(skip)]
    pub countdown_secs: i64,
}

impl Game {
    // Kalan süre; bitişten sonra her zaman 0
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.end_time - now).num_seconds().max(0)
    }
}

pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn format_countdown_long(secs: i64) -> String {
    let secs = secs.max(0);
    let minutes = secs / 60;
    let rest = secs % 60;
    if minutes > 0 {
        format!("{} min {} sec", minutes, rest)
    } else {
        format!("{} sec", rest)
    }
}

// Biten oyunun sonucu; 5 saniye görünür kalır
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompletedGameResult {
    pub mode: GameMode,
    pub results: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct OngoingGamesResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Game>,
}

#[derive(Deserialize, Debug, Default)]
pub struct LastGameResults {
    #[serde(rename = "blackWhite")]
    pub black_white: Option<LastResult>,
    #[serde(rename = "tenColors")]
    pub ten_colors: Option<LastResult>,
}

#[derive(Deserialize, Debug)]
pub struct LastResult {
    pub results: String,
}
