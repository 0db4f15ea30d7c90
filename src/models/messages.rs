use crate::models::game::{Game, GameMode};
use serde::{Deserialize, Serialize};

// WebSocket üzerinden akan mesajlar; "type" alanına göre ayrışır
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum FeedMessage {
    #[serde(rename = "BET")]
    Bet {
        #[serde(rename = "gameId")]
        game_id: String,
        amount: f64,
        color: String,
        #[serde(rename = "gameMode")]
        game_mode: GameMode,
    },
    #[serde(rename = "SET_MANUAL_RESULT")]
    SetManualResult {
        #[serde(rename = "gameId")]
        game_id: String,
        #[serde(rename = "manualResult")]
        manual_result: String,
    },
    #[serde(rename = "GAME_STATE")]
    GameState { game: Game },
    #[serde(rename = "GAME_ENDED")]
    GameEnded { game: Game },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_message_wire_format() {
        let msg = FeedMessage::Bet {
            game_id: "66b1f0".into(),
            amount: 12.5,
            color: "Black".into(),
            game_mode: GameMode::BlackWhite,
        };
        let wire = serde_json::to_value(&msg).unwrap();
        assert_eq!(wire["type"], "BET");
        assert_eq!(wire["gameId"], "66b1f0");
        assert_eq!(wire["gameMode"], "blackWhite");
    }

    #[test]
    fn game_ended_parses() {
        let raw = r#"{
            "type": "GAME_ENDED",
            "game": {
                "_id": "abc",
                "gameId": "TC-9",
                "mode": "tenColors",
                "startTime": "2026-08-28T10:00:00Z",
                "endTime": "2026-08-28T10:15:00Z",
                "results": "Color3"
            }
        }"#;
        match serde_json::from_str::<FeedMessage>(raw).unwrap() {
            FeedMessage::GameEnded { game } => {
                assert_eq!(game.id, "abc");
                assert_eq!(game.results.as_deref(), Some("Color3"));
            }
            other => panic!("beklenmeyen mesaj: {:?}", other),
        }
    }

    #[test]
    fn unknown_type_is_an_error() {
        let raw = r#"{"type": "PING"}"#;
        assert!(serde_json::from_str::<FeedMessage>(raw).is_err());
    }
}
