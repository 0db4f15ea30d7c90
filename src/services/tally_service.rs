use crate::models::game::{Game, OptionDetail};

// Bahis özetleri; saf türetme, durum tutmaz

pub fn total_bet_amount(detail: &OptionDetail) -> f64 {
    detail.clients.iter().map(|c| c.bet_amount).sum()
}

pub fn total_users(detail: &OptionDetail) -> u32 {
    detail
        .total_users
        .unwrap_or(detail.clients.len() as u32)
}

pub fn final_amount(detail: &OptionDetail) -> f64 {
    detail.total_final_amount.unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TallyRow {
    pub option: String,
    pub total_users: u32,
    pub total_bet_amount: f64,
    pub total_final_amount: f64,
}

// Seçenek için özet satırı; detay yoksa sıfırlar
pub fn tally_row(game: &Game, option: &str) -> TallyRow {
    match game.details.iter().find(|d| d.color == option) {
        Some(detail) => TallyRow {
            option: option.to_string(),
            total_users: total_users(detail),
            total_bet_amount: total_bet_amount(detail),
            total_final_amount: final_amount(detail),
        },
        None => TallyRow {
            option: option.to_string(),
            total_users: 0,
            total_bet_amount: 0.0,
            total_final_amount: 0.0,
        },
    }
}

pub fn tally_rows(game: &Game) -> Vec<TallyRow> {
    game.mode
        .options()
        .iter()
        .map(|option| tally_row(game, option))
        .collect()
}

pub fn has_bets(game: &Game) -> bool {
    game.details.iter().any(|d| !d.clients.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::{ClientBet, GameMode};
    use chrono::Utc;

    fn detail(color: &str, bets: &[(&str, f64)]) -> OptionDetail {
        OptionDetail {
            color: color.to_string(),
            total_users: None,
            clients: bets
                .iter()
                .map(|(client, amount)| ClientBet {
                    client: client.to_string(),
                    bet_amount: *amount,
                })
                .collect(),
            total_final_amount: None,
        }
    }

    fn game_with(details: Vec<OptionDetail>) -> Game {
        let now = Utc::now();
        Game {
            id: "g".into(),
            game_id: "BW-1".into(),
            mode: GameMode::BlackWhite,
            start_time: now,
            end_time: now,
            status: None,
            results: None,
            details,
            countdown_secs: 0,
        }
    }

    #[test]
    fn sums_bet_amounts() {
        let d = detail("Black", &[("u1", 10.0), ("u2", 4.5), ("u3", 0.5)]);
        assert_eq!(total_bet_amount(&d), 15.0);
        assert_eq!(total_users(&d), 3);
    }

    #[test]
    fn empty_client_list_is_zero() {
        let d = detail("White", &[]);
        assert_eq!(total_bet_amount(&d), 0.0);
        assert_eq!(total_users(&d), 0);
        assert_eq!(final_amount(&d), 0.0);
    }

    #[test]
    fn missing_option_row_is_zeros() {
        let game = game_with(vec![detail("Black", &[("u1", 2.0)])]);
        let row = tally_row(&game, "White");
        assert_eq!(row.total_users, 0);
        assert_eq!(row.total_bet_amount, 0.0);
        assert_eq!(row.total_final_amount, 0.0);
    }

    #[test]
    fn backend_total_users_wins_over_client_count() {
        let mut d = detail("Black", &[("u1", 2.0)]);
        d.total_users = Some(7);
        assert_eq!(total_users(&d), 7);
    }

    #[test]
    fn rows_follow_mode_options() {
        let game = game_with(vec![detail("Black", &[("u1", 2.0)])]);
        let rows = tally_rows(&game);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].option, "Black");
        assert_eq!(rows[1].option, "White");
        assert!(has_bets(&game));
    }
}
