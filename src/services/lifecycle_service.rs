// src/services/lifecycle_service.rs
use crate::models::game::{CompletedGameResult, Game, GameMode};
use crate::repository::game_repository::GameRepository;
use crate::repository::state_repository::PersistedState;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

pub const NEXT_ROUND_SECS: i64 = 35;
pub const REVEAL_SECS: i64 = 5;
pub const MANUAL_WINDOW_SECS: i64 = 30;
pub const FETCH_ATTEMPTS: u32 = 3;

#[derive(Debug, PartialEq, Eq)]
pub enum LifecycleError {
    // Ardışık istekler tükendi; panelin baştan kurulması gerekir
    ReloadRequired,
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleError::ReloadRequired => write!(f, "reload required"),
        }
    }
}

impl std::error::Error for LifecycleError {}

// Mod başına tur evresi; Active iken tabloda kayıt yoktur
#[derive(Debug, Clone, PartialEq)]
pub enum RoundPhase {
    Active,
    Revealing {
        reveal_until: DateTime<Utc>,
        next_deadline: DateTime<Utc>,
    },
    AwaitingNext {
        next_deadline: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundCompleted {
    pub mode: GameMode,
    pub results: Option<String>,
}

#[derive(Debug, Default)]
pub struct TickOutcome {
    pub completed: Vec<RoundCompleted>,
    // Yeni tur son anketi şimdi atılmalı
    pub refresh_now: bool,
    pub dirty: bool,
}

pub struct GameLifecycleController {
    games: Vec<Game>,
    phases: HashMap<GameMode, RoundPhase>,
    completed: Vec<CompletedGameResult>,
    poll_seq: u64,
}

impl GameLifecycleController {
    pub fn new() -> Self {
        GameLifecycleController {
            games: Vec::new(),
            phases: HashMap::new(),
            completed: Vec::new(),
            poll_seq: 0,
        }
    }

    pub fn from_persisted(state: &PersistedState) -> Self {
        let mut controller = Self::new();
        controller.completed = state.completed_games.clone();
        for (mode, deadline) in &state.next_round {
            controller.phases.insert(
                *mode,
                RoundPhase::AwaitingNext {
                    next_deadline: *deadline,
                },
            );
        }
        controller
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn games_for_mode(&self, mode: GameMode) -> Vec<&Game> {
        self.games.iter().filter(|g| g.mode == mode).collect()
    }

    pub fn current_game(&self, mode: GameMode) -> Option<&Game> {
        self.games.iter().find(|g| g.mode == mode)
    }

    pub fn remaining_secs(&self, mode: GameMode, now: DateTime<Utc>) -> Option<i64> {
        self.current_game(mode).map(|g| g.remaining_secs(now))
    }

    pub fn phase(&self, mode: GameMode) -> RoundPhase {
        self.phases.get(&mode).cloned().unwrap_or(RoundPhase::Active)
    }

    pub fn next_round_countdown(&self, mode: GameMode, now: DateTime<Utc>) -> Option<i64> {
        let deadline = match self.phases.get(&mode)? {
            RoundPhase::Active => return None,
            RoundPhase::Revealing { next_deadline, .. } => *next_deadline,
            RoundPhase::AwaitingNext { next_deadline } => *next_deadline,
        };
        Some((deadline - now).num_seconds().clamp(0, NEXT_ROUND_SECS))
    }

    pub fn revealed_result(&self, mode: GameMode) -> Option<&CompletedGameResult> {
        self.completed.iter().find(|c| c.mode == mode)
    }

    // Anket sırası; her istek tek artan numara alır
    pub fn next_poll_seq(&mut self) -> u64 {
        self.poll_seq += 1;
        self.poll_seq
    }

    // Yalnızca en son yayınlanan isteğin yanıtı uygulanır; bayatlar atılır
    pub fn apply_poll(&mut self, seq: u64, games: Vec<Game>, now: DateTime<Utc>) -> bool {
        if seq != self.poll_seq {
            return false;
        }
        self.games = games;
        for game in &mut self.games {
            game.countdown_secs = game.remaining_secs(now);
        }
        true
    }

    // Admin detaylarını kimliğe göre mevcut listeye işler
    pub fn apply_details(&mut self, details: Vec<Game>, now: DateTime<Utc>) {
        for mut incoming in details {
            if let Some(existing) = self.games.iter_mut().find(|g| g.id == incoming.id) {
                incoming.countdown_secs = incoming.remaining_secs(now);
                *existing = incoming;
            }
        }
    }

    // WebSocket GAME_STATE / GAME_ENDED yaması; yalnızca kimlik eşleşirse
    pub fn patch_game(&mut self, mut game: Game, now: DateTime<Utc>) {
        game.countdown_secs = game.remaining_secs(now);
        if let Some(existing) = self.games.iter_mut().find(|g| g.id == game.id) {
            *existing = game;
        }
    }

    // Açılışta son oyun sonuçları da 5 saniyelik gösterime girer
    pub fn record_completed(&mut self, mode: GameMode, results: &str, now: DateTime<Utc>) {
        self.completed.push(CompletedGameResult {
            mode,
            results: results.to_string(),
            expires_at: now + Duration::seconds(REVEAL_SECS),
        });
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for game in &mut self.games {
            game.countdown_secs = game.remaining_secs(now);
        }

        // Süresi dolan tur tamamlanır; mod başına tek orkestrasyon
        let ended: Vec<(GameMode, Option<String>)> = self
            .games
            .iter()
            .filter(|g| g.countdown_secs == 0 && !self.phases.contains_key(&g.mode))
            .map(|g| (g.mode, g.results.clone()))
            .collect();
        for (mode, results) in ended {
            self.completed.push(CompletedGameResult {
                mode,
                results: results.clone().unwrap_or_default(),
                expires_at: now + Duration::seconds(REVEAL_SECS),
            });
            self.phases.insert(
                mode,
                RoundPhase::Revealing {
                    reveal_until: now + Duration::seconds(REVEAL_SECS),
                    next_deadline: now + Duration::seconds(NEXT_ROUND_SECS),
                },
            );
            outcome.completed.push(RoundCompleted { mode, results });
            outcome.dirty = true;
        }

        let shown = self.completed.len();
        self.completed.retain(|c| c.expires_at > now);
        if self.completed.len() != shown {
            outcome.dirty = true;
        }

        for mode in GameMode::all() {
            match self.phases.get(&mode).cloned() {
                Some(RoundPhase::Revealing {
                    reveal_until,
                    next_deadline,
                }) if now >= reveal_until => {
                    self.phases
                        .insert(mode, RoundPhase::AwaitingNext { next_deadline });
                }
                Some(RoundPhase::AwaitingNext { next_deadline }) if now >= next_deadline => {
                    // Son anket zamanı geldi; sayaç temizlenir ve taze tur beklenir
                    self.phases.remove(&mode);
                    outcome.refresh_now = true;
                    outcome.dirty = true;
                }
                _ => {}
            }
        }

        outcome
    }

    pub fn persisted(&self) -> PersistedState {
        let mut next_round = HashMap::new();
        for (mode, phase) in &self.phases {
            let deadline = match phase {
                RoundPhase::Active => continue,
                RoundPhase::Revealing { next_deadline, .. } => *next_deadline,
                RoundPhase::AwaitingNext { next_deadline } => *next_deadline,
            };
            next_round.insert(*mode, deadline);
        }
        PersistedState {
            completed_games: self.completed.clone(),
            next_round,
        }
    }
}

impl Default for GameLifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

// Devam eden oyunlar; 3 ardışık hatadan sonra panel baştan kurulur
pub async fn poll_ongoing(
    repo: GameRepository,
    retry_delay: std::time::Duration,
) -> Result<Vec<Game>, LifecycleError> {
    for attempt in 1..=FETCH_ATTEMPTS {
        match repo.fetch_ongoing_games().await {
            Ok(games) => return Ok(games),
            Err(err) => {
                eprintln!("Error fetching ongoing games: {}", err);
                if attempt < FETCH_ATTEMPTS {
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }
    Err(LifecycleError::ReloadRequired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_game(mode: GameMode, id: &str, ends_in: i64, now: DateTime<Utc>) -> Game {
        Game {
            id: id.to_string(),
            game_id: format!("G-{}", id),
            mode,
            start_time: now - Duration::seconds(900),
            end_time: now + Duration::seconds(ends_in),
            status: Some("ongoing".to_string()),
            results: Some("Black".to_string()),
            details: vec![],
            countdown_secs: 0,
        }
    }

    #[test]
    fn countdown_is_clamped_and_non_increasing() {
        let now = Utc::now();
        let mut controller = GameLifecycleController::new();
        let seq = controller.next_poll_seq();
        controller.apply_poll(seq, vec![mk_game(GameMode::BlackWhite, "a", 10, now)], now);

        let mut last = i64::MAX;
        for offset in 0..15 {
            controller.tick(now + Duration::seconds(offset));
            let remaining = controller.games()[0].countdown_secs;
            assert!(remaining <= last);
            assert!(remaining >= 0);
            last = remaining;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn round_end_starts_exactly_one_orchestration() {
        let now = Utc::now();
        let mut controller = GameLifecycleController::new();
        let seq = controller.next_poll_seq();
        controller.apply_poll(seq, vec![mk_game(GameMode::BlackWhite, "a", 5, now)], now);

        // 6 tik sonra sayaç sıfırda ve tek tamamlanma olayı var
        let mut events = 0;
        for offset in 0..=5 {
            events += controller.tick(now + Duration::seconds(offset)).completed.len();
        }
        assert_eq!(events, 1);
        let end = now + Duration::seconds(5);
        assert_eq!(
            crate::models::game::format_countdown(controller.games()[0].countdown_secs),
            "00:00"
        );
        assert_eq!(controller.next_round_countdown(GameMode::BlackWhite, end), Some(NEXT_ROUND_SECS));
        assert!(controller.revealed_result(GameMode::BlackWhite).is_some());

        // Sonraki tikler yeni olay üretmez
        let again = controller.tick(end + Duration::seconds(1));
        assert!(again.completed.is_empty());
    }

    #[test]
    fn reveal_disappears_after_five_seconds() {
        let now = Utc::now();
        let mut controller = GameLifecycleController::new();
        let seq = controller.next_poll_seq();
        controller.apply_poll(seq, vec![mk_game(GameMode::TenColors, "t", 5, now)], now);

        let end = now + Duration::seconds(5);
        controller.tick(end);
        assert!(controller.revealed_result(GameMode::TenColors).is_some());

        controller.tick(end + Duration::seconds(4));
        assert!(controller.revealed_result(GameMode::TenColors).is_some());

        controller.tick(end + Duration::seconds(5));
        assert!(controller.revealed_result(GameMode::TenColors).is_none());
        assert_eq!(
            controller.phase(GameMode::TenColors),
            RoundPhase::AwaitingNext {
                next_deadline: end + Duration::seconds(NEXT_ROUND_SECS)
            }
        );
    }

    #[test]
    fn final_poll_fires_at_deadline_and_clears_phase() {
        let now = Utc::now();
        let mut controller = GameLifecycleController::new();
        let seq = controller.next_poll_seq();
        controller.apply_poll(seq, vec![mk_game(GameMode::BlackWhite, "a", 0, now)], now);

        controller.tick(now);
        let deadline = now + Duration::seconds(NEXT_ROUND_SECS);
        assert_eq!(
            controller.next_round_countdown(GameMode::BlackWhite, now + Duration::seconds(30)),
            Some(5)
        );

        let before = controller.tick(deadline - Duration::seconds(1));
        assert!(!before.refresh_now);

        let at = controller.tick(deadline);
        assert!(at.refresh_now);
        assert_eq!(controller.phase(GameMode::BlackWhite), RoundPhase::Active);
    }

    #[test]
    fn stale_poll_response_is_discarded() {
        let now = Utc::now();
        let mut controller = GameLifecycleController::new();
        let old_seq = controller.next_poll_seq();
        let new_seq = controller.next_poll_seq();

        assert!(controller.apply_poll(new_seq, vec![mk_game(GameMode::BlackWhite, "new", 60, now)], now));
        assert!(!controller.apply_poll(old_seq, vec![mk_game(GameMode::BlackWhite, "old", 10, now)], now));
        assert_eq!(controller.games()[0].id, "new");
    }

    #[test]
    fn patch_game_matches_identity_only() {
        let now = Utc::now();
        let mut controller = GameLifecycleController::new();
        let seq = controller.next_poll_seq();
        controller.apply_poll(seq, vec![mk_game(GameMode::BlackWhite, "a", 60, now)], now);

        let mut patched = mk_game(GameMode::BlackWhite, "a", 60, now);
        patched.results = Some("White".to_string());
        controller.patch_game(patched, now);
        assert_eq!(controller.games()[0].results.as_deref(), Some("White"));

        // Bilinmeyen kimlik listeye eklenmez
        controller.patch_game(mk_game(GameMode::BlackWhite, "zzz", 60, now), now);
        assert_eq!(controller.games().len(), 1);
    }

    #[test]
    fn persisted_state_round_trips_through_restore() {
        let now = Utc::now();
        let mut controller = GameLifecycleController::new();
        let seq = controller.next_poll_seq();
        controller.apply_poll(seq, vec![mk_game(GameMode::TenColors, "t", 0, now)], now);
        controller.tick(now);

        let saved = controller.persisted();
        assert_eq!(saved.completed_games.len(), 1);
        assert!(saved.next_round.contains_key(&GameMode::TenColors));

        let restored = GameLifecycleController::from_persisted(&saved);
        assert_eq!(
            restored.next_round_countdown(GameMode::TenColors, now + Duration::seconds(15)),
            Some(20)
        );
        assert!(restored.revealed_result(GameMode::TenColors).is_some());
    }

    #[test]
    fn startup_results_expire_like_any_reveal() {
        let now = Utc::now();
        let mut controller = GameLifecycleController::new();
        controller.record_completed(GameMode::BlackWhite, "Black", now);
        assert!(controller.revealed_result(GameMode::BlackWhite).is_some());
        controller.tick(now + Duration::seconds(REVEAL_SECS));
        assert!(controller.revealed_result(GameMode::BlackWhite).is_none());
    }
}
