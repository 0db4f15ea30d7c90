use admin_dashboard::config::app_config::AppConfig;
use admin_dashboard::models::game::{format_countdown, Game, GameMode};
use admin_dashboard::models::messages::FeedMessage;
use admin_dashboard::repository::game_repository::GameRepository;
use admin_dashboard::repository::state_repository::StateRepository;
use admin_dashboard::services::lifecycle_service::{
    poll_ongoing, GameLifecycleController, LifecycleError,
};
use admin_dashboard::services::manual_result_service::{ManualResultGate, ResultMode, SubmitOutcome};
use admin_dashboard::services::realtime_feed_service::RealtimeFeed;
use admin_dashboard::services::tally_service;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

struct PollResult {
    seq: u64,
    games: Result<Vec<Game>, LifecycleError>,
    details: Option<Vec<Game>>,
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_args();
    if config.token.is_empty() {
        // Token olmadan admin uçları çağrılamaz
        eprintln!("Error: Token not found");
        std::process::exit(1);
    }

    loop {
        match run_dashboard(&config).await {
            Ok(()) => break,
            Err(LifecycleError::ReloadRequired) => {
                eprintln!("Devam eden oyunlar alınamadı, panel yeniden yükleniyor...");
            }
        }
    }
}

async fn run_dashboard(config: &AppConfig) -> Result<(), LifecycleError> {
    let state_repo = StateRepository::new(config.state_file.clone());
    let repo = GameRepository::new(config);
    let mut controller = GameLifecycleController::from_persisted(&state_repo.load());
    let mut gates: HashMap<GameMode, ManualResultGate> = GameMode::all()
        .into_iter()
        .map(|mode| (mode, ManualResultGate::new(mode)))
        .collect();

    let feed = match RealtimeFeed::connect(&config.ws_url).await {
        Ok(feed) => Some(feed),
        Err(err) => {
            eprintln!("WebSocket bağlantısı kurulamadı: {}", err);
            None
        }
    };
    let mut feed_cursor = 0usize;

    // Açılışta son oyun sonuçları bir kez çekilir
    match repo.fetch_last_results().await {
        Ok(results) => {
            let now = Utc::now();
            if let Some(bw) = results.black_white {
                controller.record_completed(GameMode::BlackWhite, &bw.results, now);
            }
            if let Some(tc) = results.ten_colors {
                controller.record_completed(GameMode::TenColors, &tc.results, now);
            }
            state_repo.save(&controller.persisted());
        }
        Err(err) => eprintln!("Error: {}", err),
    }

    let (poll_tx, mut poll_rx) = mpsc::unbounded_channel::<PollResult>();
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Utc::now();
                spawn_poll(controller.next_poll_seq(), repo.clone(), config.retry_delay, poll_tx.clone());

                let outcome = controller.tick(now);
                for event in &outcome.completed {
                    println!(
                        "Tur bitti: {} -> {}",
                        event.mode.title(),
                        event.results.clone().unwrap_or_default()
                    );
                }
                if outcome.refresh_now {
                    spawn_poll(controller.next_poll_seq(), repo.clone(), config.retry_delay, poll_tx.clone());
                }
                if outcome.dirty {
                    state_repo.save(&controller.persisted());
                }

                if let Some(feed) = &feed {
                    for value in feed.messages_since(feed_cursor) {
                        feed_cursor += 1;
                        if let Ok(msg) = serde_json::from_value::<FeedMessage>(value) {
                            match msg {
                                FeedMessage::GameState { game } | FeedMessage::GameEnded { game } => {
                                    controller.patch_game(game, now);
                                }
                                _ => {}
                            }
                        }
                    }
                }

                render(&controller, &mut gates, feed.as_ref(), now);
            }
            Some(result) = poll_rx.recv() => {
                match result.games {
                    Ok(games) => {
                        let now = Utc::now();
                        if controller.apply_poll(result.seq, games, now) {
                            if let Some(details) = result.details {
                                controller.apply_details(details, now);
                            }
                        }
                    }
                    Err(err) => {
                        if let Some(feed) = &feed {
                            feed.close();
                        }
                        state_repo.save(&controller.persisted());
                        return Err(err);
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        let now = Utc::now();
                        if handle_command(&line, &controller, &mut gates, &repo, feed.as_ref(), now).await {
                            if let Some(feed) = &feed {
                                feed.close();
                            }
                            state_repo.save(&controller.persisted());
                            return Ok(());
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(err) => {
                        eprintln!("komut okunamadı: {}", err);
                        stdin_open = false;
                    }
                }
            }
        }
    }
}

fn spawn_poll(
    seq: u64,
    repo: GameRepository,
    retry_delay: Duration,
    tx: mpsc::UnboundedSender<PollResult>,
) {
    tokio::spawn(async move {
        let games = poll_ongoing(repo.clone(), retry_delay).await;
        // Admin detayları en iyi çaba; hatası anketi düşürmez
        let details = match &games {
            Ok(_) => repo.fetch_all_game_details().await.ok(),
            Err(_) => None,
        };
        let _ = tx.send(PollResult { seq, games, details });
    });
}

// true dönerse panel kapatılır
async fn handle_command(
    line: &str,
    controller: &GameLifecycleController,
    gates: &mut HashMap<GameMode, ManualResultGate>,
    repo: &GameRepository,
    feed: Option<&RealtimeFeed>,
    now: chrono::DateTime<Utc>,
) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["quit"] | ["exit"] => return true,
        ["toggle", mode] => {
            if let Some(mode) = GameMode::parse(mode) {
                let remaining = controller.remaining_secs(mode, now);
                let gate = gates.get_mut(&mode).expect("gate her mod için kurulu");
                match gate.toggle(remaining) {
                    Ok(ResultMode::Manual) => println!("{}: manuel sonuç modu", mode.title()),
                    Ok(ResultMode::Automatic) => println!("{}: otomatik sonuç modu", mode.title()),
                    Err(err) => println!("{}", err),
                }
            } else {
                println!("bilinmeyen mod: {}", mode);
            }
        }
        ["stage", mode, option] => {
            if let Some(mode) = GameMode::parse(mode) {
                let remaining = controller.remaining_secs(mode, now);
                let gate = gates.get_mut(&mode).expect("gate her mod için kurulu");
                match gate.stage(option, remaining) {
                    Ok(()) => println!("seçildi: {}", option),
                    Err(err) => println!("{}", err),
                }
            } else {
                println!("bilinmeyen mod: {}", mode);
            }
        }
        ["submit", mode] => {
            if let Some(mode) = GameMode::parse(mode) {
                match controller.current_game(mode) {
                    Some(game) => {
                        let game_id = game.id.clone();
                        let remaining = controller.remaining_secs(mode, now);
                        let gate = gates.get_mut(&mode).expect("gate her mod için kurulu");
                        match gate.submit(repo, &game_id, remaining).await {
                            SubmitOutcome::Success(msg) => println!("{}", msg),
                            SubmitOutcome::Error(msg) => println!("{}", msg),
                        }
                    }
                    None => println!("{} için devam eden oyun yok", mode.title()),
                }
            } else {
                println!("bilinmeyen mod: {}", mode);
            }
        }
        ["bet", mode, option, amount] => {
            match (GameMode::parse(mode), amount.parse::<f64>()) {
                (Some(mode), Ok(amount)) => match (controller.current_game(mode), feed) {
                    (Some(game), Some(feed)) => {
                        feed.send(FeedMessage::Bet {
                            game_id: game.id.clone(),
                            amount,
                            color: option.to_string(),
                            game_mode: mode,
                        });
                    }
                    (None, _) => println!("{} için devam eden oyun yok", mode.title()),
                    (_, None) => println!("WebSocket bağlantısı yok"),
                },
                _ => println!("kullanım: bet <mode> <option> <amount>"),
            }
        }
        ["setresult", mode, value] => {
            if let Some(mode) = GameMode::parse(mode) {
                match (controller.current_game(mode), feed) {
                    (Some(game), Some(feed)) => {
                        feed.send(FeedMessage::SetManualResult {
                            game_id: game.id.clone(),
                            manual_result: value.to_string(),
                        });
                    }
                    (None, _) => println!("{} için devam eden oyun yok", mode.title()),
                    (_, None) => println!("WebSocket bağlantısı yok"),
                }
            } else {
                println!("bilinmeyen mod: {}", mode);
            }
        }
        [] => {}
        _ => {
            println!("komutlar: toggle <mode> | stage <mode> <option> | submit <mode> | bet <mode> <option> <amount> | setresult <mode> <value> | quit");
        }
    }
    false
}

fn render(
    controller: &GameLifecycleController,
    gates: &mut HashMap<GameMode, ManualResultGate>,
    feed: Option<&RealtimeFeed>,
    now: chrono::DateTime<Utc>,
) {
    println!("──────────────────────────────────────────────");
    if let Some(feed) = feed {
        if let Some(err) = feed.parse_error() {
            println!("WebSocket: {}", err);
        }
    }

    for mode in GameMode::all() {
        let games = controller.games_for_mode(mode);
        let all_over = games.is_empty() || games.iter().all(|g| g.countdown_secs == 0);

        println!("{} Games", mode.title());
        if all_over {
            println!("  New {} game starts soon...", mode.title());
            if let Some(secs) = controller.next_round_countdown(mode, now) {
                println!("  Starting in: {} seconds", secs);
            }
            if let Some(result) = controller.revealed_result(mode) {
                println!("  Game Results: {}", result.results);
            }
        } else {
            for game in games.iter().filter(|g| g.countdown_secs > 0) {
                println!(
                    "  Game ID: {}  Countdown: {}",
                    game.game_id,
                    format_countdown(game.countdown_secs)
                );
                for row in tally_service::tally_rows(game) {
                    println!(
                        "    {:<8} users={:<4} bets={:<10.2} final={:.2}",
                        row.option, row.total_users, row.total_bet_amount, row.total_final_amount
                    );
                }
                println!("  Note: {}", mode.payout_note());
            }
        }

        if let Some(gate) = gates.get_mut(&mode) {
            let remaining = controller.remaining_secs(mode, now);
            let window = if ManualResultGate::window_open(remaining) {
                "açık"
            } else {
                "kapalı"
            };
            let result_mode = match gate.result_mode() {
                ResultMode::Automatic => "Automatic",
                ResultMode::Manual => "Manual",
            };
            println!(
                "  sonuç modu: {}  pencere: {}  seçim: {}",
                result_mode,
                window,
                gate.staged().unwrap_or("-")
            );
            if let Some(outcome) = gate.last_outcome() {
                match outcome {
                    SubmitOutcome::Success(msg) => println!("  son gönderim: OK - {}", msg),
                    SubmitOutcome::Error(msg) => println!("  son gönderim: HATA - {}", msg),
                }
            }
            for toast in gate.drain_toasts() {
                println!("  [toast] {}", toast);
            }
        }
    }
}
