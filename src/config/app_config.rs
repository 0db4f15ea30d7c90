// src/config/app_config.rs
use clap::{Arg, Command};
use std::path::PathBuf;
use std::time::Duration;

// Panelin oturum bilgileri; global state yerine her bileşene açıkça verilir
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub ws_url: String,
    pub token: String,
    pub state_file: PathBuf,
    pub retry_delay: Duration,
}

impl AppConfig {
    pub fn from_args() -> Self {
        let matches = Command::new("admin-dashboard")
            .about("Black & White / Ten Colors operatör paneli")
            .arg(
                Arg::new("base-url")
                    .long("base-url")
                    .default_value("http://localhost:5000"),
            )
            .arg(
                Arg::new("ws-url")
                    .long("ws-url")
                    .default_value("ws://localhost:5000"),
            )
            .arg(Arg::new("token").long("token"))
            .arg(
                Arg::new("state-file")
                    .long("state-file")
                    .default_value("dashboard_state.json"),
            )
            .get_matches();

        AppConfig {
            base_url: matches
                .get_one::<String>("base-url")
                .cloned()
                .unwrap_or_default(),
            ws_url: matches
                .get_one::<String>("ws-url")
                .cloned()
                .unwrap_or_default(),
            token: matches
                .get_one::<String>("token")
                .cloned()
                .or_else(|| std::env::var("USER_TOKEN").ok())
                .unwrap_or_default(),
            state_file: PathBuf::from(
                matches
                    .get_one::<String>("state-file")
                    .cloned()
                    .unwrap_or_default(),
            ),
            retry_delay: Duration::from_secs(2),
        }
    }
}
