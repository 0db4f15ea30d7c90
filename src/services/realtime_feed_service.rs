// src/services/realtime_feed_service.rs
use crate::models::messages::FeedMessage;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

enum Outbound {
    Frame(FeedMessage),
    Close,
}

// Tek bağlantı; kopma sonrası yeniden bağlanma yok
pub struct RealtimeFeed {
    outgoing: mpsc::UnboundedSender<Outbound>,
    log: Arc<Mutex<Vec<serde_json::Value>>>,
    parse_error: Arc<Mutex<Option<String>>>,
    open: Arc<AtomicBool>,
}

impl RealtimeFeed {
    pub async fn connect(url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let (ws_stream, _) = connect_async(url).await?;
        println!("WebSocket bağlantısı kuruldu: {}", url);

        let (mut write, mut read) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();

        let log = Arc::new(Mutex::new(Vec::new()));
        let parse_error = Arc::new(Mutex::new(None));
        let open = Arc::new(AtomicBool::new(true));

        let writer_open = open.clone();
        tokio::spawn(async move {
            while let Some(outbound) = rx.recv().await {
                match outbound {
                    Outbound::Frame(msg) => {
                        if !writer_open.load(Ordering::SeqCst) {
                            continue;
                        }
                        let raw = match serde_json::to_string(&msg) {
                            Ok(raw) => raw,
                            Err(err) => {
                                eprintln!("mesaj serileştirilemedi: {}", err);
                                continue;
                            }
                        };
                        if write.send(Message::Text(raw)).await.is_err() {
                            writer_open.store(false, Ordering::SeqCst);
                            break;
                        }
                    }
                    Outbound::Close => {
                        let _ = write.send(Message::Close(None)).await;
                        writer_open.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
        });

        let reader_log = log.clone();
        let reader_error = parse_error.clone();
        let reader_open = open.clone();
        tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Close(_)) => break,
                    Ok(msg) => {
                        if let Ok(text) = msg.into_text() {
                            match serde_json::from_str::<serde_json::Value>(&text) {
                                // Gelen her geçerli mesaj sırayla günlüğe eklenir
                                Ok(value) => reader_log.lock().unwrap().push(value),
                                Err(_) => {
                                    // Bozuk mesaj akışı durdurmaz
                                    *reader_error.lock().unwrap() =
                                        Some("Failed to parse message".to_string());
                                }
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("WebSocket okuma hatası: {:?}", err);
                        break;
                    }
                }
            }
            println!("WebSocket bağlantısı kapandı");
            reader_open.store(false, Ordering::SeqCst);
        });

        Ok(RealtimeFeed {
            outgoing: tx,
            log,
            parse_error,
            open,
        })
    }

    // Bağlantı açık değilse sessizce yutulur
    pub fn send(&self, msg: FeedMessage) {
        if !self.is_open() {
            return;
        }
        let _ = self.outgoing.send(Outbound::Frame(msg));
    }

    pub fn messages(&self) -> Vec<serde_json::Value> {
        self.log.lock().unwrap().clone()
    }

    pub fn messages_since(&self, cursor: usize) -> Vec<serde_json::Value> {
        let log = self.log.lock().unwrap();
        log.iter().skip(cursor).cloned().collect()
    }

    pub fn message_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn parse_error(&self) -> Option<String> {
        self.parse_error.lock().unwrap().clone()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        let _ = self.outgoing.send(Outbound::Close);
    }
}

impl Drop for RealtimeFeed {
    fn drop(&mut self) {
        self.close();
    }
}
