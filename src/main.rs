//! Text shell for the match core: reads a snapshot (file or cache), renders
//! card and server-button view-models as plain lines, and can drive playback
//! against a console player. The real page uses the same core behind a DOM
//! shell; this binary is the reference glue.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use matchday_lib::cache::CachedSnapshot;
use matchday_lib::config::AppConfig;
use matchday_lib::errors::MatchdayError;
use matchday_lib::ingest::{self, IngestEvent};
use matchday_lib::model::{ClearKey, Snapshot};
use matchday_lib::playback::{PlaybackController, PlayerSlot};
use matchday_lib::render::{player_panel, MatchListRenderer};
use matchday_lib::schedule::{run_tick, CountdownScheduler};
use matchday_lib::selector::{SelectOutcome, StreamSelector};
use matchday_lib::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "matchday", about = "Live match list and playback shell")]
struct Args {
    /// JSON snapshot file with the `{category: [match, ...]}` shape.
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Category to render; defaults to the configured one.
    #[arg(short, long)]
    category: Option<String>,

    /// Cache key for the startup snapshot.
    #[arg(long, default_value = "last-snapshot")]
    cache_key: String,

    /// Select the Nth rendered card and start playback.
    #[arg(long)]
    select: Option<usize>,

    /// Stream server to play for the selected match.
    #[arg(long, default_value_t = 0)]
    server: usize,

    /// Run this many one-second countdown ticks before exiting.
    #[arg(long, default_value_t = 0)]
    ticks: u32,
}

/// Player slot that narrates SDK calls instead of rendering video.
#[derive(Default)]
struct ConsolePlayer;

impl PlayerSlot for ConsolePlayer {
    fn configure_drm(&mut self, key: Option<&ClearKey>) {
        match key {
            Some(k) => println!("[player] clearkey configured ({})", k.key_id),
            None => println!("[player] clearkey cleared"),
        }
    }

    fn load(&mut self, url: &str) -> Result<(), String> {
        println!("[player] load {}", url);
        Ok(())
    }

    fn play(&mut self) {
        println!("[player] play");
    }

    fn embed(&mut self, url: &str) {
        println!("[player] embed {}", url);
    }

    fn teardown(&mut self) {
        println!("[player] teardown");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load().unwrap_or_default();
    let category = args.category.clone().unwrap_or_else(|| config.default_category.clone());

    let state = Arc::new(Mutex::new(AppState::new(category.clone())));

    // Cached snapshot first so something renders immediately.
    if config.cache_enabled {
        if let Some(cached) = CachedSnapshot::load(&args.cache_key) {
            if cached.is_stale(config.auto_refresh_hours) {
                println!("(cached snapshot is stale)");
            }
            let mut state = state.lock().expect("state lock");
            ingest::apply(&mut state, IngestEvent::Ready(cached.snapshot), Utc::now());
            state.source_status = Some("Cached".to_string());
        }
    }

    // Fresh snapshot from the file, replacing whatever the cache showed.
    if let Some(path) = &args.snapshot {
        let event = match std::fs::read_to_string(path)
            .context("reading snapshot file")
            .and_then(|raw| serde_json::from_str::<Snapshot>(&raw).context("parsing snapshot"))
        {
            Ok(snapshot) => {
                if config.cache_enabled {
                    if let Err(e) = CachedSnapshot::new(&args.cache_key, snapshot.clone()).save() {
                        eprintln!("{}", MatchdayError::Cache(e.to_string()).status_line());
                    }
                }
                IngestEvent::Ready(snapshot)
            }
            Err(e) => IngestEvent::Failed(e.to_string()),
        };
        let mut state = state.lock().expect("state lock");
        ingest::apply(&mut state, event, Utc::now());
    }

    let renderer = MatchListRenderer::new(config.accessible_labels);
    let view = {
        let state = state.lock().expect("state lock");
        if let Some(status) = &state.source_status {
            println!("status: {}", status);
        }
        renderer.render(&category, state.store.category(&category), Utc::now())
    };

    println!("== {} ==", view.category);
    if let Some(placeholder) = &view.placeholder {
        println!("  {}", placeholder);
    }
    for (pos, card) in view.cards.iter().enumerate() {
        println!(
            "  [{}] {} | {} vs {} | {} {}",
            pos,
            card.title,
            card.home.name,
            card.away.name,
            card.badge.state.tag(),
            card.badge.text
        );
    }

    if let Some(pos) = args.select {
        let card = view.cards.get(pos).context("no card at that position")?;
        let mut player = ConsolePlayer;
        let mut selector = StreamSelector::new();
        let mut controller = PlaybackController::new(config.playback_options());

        let mut state = state.lock().expect("state lock");
        let key = card.key.clone();
        state.selection.select_match(key.clone());
        let m = state.store.get(&key).context("selected match vanished")?;

        // An empty server row degrades into the panel's unavailable message.
        let _ = selector.for_match(m);
        let panel = player_panel(m, &selector);
        println!("now playing: {}", panel.title);
        if let Some(message) = &panel.unavailable {
            println!("player: {}", message);
        } else {
            for button in &panel.buttons {
                println!("  server [{}] {}", button.index, button.label);
            }
            if let SelectOutcome::Switch(stream) = selector
                .select(args.server)
                .map_err(|e| anyhow::anyhow!(e.status_line()))?
            {
                controller.play_stream(&mut player, &stream)?;
            }
            // Nothing feeds us SDK error events here, but a pending retry
            // would fire from this same cooperative loop.
            controller.poll_retry(&mut player, Instant::now());
        }
    }

    if args.ticks > 0 {
        let mut scheduler = CountdownScheduler::new();
        scheduler.start(Arc::clone(&state));
        tokio::time::sleep(std::time::Duration::from_secs(args.ticks as u64)).await;
        scheduler.stop();

        let mut state = state.lock().expect("state lock");
        let now = Utc::now();
        run_tick(&mut state, now);
        println!("-- after {} ticks --", args.ticks);
        for slot in &state.badges {
            if slot.key.category == category {
                println!("  [{}] {} {}", slot.key.index, slot.state.tag(), slot.text);
            }
        }
    }

    Ok(())
}
