mod api;
mod app;
mod chat;
mod clock;
mod countries;
mod greeting;
mod playback;
mod settings;
mod setup;
mod speedtest;
mod store;
mod theme;
mod ui;
mod weather;

use anyhow::{Context, Result};
use api::BackendClient;
use app::{poll_event, run_detect_location, run_speed_test, App, AppAction, AppEvent};
use chrono::Timelike;
use countries::CountryTable;
use crossterm::event::Event;
use playback::{Playback, PlaybackStatus, Unconfigured};
use ratatui::DefaultTerminal;
use settings::Settings;
use speedtest::SpeedEstimator;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use store::LocalStore;
use tokio::sync::mpsc;
use ui::draw_ui;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let settings = Settings::load()?;
    tracing::info!(server = %settings.server_url, "deskmate starting");

    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = run_app(&mut terminal, settings).await;

    ratatui::restore();
    if let Err(e) = &result {
        tracing::error!("Exited with error: {:#}", e);
    }
    result
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging() -> Result<()> {
    let dir = settings::data_dir();
    std::fs::create_dir_all(&dir).context("Failed to create data directory")?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("deskmate.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

/// Shared handles the action dispatcher needs.
struct Services {
    settings: Settings,
    backend: BackendClient,
    estimator: Arc<SpeedEstimator>,
    playback: Box<dyn Playback>,
    event_tx: mpsc::Sender<AppEvent>,
}

async fn run_app(terminal: &mut DefaultTerminal, settings: Settings) -> Result<()> {
    let backend = BackendClient::new(&settings.server_url)?;
    let estimator = Arc::new(SpeedEstimator::new(
        settings.speed_test.clone(),
        backend.clone(),
    )?);
    let store = LocalStore::open(settings::data_dir().join("store.json"));
    let mut app = App::new(store, CountryTable::load(), chrono::Local::now().hour());

    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(64);
    let mut services = Services {
        settings,
        backend,
        estimator,
        playback: Box::new(Unconfigured),
        event_tx,
    };
    register_playback_handlers(&mut services);

    tokio::spawn(run_detect_location(
        services.event_tx.clone(),
        services.backend.clone(),
    ));

    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| draw_ui(frame, &app))?;

        // Handle background results
        while let Ok(event) = event_rx.try_recv() {
            if let Some(action) = app.handle_event(event) {
                dispatch(&mut app, &mut services, action);
            }
        }

        if last_tick.elapsed() >= Duration::from_secs(1) {
            app.tick();
            last_tick = Instant::now();
        }

        // Handle input
        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(30))? {
            if let Some(action) = app.handle_key_event(key) {
                dispatch(&mut app, &mut services, action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn dispatch(app: &mut App, services: &mut Services, action: AppAction) {
    match action {
        AppAction::Quit => app.should_quit = true,
        AppAction::Initialize { city, country } => {
            let backend = services.backend.clone();
            let tx = services.event_tx.clone();
            tokio::spawn(async move {
                let result = backend.init(&city, &country).await;
                let _ = tx.send(AppEvent::Initialized(result)).await;
            });
        }
        AppAction::SendChat(message) => {
            let backend = services.backend.clone();
            let tx = services.event_tx.clone();
            tokio::spawn(async move {
                let result = backend.chat(&message).await;
                let _ = tx.send(AppEvent::ChatReply(result)).await;
            });
        }
        AppAction::StartSpeedTest => {
            if app.begin_speed_test() {
                tokio::spawn(run_speed_test(
                    services.event_tx.clone(),
                    services.estimator.clone(),
                ));
            }
        }
        AppAction::ScheduleSpeedTest => {
            let delay = services.settings.auto_start_delay();
            let tx = services.event_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(AppEvent::AutoSpeedTest).await;
            });
        }
        AppAction::ConnectPlayback => {
            let result = services.playback.connect();
            app.finish_playback_connect(result);
        }
    }
}

fn register_playback_handlers(services: &mut Services) {
    let tx = services.event_tx.clone();
    services.playback.on_ready(Box::new(move |device_id| {
        let _ = tx.try_send(AppEvent::Playback(PlaybackStatus::Ready {
            device_id: device_id.to_string(),
        }));
    }));

    let tx = services.event_tx.clone();
    services.playback.on_state_change(Box::new(move |state| {
        let _ = tx.try_send(AppEvent::Playback(PlaybackStatus::Playing(state.clone())));
    }));
}
