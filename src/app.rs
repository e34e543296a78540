use crate::api::{ApiError, BackendClient, DetectedLocation, Session, Weather};
use crate::chat::Transcript;
use crate::clock::ClockReading;
use crate::countries::CountryTable;
use crate::greeting::initial_greeting;
use crate::playback::{PlaybackError, PlaybackStatus};
use crate::setup::{SetupField, SetupForm};
use crate::speedtest::{
    SpeedEstimator, SpeedMeasurement, SpeedProgress, SpeedTestError, TestPhase,
};
use crate::store::LocalStore;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Setup,
    Dashboard,
    ConfirmClear,
}

#[derive(Debug, Clone)]
pub struct SpeedPanel {
    pub phase: TestPhase,
    pub result: Option<SpeedMeasurement>,
    pub download_progress: f64,
}

impl SpeedPanel {
    fn new() -> Self {
        Self {
            phase: TestPhase::Idle,
            result: None,
            download_progress: 0.0,
        }
    }
}

pub struct App {
    pub view: AppView,
    pub should_quit: bool,

    // Location and conditions
    pub countries: CountryTable,
    pub setup: SetupForm,
    pub city: Option<String>,
    pub country: Option<String>,
    pub hour: Option<u32>,
    pub weather: Option<Weather>,
    pub initializing: bool,

    pub clock: ClockReading,
    pub theme: Theme,
    pub transcript: Transcript,
    pub input: String,
    pub speed: SpeedPanel,
    pub playback: PlaybackStatus,

    /// Blocking message; Enter, Esc or Space dismisses it.
    pub notice: Option<String>,

    store: LocalStore,
}

impl App {
    pub fn new(store: LocalStore, countries: CountryTable, current_hour: u32) -> Self {
        let setup = SetupForm::new(store.city(), store.country(), &countries);
        let theme = Theme::initial(store.dark_mode(), current_hour);

        Self {
            view: AppView::Setup,
            should_quit: false,
            countries,
            setup,
            city: None,
            country: None,
            hour: None,
            weather: None,
            initializing: false,
            clock: ClockReading::now(),
            theme,
            transcript: Transcript::default(),
            input: String::new(),
            speed: SpeedPanel::new(),
            playback: PlaybackStatus::default(),
            notice: None,
            store,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return Some(AppAction::Quit);
        }

        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notice = None;
            }
            return None;
        }

        match self.view {
            AppView::Setup => self.handle_setup_key(key),
            AppView::Dashboard => self.handle_dashboard_key(key),
            AppView::ConfirmClear => self.handle_confirm_key(key),
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.setup.focus = self.setup.focus.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.setup.focus = self.setup.focus.prev();
                None
            }
            KeyCode::Right if self.setup.focus == SetupField::Country => {
                self.setup.next_country(&self.countries);
                None
            }
            KeyCode::Left if self.setup.focus == SetupField::Country => {
                self.setup.prev_country(&self.countries);
                None
            }
            KeyCode::Backspace => {
                self.setup.backspace();
                None
            }
            KeyCode::Char(c) => {
                self.setup.push_char(c);
                None
            }
            KeyCode::Enter => self.submit_setup(),
            KeyCode::Esc => {
                // Only leave the form if a location is already active.
                if self.city.is_some() {
                    self.view = AppView::Dashboard;
                }
                None
            }
            _ => None,
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => {
                    if self.speed.phase.is_running() {
                        None
                    } else {
                        Some(AppAction::StartSpeedTest)
                    }
                }
                KeyCode::Char('t') => {
                    self.toggle_theme();
                    None
                }
                KeyCode::Char('l') => {
                    self.view = AppView::ConfirmClear;
                    None
                }
                KeyCode::Char('e') => {
                    self.setup.focus = SetupField::City;
                    self.view = AppView::Setup;
                    None
                }
                KeyCode::Char('p') => Some(AppAction::ConnectPlayback),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter => {
                let message = self.transcript.submit(&self.input)?;
                self.input.clear();
                Some(AppAction::SendChat(message))
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Esc => {
                self.input.clear();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.clear_chat();
                self.view = AppView::Dashboard;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.view = AppView::Dashboard;
            }
            _ => {}
        }
        None
    }

    fn submit_setup(&mut self) -> Option<AppAction> {
        let (city, country) = self.setup.submit(&self.countries)?;

        if let Err(e) = self.store.set_location(&city, &country) {
            tracing::warn!("Could not persist location: {}", e);
        }

        self.view = AppView::Dashboard;
        self.initializing = true;
        Some(AppAction::Initialize { city, country })
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.set_dark_mode(self.theme.is_dark()) {
            tracing::warn!("Could not persist theme: {}", e);
        }
    }

    /// Empties the transcript and replays the greeting if conditions are known.
    pub fn clear_chat(&mut self) {
        self.transcript.clear();
        if let (Some(city), Some(weather), Some(hour)) = (&self.city, &self.weather, self.hour) {
            self.transcript
                .push_greeting(initial_greeting(city, weather, hour));
        }
    }

    pub fn tick(&mut self) {
        self.clock = ClockReading::now();
    }

    /// Marks a speed test as started. Returns false if one is already running.
    pub fn begin_speed_test(&mut self) -> bool {
        if self.speed.phase.is_running() {
            return false;
        }
        self.speed = SpeedPanel::new();
        self.speed.phase = TestPhase::Download;
        true
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Option<AppAction> {
        match event {
            AppEvent::LocationDetected(location) => {
                self.setup.apply_detected(&location, &self.countries);
                None
            }
            AppEvent::Initialized(result) => self.finish_init(result),
            AppEvent::ChatReply(Ok(reply)) => {
                self.transcript.receive(reply);
                None
            }
            AppEvent::ChatReply(Err(e)) => {
                tracing::error!("Chat request failed: {}", e);
                self.transcript.receive_error();
                None
            }
            AppEvent::Speed(SpeedProgress::Download(progress)) => {
                self.speed.download_progress = progress.ratio();
                None
            }
            AppEvent::Speed(SpeedProgress::Pinging) => {
                self.speed.download_progress = 1.0;
                self.speed.phase = TestPhase::Ping;
                None
            }
            AppEvent::SpeedFinished(Ok(measurement)) => {
                self.speed.phase = TestPhase::Complete;
                self.speed.result = Some(measurement);
                None
            }
            AppEvent::SpeedFinished(Err(e)) => {
                tracing::error!("Speed test failed: {}", e);
                self.speed.phase = TestPhase::Failed;
                self.speed.result = None;
                None
            }
            AppEvent::AutoSpeedTest => {
                if self.speed.phase.is_running() {
                    None
                } else {
                    Some(AppAction::StartSpeedTest)
                }
            }
            AppEvent::Playback(status) => {
                self.playback = status;
                None
            }
        }
    }

    fn finish_init(&mut self, result: Result<Session, ApiError>) -> Option<AppAction> {
        self.initializing = false;

        match result {
            Ok(session) => {
                tracing::info!(city = %session.city, hour = session.hour, "Session initialized");
                self.transcript
                    .push_greeting(initial_greeting(&session.city, &session.weather, session.hour));
                self.city = Some(session.city);
                self.country = Some(session.country);
                self.hour = Some(session.hour);
                self.weather = Some(session.weather);
                Some(AppAction::ScheduleSpeedTest)
            }
            Err(e) => {
                tracing::error!("Init failed: {}", e);
                self.notice = Some(e.user_message().to_string());
                self.view = AppView::Setup;
                None
            }
        }
    }

    /// Applies the outcome of a playback connect attempt.
    pub fn finish_playback_connect(&mut self, result: Result<(), PlaybackError>) {
        match result {
            Ok(()) => tracing::info!("Playback connected"),
            Err(PlaybackError::NotConfigured) => self.playback = PlaybackStatus::NotConfigured,
            Err(e) => {
                tracing::warn!("{}", e);
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn location_label(&self) -> Option<String> {
        match (&self.city, &self.country) {
            (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Initialize { city: String, country: String },
    SendChat(String),
    StartSpeedTest,
    ScheduleSpeedTest,
    ConnectPlayback,
}

#[derive(Debug)]
pub enum AppEvent {
    LocationDetected(DetectedLocation),
    Initialized(Result<Session, ApiError>),
    ChatReply(Result<String, ApiError>),
    Speed(SpeedProgress),
    SpeedFinished(Result<SpeedMeasurement, SpeedTestError>),
    AutoSpeedTest,
    Playback(PlaybackStatus),
}

pub async fn run_speed_test(update_tx: mpsc::Sender<AppEvent>, estimator: Arc<SpeedEstimator>) {
    let (progress_tx, mut progress_rx) = mpsc::channel::<SpeedProgress>(32);
    let forward_tx = update_tx.clone();
    let forward = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            let _ = forward_tx.send(AppEvent::Speed(progress)).await;
        }
    });

    let result = estimator.measure(progress_tx).await;
    let _ = forward.await;
    let _ = update_tx.send(AppEvent::SpeedFinished(result)).await;
}

pub async fn run_detect_location(update_tx: mpsc::Sender<AppEvent>, backend: BackendClient) {
    match backend.detect_location().await {
        Ok(location) => {
            let _ = update_tx.send(AppEvent::LocationDetected(location)).await;
        }
        Err(e) => tracing::warn!("Location detection failed: {}", e),
    }
}

pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
