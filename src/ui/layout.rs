use crate::app::{App, AppView};
use crate::chat::{Entry, Sender};
use crate::setup::SetupField;
use crate::speedtest::TestPhase;
use crate::theme::Palette;
use crate::weather::WeatherView;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = app.theme.palette();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    draw_dashboard(frame, area, app, &palette);

    match app.view {
        AppView::Setup => draw_setup_modal(frame, area, app, &palette),
        AppView::ConfirmClear => draw_confirm_modal(frame, area, &palette),
        AppView::Dashboard => {}
    }

    if let Some(notice) = &app.notice {
        draw_notice(frame, area, notice, &palette);
    }
}

fn draw_dashboard(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(12),
        Constraint::Length(1),
    ])
    .split(area);

    draw_header(frame, chunks[0], app, palette);

    let columns = Layout::horizontal([Constraint::Ratio(2, 5), Constraint::Ratio(3, 5)])
        .split(chunks[1]);

    let left = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Min(9),
        Constraint::Length(3),
    ])
    .split(columns[0]);

    draw_clock_panel(frame, left[0], app, palette);
    draw_weather_panel(frame, left[1], app, palette);
    draw_speed_panel(frame, left[2], app, palette);
    draw_playback_panel(frame, left[3], app, palette);

    let right = Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).split(columns[1]);

    draw_transcript(frame, right[0], app, palette);
    draw_input(frame, right[1], app, palette);

    draw_help(frame, chunks[2], app, palette);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::horizontal([
        Constraint::Length(12),
        Constraint::Min(10),
        Constraint::Length(12),
    ])
    .split(inner);

    frame.render_widget(
        Paragraph::new("deskmate").style(
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        chunks[0],
    );

    let (location, color) = match app.location_label() {
        Some(label) => (format!("📍 {}", label), palette.text_secondary),
        None if app.initializing => ("Connecting...".to_string(), palette.warn),
        None => ("No location set".to_string(), palette.text_muted),
    };
    frame.render_widget(
        Paragraph::new(location)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        chunks[1],
    );

    let icon = if app.theme.is_dark() { "🌙" } else { "☀️" };
    frame.render_widget(
        Paragraph::new(format!("{} {}", icon, app.clock.time))
            .style(Style::default().fg(palette.text_secondary))
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn panel<'a>(title: &'a str, palette: &Palette, active: bool) -> Block<'a> {
    let border = if active {
        palette.border_active
    } else {
        palette.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(palette.text_secondary),
        ))
}

fn draw_clock_panel(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = panel("Time", palette, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                app.clock.time.clone(),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", app.clock.period),
                Style::default().fg(palette.text_secondary),
            ),
        ]),
        Line::styled(app.clock.date.clone(), Style::default().fg(palette.text_secondary)),
        Line::styled(app.clock.timezone.clone(), Style::default().fg(palette.text_muted)),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn draw_weather_panel(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = panel("Weather", palette, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(weather) = &app.weather else {
        frame.render_widget(
            Paragraph::new("—")
                .style(Style::default().fg(palette.text_muted))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let view = WeatherView::new(weather);
    let muted = Style::default().fg(palette.text_muted);
    let value = Style::default().fg(palette.text_secondary);

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", view.icon)),
            Span::styled(
                view.temperature,
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::styled(view.description, value),
        Line::from(vec![
            Span::styled("humidity ", muted),
            Span::styled(view.humidity, value),
            Span::styled("  ·  wind ", muted),
            Span::styled(view.wind, value),
        ]),
        Line::from(vec![
            Span::styled("feels like ", muted),
            Span::styled(view.feels_like, value),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn draw_speed_panel(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let running = app.speed.phase.is_running();
    let block = panel("Connection", palette, running);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let result = app.speed.result.as_ref();

    let headline = result.map_or_else(|| "--".to_string(), |r| format_speed(r.download_mbps));
    frame.render_widget(
        Paragraph::new(headline)
            .style(
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        chunks[0],
    );

    let progress = match app.speed.phase {
        TestPhase::Download => app.speed.download_progress,
        TestPhase::Ping | TestPhase::Complete => 1.0,
        TestPhase::Idle | TestPhase::Failed => 0.0,
    };
    draw_progress_bar(frame, chunks[1], progress, palette);

    let muted = Style::default().fg(palette.text_muted);
    let value = Style::default().fg(palette.text_secondary);
    let rows = vec![
        Line::from(vec![
            Span::styled("download ", muted),
            Span::styled(
                result.map_or_else(|| "-- Mbps".to_string(), |r| format!("{:.1} Mbps", r.download_mbps)),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("upload   ", muted),
            Span::styled(
                result.map_or_else(|| "-- Mbps".to_string(), |r| format!("{:.1} Mbps", r.upload_mbps)),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("ping     ", muted),
            Span::styled(
                result.map_or_else(|| "-- ms".to_string(), |r| format!("{} ms", r.ping_ms)),
                value,
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(rows).alignment(Alignment::Center), chunks[2]);

    let (status, color) = match (app.speed.phase, result) {
        (TestPhase::Complete, Some(r)) => (r.quality.display().to_string(), r.quality.color()),
        (TestPhase::Failed, _) => ("❌ Test failed".to_string(), palette.warn),
        (phase, _) if phase.is_running() => {
            ("Testing your connection...".to_string(), palette.info)
        }
        _ => (String::new(), palette.text_muted),
    };
    frame.render_widget(
        Paragraph::new(status)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        chunks[3],
    );

    let button = match app.speed.phase {
        TestPhase::Download | TestPhase::Ping => "[ Testing... ]",
        TestPhase::Idle => "[ ctrl-s test speed ]",
        TestPhase::Complete | TestPhase::Failed => "[ ctrl-s test again ]",
    };
    let button_style = if running {
        Style::default().fg(palette.text_muted)
    } else {
        Style::default().fg(palette.accent)
    };
    frame.render_widget(
        Paragraph::new(button)
            .style(button_style)
            .alignment(Alignment::Center),
        chunks[4],
    );
}

fn draw_progress_bar(frame: &mut Frame, area: Rect, ratio: f64, palette: &Palette) {
    if area.width < 4 {
        return;
    }

    let width = (area.width - 2) as usize;
    let filled = ((ratio * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    let bar = Line::from(vec![
        Span::raw(" "),
        Span::styled("━".repeat(filled), Style::default().fg(palette.progress)),
        Span::styled("━".repeat(empty), Style::default().fg(palette.progress_dim)),
        Span::raw(" "),
    ]);

    frame.render_widget(Paragraph::new(bar), area);
}

fn draw_playback_panel(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = panel("Music", palette, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    frame.render_widget(
        Paragraph::new(app.playback.describe())
            .style(Style::default().fg(palette.text_muted))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_transcript(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = panel("Assistant", palette, app.view == AppView::Dashboard);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for entry in app.transcript.entries() {
        match entry {
            Entry::Greeting(greeting) => {
                lines.push(Line::styled(
                    greeting.header.clone(),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ));
                for paragraph in &greeting.body {
                    lines.push(Line::styled(
                        paragraph.clone(),
                        Style::default().fg(palette.text_primary),
                    ));
                }
            }
            Entry::Message { sender, text, at } => {
                let (avatar, color) = match sender {
                    Sender::User => ("👤", palette.text_primary),
                    Sender::Assistant => ("🤖", palette.info),
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("{} ", avatar)),
                    Span::styled(text.clone(), Style::default().fg(color)),
                    Span::styled(
                        format!("  {}", at.format("%H:%M:%S")),
                        Style::default().fg(palette.text_muted),
                    ),
                ]));
            }
        }
        lines.push(Line::raw(""));
    }

    if app.transcript.is_typing() {
        lines.push(Line::styled("🤖 ···", Style::default().fg(palette.text_muted)));
    }

    // Keep the newest rows in view, counted after wrapping.
    let transcript = Paragraph::new(lines).wrap(Wrap { trim: false });
    let overflow = transcript
        .line_count(inner.width)
        .saturating_sub(inner.height as usize);
    let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);

    frame.render_widget(transcript.scroll((scroll, 0)), inner);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let block = panel("Message", palette, app.view == AppView::Dashboard);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = if app.input.is_empty() {
        Span::styled("Type a message and press enter", Style::default().fg(palette.text_muted))
    } else {
        Span::styled(format!("{}▏", app.input), Style::default().fg(palette.text_primary))
    };
    frame.render_widget(Paragraph::new(Line::from(text)), inner);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn draw_setup_modal(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let modal = centered(area, 54, 11);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border_active))
        .style(Style::default().bg(palette.background))
        .title(Span::styled(
            " Where are you? ",
            Style::default().fg(palette.accent),
        ));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let rows = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .split(inner);

    let city = if app.setup.focus == SetupField::City {
        format!("{}▏", app.setup.city)
    } else {
        app.setup.city.clone()
    };
    draw_setup_row(frame, rows[0], "City", &city, app.setup.focus == SetupField::City, palette);

    let country = app
        .setup
        .country
        .and_then(|i| app.countries.get(i))
        .map_or("Select a country", |c| c.name);
    let country = if app.setup.focus == SetupField::Country {
        format!("< {} >", country)
    } else {
        country.to_string()
    };
    draw_setup_row(
        frame,
        rows[1],
        "Country",
        &country,
        app.setup.focus == SetupField::Country,
        palette,
    );

    if let Some(error) = app.setup.error {
        frame.render_widget(
            Paragraph::new(error)
                .style(Style::default().fg(palette.warn))
                .alignment(Alignment::Center),
            rows[2],
        );
    }

    let help = if app.city.is_some() {
        "tab switch · ←→ country · enter save · esc back"
    } else {
        "tab switch · ←→ country · enter save"
    };
    frame.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(palette.text_muted))
            .alignment(Alignment::Center),
        rows[3],
    );
}

fn draw_setup_row(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    selected: bool,
    palette: &Palette,
) {
    let chunks = Layout::horizontal([Constraint::Length(10), Constraint::Min(10)]).split(area);

    let label_style = if selected {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.text_secondary)
    };
    frame.render_widget(
        Paragraph::new(format!(" {}", label)).style(label_style),
        chunks[0],
    );

    let value_style = if selected {
        Style::default().fg(palette.text_primary)
    } else {
        Style::default().fg(palette.text_muted)
    };
    frame.render_widget(Paragraph::new(value.to_string()).style(value_style), chunks[1]);
}

fn draw_confirm_modal(frame: &mut Frame, area: Rect, palette: &Palette) {
    let modal = centered(area, 46, 5);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border_active))
        .style(Style::default().bg(palette.background));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let lines = vec![
        Line::styled(
            "Are you sure you want to clear the chat history?",
            Style::default().fg(palette.text_primary),
        ),
        Line::styled("y yes · n no", Style::default().fg(palette.text_muted)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_notice(frame: &mut Frame, area: Rect, notice: &str, palette: &Palette) {
    let modal = centered(area, 60, 6);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.warn))
        .style(Style::default().bg(palette.background));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let lines = vec![
        Line::styled(notice.to_string(), Style::default().fg(palette.text_primary)),
        Line::raw(""),
        Line::styled("enter ok", Style::default().fg(palette.text_muted)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_help(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let help = match app.view {
        AppView::Dashboard => {
            "enter send · ctrl-s speed · ctrl-t theme · ctrl-l clear · ctrl-e location · ctrl-p music · ctrl-q quit"
        }
        AppView::Setup => "ctrl-q quit",
        AppView::ConfirmClear => "y confirm · n cancel",
    };

    frame.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(palette.text_muted))
            .alignment(Alignment::Center),
        area,
    );
}

/// Speeds always read in Mbps with one decimal.
fn format_speed(mbps: f64) -> String {
    format!("{:.1} Mbps", mbps)
}
