use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    DefaultTerminal, Frame,
};

use crate::backend::AudioBackend;
use crate::config::Config;
use crate::controls::{draw_accessories, draw_help, draw_transport, help_height};
use crate::now_playing::{draw_art, draw_backdrop, draw_header, Artwork, HEADER_ROWS};
use crate::progress::{draw_progress, scrub_bar_area, scrub_ratio, PROGRESS_ROWS};
use crate::resolver::AssetResolver;
use crate::session::PlaybackSession;
use crate::theme::{next_theme, theme_index, THEMES};
use crate::timer::RepeatingTimer;
use crate::volume::draw_volume;

const MAX_WIDTH: u16 = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    TogglePlay,
    SeekBy(f64),
    SeekTo(f64),
    SeekFraction(f64),
    CycleTheme,
    Quit,
}

/// The player screen. Owns the session it was handed and forwards gestures
/// to it; all playback decisions live in the session.
pub struct App<B: AudioBackend, R: AssetResolver> {
    session: PlaybackSession<B, R>,
    config: Config,
    artwork: Option<Artwork>,
    theme: usize,
    timer: Option<RepeatingTimer>,
    status: Option<String>,
    scrub_bar: Rect,
    dragging: bool,
    quit: bool,
}

impl<B: AudioBackend, R: AssetResolver> App<B, R> {
    pub fn new(session: PlaybackSession<B, R>, config: Config, artwork: Option<Artwork>) -> Self {
        let theme = theme_index(&config.theme);
        App {
            session,
            config,
            artwork,
            theme,
            timer: None,
            status: None,
            scrub_bar: Rect::default(),
            dragging: false,
            quit: false,
        }
    }

    /// The view became visible: load the track once and start refreshing.
    pub fn activate(&mut self, now: Instant) {
        if let Err(err) = self.session.load(&self.config.track) {
            self.status = Some(format!("Unable to play: {err}"));
        } else if self.artwork.is_none() {
            self.artwork = self.session.cover().and_then(Artwork::from_bytes);
        }
        self.timer = Some(RepeatingTimer::start(self.config.tick_period(), now));
    }

    /// Stop the refresh timer, then release the track.
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
        self.session.close();
    }

    pub fn session(&self) -> &PlaybackSession<B, R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PlaybackSession<B, R> {
        &mut self.session
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn timer(&self) -> Option<&RepeatingTimer> {
        self.timer.as_ref()
    }

    /// How long the loop may wait for input before the next tick is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.timer
            .as_ref()
            .and_then(|t| t.timeout(now))
            .unwrap_or(self.config.tick_period())
    }

    /// Run the position refresh if the timer says it is due.
    pub fn poll_tick(&mut self, now: Instant) -> bool {
        let due = self.timer.as_mut().is_some_and(|t| t.poll(now));
        if due {
            self.session.tick();
        }
        due
    }

    pub fn key_action(&self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let step = self.config.seek_step();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char(' ') => Some(Action::TogglePlay),
            KeyCode::Right => Some(Action::SeekBy(step)),
            KeyCode::Left => Some(Action::SeekBy(-step)),
            KeyCode::Home => Some(Action::SeekTo(0.0)),
            KeyCode::End => Some(Action::SeekTo(self.session.duration_seconds())),
            KeyCode::Char('t') => Some(Action::CycleTheme),
            _ => None,
        }
    }

    /// Press on the slider grabs it; dragging keeps seeking even when the
    /// pointer strays off the row.
    pub fn mouse_action(&mut self, mouse: MouseEvent) -> Option<Action> {
        let bar = self.scrub_bar;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let ratio = scrub_ratio(bar, mouse.column, mouse.row)?;
                self.dragging = true;
                Some(Action::SeekFraction(ratio))
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging && bar.width > 0 => {
                let column = mouse.column.clamp(bar.x, bar.x + bar.width - 1);
                scrub_ratio(bar, column, bar.y).map(Action::SeekFraction)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.dragging = false;
                None
            }
            _ => None,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::TogglePlay => self.session.toggle(),
            Action::SeekBy(delta) => self.session.seek_by(delta),
            Action::SeekTo(target) => self.session.seek(target),
            Action::SeekFraction(ratio) => self.session.seek_fraction(ratio),
            Action::CycleTheme => self.theme = next_theme(self.theme),
            Action::Quit => self.quit = true,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        let action = match event {
            Event::Key(key) => self.key_action(key),
            Event::Mouse(mouse) => self.mouse_action(mouse),
            _ => None,
        };
        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn title(&self) -> String {
        self.session
            .meta()
            .and_then(|m| m.title.clone())
            .unwrap_or_else(|| self.config.title.clone())
    }

    fn artist(&self) -> String {
        self.session
            .meta()
            .and_then(|m| m.artist.clone())
            .unwrap_or_else(|| self.config.artist.clone())
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let theme = &THEMES[self.theme];
        draw_backdrop(frame, self.artwork.as_mut(), theme);

        let full = frame.area();
        let width = full.width.saturating_sub(4).min(MAX_WIDTH);
        let column = Rect {
            x: full.x + (full.width - width) / 2,
            width,
            ..full
        };

        let [_, art, _, header, _, progress, _, transport, _, volume, _, accessories, _, help] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(HEADER_ROWS),
                Constraint::Length(1),
                Constraint::Length(PROGRESS_ROWS),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(help_height(width, theme)),
            ])
            .areas(column);

        draw_art(frame, art, self.artwork.as_mut(), theme);

        let title = self.title();
        let artist = self.artist();
        draw_header(frame, header, &title, &artist, self.status.as_deref(), theme);

        let loaded = self.session.is_loaded();
        draw_progress(
            frame,
            progress,
            self.session.position_seconds(),
            self.session.duration_seconds(),
            loaded,
            theme,
        );
        self.scrub_bar = if loaded { scrub_bar_area(progress) } else { Rect::default() };

        draw_transport(frame, transport, self.session.is_playing(), loaded, theme);
        draw_volume(frame, volume, theme);
        draw_accessories(frame, accessories, &self.config.device_label, theme);
        draw_help(frame, help, theme);
    }
}

pub fn run<B: AudioBackend, R: AssetResolver>(
    terminal: &mut DefaultTerminal,
    app: &mut App<B, R>,
) -> io::Result<()> {
    let result = event_loop(terminal, app);
    app.shutdown();
    result
}

fn event_loop<B: AudioBackend, R: AssetResolver>(
    terminal: &mut DefaultTerminal,
    app: &mut App<B, R>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.draw(f))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            app.handle_event(event::read()?);
        }
        if app.should_quit() {
            return Ok(());
        }
        app.poll_tick(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Asset, MemoryResolver};
    use crate::simulated::{silent_wav, ManualClock, SimulatedBackend};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    type TestApp = App<SimulatedBackend, MemoryResolver>;

    fn app(with_track: bool) -> (ManualClock, TestApp) {
        let clock = ManualClock::new();
        let mut resolver = MemoryResolver::new();
        if with_track {
            resolver.insert(Asset::new("forest", silent_wav(180, 1000)).with_extension("wav"));
        }
        let session = PlaybackSession::new(SimulatedBackend::new(clock.clone()), resolver);
        (clock, App::new(session, Config::default(), None))
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn screen(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(app: &mut TestApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        screen(terminal.backend().buffer())
    }

    #[test]
    fn keys_drive_the_session() {
        let (clock, mut app) = app(true);
        app.activate(Instant::now());
        assert!(app.status().is_none());

        app.handle_event(press(KeyCode::Char(' ')));
        assert!(app.session().is_playing());

        clock.advance_secs(10.0);
        app.handle_event(press(KeyCode::Left));
        assert_eq!(app.session().position_seconds(), 5.0);

        app.handle_event(press(KeyCode::End));
        assert_eq!(app.session().position_seconds(), 180.0);

        app.handle_event(press(KeyCode::Home));
        app.handle_event(press(KeyCode::Char(' ')));
        assert!(!app.session().is_playing());
        assert_eq!(app.session().position_seconds(), 0.0);

        app.handle_event(press(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn failed_load_shows_status_and_ignores_transport() {
        let (_clock, mut app) = app(false);
        app.activate(Instant::now());
        assert!(app.status().unwrap().contains("not found"));

        app.handle_event(press(KeyCode::Char(' ')));
        app.handle_event(press(KeyCode::Right));
        assert!(!app.session().is_playing());
        assert_eq!(app.session().position_seconds(), 0.0);

        let text = render(&mut app);
        assert!(text.contains("Unable to play"));
    }

    #[test]
    fn render_shows_times_and_metadata_fallbacks() {
        let (_clock, mut app) = app(true);
        app.activate(Instant::now());
        app.session_mut().seek(65.0);

        let text = render(&mut app);
        assert!(text.contains("Lucid Dreams"));
        assert!(text.contains("Juice WRLD"));
        assert!(text.contains("01:05"));
        assert!(text.contains("03:00"));
        assert!(text.contains("Erke"));
    }

    #[test]
    fn clicking_and_dragging_the_scrub_bar_seeks() {
        let (_clock, mut app) = app(true);
        app.activate(Instant::now());
        render(&mut app);

        let bar = app.scrub_bar;
        assert!(bar.width > 1);
        let last = bar.x + bar.width - 1;

        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), last, bar.y));
        assert_eq!(app.session().position_seconds(), 180.0);

        // Dragging off the row still scrubs, clamped to the bar
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 0, bar.y + 3));
        assert_eq!(app.session().position_seconds(), 0.0);

        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 0, bar.y));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), last, bar.y));
        assert_eq!(app.session().position_seconds(), 0.0);

        // Clicks elsewhere are ignored
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), last, bar.y + 1));
        assert_eq!(app.session().position_seconds(), 0.0);
    }

    #[test]
    fn ticks_refresh_position_until_shutdown() {
        let (clock, mut app) = app(true);
        let t0 = Instant::now();
        app.activate(t0);
        app.apply(Action::TogglePlay);

        clock.advance_secs(1.0);
        assert!(!app.poll_tick(t0));
        assert_eq!(app.session().position_seconds(), 0.0);
        assert!(app.poll_tick(t0 + Duration::from_millis(100)));
        assert_eq!(app.session().position_seconds(), 1.0);

        app.shutdown();
        assert!(app.timer().unwrap().is_cancelled());
        assert!(!app.session().is_loaded());
        clock.advance_secs(1.0);
        assert!(!app.poll_tick(t0 + Duration::from_secs(5)));
        assert_eq!(app.session().position_seconds(), 0.0);
    }

    #[test]
    fn theme_cycles() {
        let (_clock, mut app) = app(false);
        assert_eq!(app.theme, 0);
        app.handle_event(press(KeyCode::Char('t')));
        assert_eq!(app.theme, 1);
    }
}
