pub mod app;
pub mod report_view;
pub mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use attendance_core::{AttendanceRepository, AttendanceService, Config};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::{App, View};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run<R: AttendanceRepository>(service: &AttendanceService<R>, config: &Config) -> Result<()> {
    let export_dir = std::env::current_dir()?;
    let mut app = App::new(service, app::today(), config.editor_timings(), export_dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);
    app.shutdown(Instant::now());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal ui stopped");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend, R: AttendanceRepository>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_, R>,
) -> io::Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        let timeout = app
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(POLL_INTERVAL, |wait| wait.min(POLL_INTERVAL));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let now = Instant::now();
                app.message = None;
                if app.picker.is_some() {
                    match key.code {
                        KeyCode::Left | KeyCode::Char('h') => app.picker_step_month(-1),
                        KeyCode::Right | KeyCode::Char('l') => app.picker_step_month(1),
                        KeyCode::Up | KeyCode::Char('k') => app.picker_step_month(-3),
                        KeyCode::Down | KeyCode::Char('j') => app.picker_step_month(3),
                        KeyCode::Char('-') | KeyCode::Char('p') => app.picker_step_year(-1),
                        KeyCode::Char('+') | KeyCode::Char('n') => app.picker_step_year(1),
                        KeyCode::Enter | KeyCode::Char(' ') => app.confirm_picker(now),
                        KeyCode::Esc | KeyCode::Char('g') => app.close_picker(),
                        KeyCode::Char('q') => return Ok(()),
                        _ => {}
                    }
                    app.tick(Instant::now());
                    continue;
                }
                match (app.view, key.code) {
                    (_, KeyCode::Char('q')) => return Ok(()),
                    (_, KeyCode::Tab) => app.toggle_view(now),
                    (View::Calendar, KeyCode::Left | KeyCode::Char('h')) => app.move_cursor(-1, now),
                    (View::Calendar, KeyCode::Right | KeyCode::Char('l')) => app.move_cursor(1, now),
                    (View::Calendar, KeyCode::Up | KeyCode::Char('k')) => app.move_cursor(-7, now),
                    (View::Calendar, KeyCode::Down | KeyCode::Char('j')) => app.move_cursor(7, now),
                    (View::Calendar, KeyCode::Char(' ') | KeyCode::Enter) => app.click(now),
                    (View::Calendar, KeyCode::Char('H')) => app.toggle_holiday(now),
                    (View::Calendar, KeyCode::Char('n')) => app.next_month(now),
                    (View::Calendar, KeyCode::Char('p')) => app.prev_month(now),
                    (View::Calendar, KeyCode::Char('c')) => app.clear(now),
                    (View::Calendar, KeyCode::Char('g')) => app.open_picker(),
                    (View::Report, KeyCode::Char('+') | KeyCode::Right | KeyCode::Char('l')) => {
                        app.change_report_year(1)
                    }
                    (View::Report, KeyCode::Char('-') | KeyCode::Left | KeyCode::Char('h')) => {
                        app.change_report_year(-1)
                    }
                    (View::Report, KeyCode::Char('e')) => app.export(),
                    (View::Report, KeyCode::Esc) => app.toggle_view(now),
                    _ => {}
                }
            }
        }

        app.tick(Instant::now());
    }
}
