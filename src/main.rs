use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
    Row, Table, Wrap,
};
use tracing::info;

use pl_story::config::Config;
use pl_story::loader;
use pl_story::logging;
use pl_story::scenes::StoryParams;
use pl_story::state::{AppState, Delta, LoadPhase, apply_delta};
use pl_story::surface::{BarChartData, Element, LineChartData, TableData, format_value};

const SERIES_COLORS: [Color; 4] = [Color::Cyan, Color::Yellow, Color::Magenta, Color::Green];

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(params: StoryParams) -> Self {
        Self {
            state: AppState::new(params),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Char(' ') => {
                self.state.advance();
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => {
                self.state.retreat();
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let config = Config::load();
    config.validate()?;
    logging::init_file(&config.log_file)?;
    info!(sources = ?config.sources(), "starting pl_story");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    loader::spawn_loader(config.sources(), tx);

    let mut app = App::new(config.story_params());
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    if let LoadPhase::Failed(msg) = &app.state.phase {
        eprintln!("data load failed: {msg}");
        std::process::exit(1);
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, &app.state))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &state.phase {
        LoadPhase::Loading => {
            let waiting = Paragraph::new("Loading matches, standings and scorers...")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(waiting, chunks[1]);
        }
        LoadPhase::Ready => render_scene(frame, chunks[1], state),
        LoadPhase::Failed(msg) => render_load_error(frame, chunks[1], msg),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    frame.render_widget(Paragraph::new(footer_line(state)), chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let nav = state.controller.nav();
    let title = match state.phase {
        LoadPhase::Ready => state.canvas.title().unwrap_or("").to_string(),
        LoadPhase::Loading => "Loading".to_string(),
        LoadPhase::Failed(_) => "Load failed".to_string(),
    };
    format!(
        " PREMIER LEAGUE 1992-2023 | Scene {}/{}\n {title}",
        nav.position + 1,
        nav.total
    )
}

fn footer_line(state: &AppState) -> Line<'static> {
    let nav = state.controller.nav();
    let ready = state.phase == LoadPhase::Ready;
    let on = Style::default();
    let off = Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM);
    Line::from(vec![
        Span::styled("←/h Prev", if nav.can_retreat && ready { on } else { off }),
        Span::raw(" | "),
        Span::styled("→/l Next", if nav.can_advance && ready { on } else { off }),
        Span::raw(" | ? Help | q Quit"),
    ])
}

fn console_text(state: &AppState) -> String {
    let lines: Vec<&str> = state
        .logs
        .iter()
        .rev()
        .take(4)
        .map(String::as_str)
        .collect();
    lines.into_iter().rev().collect::<Vec<_>>().join("\n")
}

fn render_scene(frame: &mut Frame, area: Rect, state: &AppState) {
    let elements: Vec<&Element> = state
        .canvas
        .elements
        .iter()
        .filter(|e| !matches!(e, Element::Heading(_)))
        .collect();
    if elements.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = elements
        .iter()
        .map(|e| match e {
            Element::Heading(_) | Element::Note(_) => Constraint::Length(1),
            Element::Bars(_) => Constraint::Min(10),
            Element::Lines(_) => Constraint::Min(10),
            Element::Table(t) => Constraint::Length(t.rows.len() as u16 + 3),
        })
        .collect();
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (element, slot) in elements.iter().zip(areas.iter()) {
        match element {
            Element::Heading(_) => {}
            Element::Note(text) => {
                let note = Paragraph::new(text.as_str()).wrap(Wrap { trim: true });
                frame.render_widget(note, *slot);
            }
            Element::Bars(chart) => render_bars(frame, *slot, chart),
            Element::Lines(chart) => render_lines(frame, *slot, chart),
            Element::Table(table) => render_table(frame, *slot, table),
        }
    }
}

fn render_bars(frame: &mut Frame, area: Rect, chart: &BarChartData) {
    let block = Block::default()
        .title(format!("{} ({})", chart.title, chart.y_label))
        .borders(Borders::ALL);
    let horizontal = chart.bars.iter().any(|b| b.label.chars().count() > 6);

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.value.max(0.0).round() as u64)
                .text_value(format_value(b.value))
                .label(Line::from(b.label.clone()))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    let count = chart.bars.len().max(1) as u16;
    let widget = if horizontal {
        BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
    } else {
        let inner = area.width.saturating_sub(2);
        let bar_width = (inner / count).saturating_sub(1).clamp(1, 6);
        BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
    };
    frame.render_widget(widget, area);
}

fn render_lines(frame: &mut Frame, area: Rect, chart: &LineChartData) {
    let block = Block::default().title(chart.title.clone()).borders(Borders::ALL);
    let Some(([x0, x1], [y0, y1])) = chart.bounds() else {
        let empty = Paragraph::new("No points to plot")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    // Each gap-free run is its own dataset so no line bridges a missing season.
    let segments: Vec<(usize, String, Vec<(f64, f64)>)> = chart
        .series
        .iter()
        .enumerate()
        .flat_map(|(idx, s)| {
            s.segments()
                .into_iter()
                .enumerate()
                .map(move |(seg_idx, seg)| {
                    let name = if seg_idx == 0 { s.label.clone() } else { String::new() };
                    (idx, name, seg)
                })
        })
        .collect();

    let datasets: Vec<Dataset> = segments
        .iter()
        .map(|(idx, name, points)| {
            let graph = if points.len() == 1 {
                GraphType::Scatter
            } else {
                GraphType::Line
            };
            Dataset::default()
                .name(name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(graph)
                .style(Style::default().fg(SERIES_COLORS[idx % SERIES_COLORS.len()]))
                .data(points)
        })
        .collect();

    let pad = ((y1 - y0).abs() * 0.1).max(0.5);
    let (y_lo, y_hi) = (y0 - pad, y1 + pad);
    let x_hi = if x1 > x0 { x1 } else { x0 + 1.0 };
    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Season")
                .bounds([x0, x_hi])
                .labels(vec![
                    Span::raw(format!("{x0:.0}")),
                    Span::raw(format!("{:.0}", (x0 + x_hi) / 2.0)),
                    Span::raw(format!("{x_hi:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .bounds([y_lo, y_hi])
                .labels(vec![
                    Span::raw(format!("{y_lo:.1}")),
                    Span::raw(format!("{:.1}", (y_lo + y_hi) / 2.0)),
                    Span::raw(format!("{y_hi:.1}")),
                ]),
        );
    frame.render_widget(widget, area);
}

fn render_table(frame: &mut Frame, area: Rect, table: &TableData) {
    let cols = table.headers.len().max(1);
    let widths: Vec<Constraint> = (0..cols)
        .map(|i| {
            if i == 0 {
                Constraint::Min(24)
            } else {
                Constraint::Min(8)
            }
        })
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|r| Row::new(r.iter().map(|c| c.clone()).collect::<Vec<_>>()));
    let header = Row::new(table.headers.clone())
        .style(Style::default().add_modifier(Modifier::BOLD));
    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(table.title.clone()).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_load_error(frame: &mut Frame, area: Rect, msg: &str) {
    let popup = centered_rect(70, 40, area);
    frame.render_widget(Clear, popup);
    let text = format!("Could not load the league data.\n\n{msg}\n\nPress q to quit.");
    let panel = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Load failed").borders(Borders::ALL));
    frame.render_widget(panel, popup);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 40, area);
    frame.render_widget(Clear, popup);
    let text = [
        "→ / l / n / Space   next scene",
        "← / h / p           previous scene",
        "?                   toggle this help",
        "q / Esc             quit",
    ]
    .join("\n");
    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
