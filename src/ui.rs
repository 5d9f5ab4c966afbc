use crate::amount::Cents;
use crate::calculation::{
    CalculationMode, CalculationResult, CalculationSession, Calculator, LocalCalculator,
};
use crate::changes::format_delta;
use crate::error::DenominationError;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;

const MAX_INPUT_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    InvalidAmount,
    RemoteFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn color(&self) -> Color {
        match self.kind {
            StatusKind::Info => Color::Green,
            StatusKind::InvalidAmount => Color::Yellow,
            StatusKind::RemoteFailure => Color::Red,
        }
    }
}

pub struct App {
    pub input: String,
    pub mode: CalculationMode,
    pub show_zeros: bool,
    pub session: CalculationSession,
    pub status: StatusMessage,
    local: LocalCalculator,
    remote: Option<Box<dyn Calculator>>,
}

impl App {
    pub fn new() -> Self {
        App {
            input: String::new(),
            mode: CalculationMode::Local,
            show_zeros: false,
            session: CalculationSession::new(),
            status: StatusMessage::info("Enter an amount in euros and press Enter"),
            local: LocalCalculator,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: Box<dyn Calculator>) -> Self {
        self.remote = Some(remote);
        self
    }

    fn calculator(&self) -> &dyn Calculator {
        match (&self.remote, self.mode) {
            (Some(remote), CalculationMode::Remote) => &**remote,
            _ => &self.local,
        }
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        self.session.last_result()
    }

    pub fn push_char(&mut self, c: char) {
        let c = if c == ',' { '.' } else { c };
        let has_dot = self.input.contains('.');
        let accept = c.is_ascii_digit() || (c == '.' && !has_dot);
        if accept && self.input.len() < MAX_INPUT_LEN {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn toggle_mode(&mut self) {
        if self.remote.is_some() {
            self.mode = self.mode.toggle();
            self.status = StatusMessage::info(format!("Calculation mode: {}", self.mode.as_str()));
        } else {
            self.status = StatusMessage {
                kind: StatusKind::RemoteFailure,
                text: "Remote calculation is not available".to_string(),
            };
        }
    }

    pub fn toggle_zeros(&mut self) {
        self.show_zeros = !self.show_zeros;
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.input.clear();
        self.status = StatusMessage::info("Session cleared");
    }

    /// Validate the input and run a calculation. Only amounts above zero can
    /// be submitted from the form.
    pub fn submit(&mut self) {
        let amount = match self.input.parse::<Cents>() {
            Ok(amount) if amount > Cents::ZERO => amount,
            Ok(_) => {
                self.status = StatusMessage {
                    kind: StatusKind::InvalidAmount,
                    text: "Please enter an amount greater than 0".to_string(),
                };
                return;
            }
            Err(e) => {
                self.status = StatusMessage {
                    kind: StatusKind::InvalidAmount,
                    text: e.to_string(),
                };
                return;
            }
        };

        let mode = self.calculator().mode();
        let mut session = std::mem::take(&mut self.session);
        let outcome = session.submit(self.calculator(), amount).map(|_| ());
        self.session = session;

        self.status = match outcome {
            Ok(()) => StatusMessage::info(format!("Calculated €{} ({})", amount, mode.as_str())),
            Err(DenominationError::InvalidAmount(reason)) => StatusMessage {
                kind: StatusKind::InvalidAmount,
                text: reason,
            },
            Err(DenominationError::Remote(reason)) => StatusMessage {
                kind: StatusKind::RemoteFailure,
                text: format!("Remote calculation failed. Check if the server is running ({})", reason),
            },
        };
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.submit(),
                KeyCode::Tab => app.toggle_mode(),
                KeyCode::Backspace => app.pop_char(),
                KeyCode::Char('z') => app.toggle_zeros(),
                KeyCode::Char('r') => app.reset(),
                KeyCode::Char(c) => app.push_char(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with mode
            Constraint::Length(3), // Amount input
            Constraint::Min(0),    // Tables
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_input(f, chunks[1], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    render_breakdown(f, content_chunks[0], app);
    render_changes(f, content_chunks[1], app);
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "Euro Denomination Calculator",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw("  |  "));

    for (i, mode) in [CalculationMode::Local, CalculationMode::Remote].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *mode == app.mode {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(mode.as_str(), style));
    }

    if let Some(previous) = app.session.previous_amount() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            format!("Previous: €{}", previous),
            Style::default().fg(Color::Cyan),
        ));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled("€ ", Style::default().fg(Color::Yellow)),
        Span::styled(app.input.clone(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::DarkGray)),
    ]);
    let input = Paragraph::new(vec![line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Amount "),
    );
    f.render_widget(input, area);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(["Denomination", "Type", "Count"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows: Vec<Row> = match app.result() {
        Some(result) => result
            .breakdown
            .iter()
            .filter(|(_, count)| app.show_zeros || *count > 0)
            .map(|(denom, count)| {
                let color = if count > 0 { Color::White } else { Color::DarkGray };
                Row::new(vec![
                    Cell::from(format!("€{}", denom.key())),
                    Cell::from(denom.kind().as_str()),
                    Cell::from(count.to_string()),
                ])
                .style(Style::default().fg(color))
            })
            .collect(),
        None => Vec::new(),
    };

    let title = match app.result() {
        Some(result) => format!(" Breakdown of €{:.2} ", result.amount),
        None => " Breakdown ".to_string(),
    };

    let table = Table::new(
        rows,
        [Constraint::Length(14), Constraint::Length(6), Constraint::Length(8)],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    );

    f.render_widget(table, area);
}

fn render_changes(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(["Denomination", "Before", "Now", "Change"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows: Vec<Row> = app
        .result()
        .map(|result| result.change_rows())
        .unwrap_or_default()
        .into_iter()
        .map(|row| {
            let color = match row.delta {
                d if d > 0 => Color::Green,
                d if d < 0 => Color::Red,
                _ => Color::DarkGray,
            };
            Row::new(vec![
                Cell::from(format!("€{}", row.denomination.key())),
                Cell::from(row.previous.to_string()),
                Cell::from(row.current.to_string()),
                Cell::from(format_delta(row.delta)).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let title = match app.session.old_amount() {
        Some(old) if app.result().map_or(false, |r| r.changes.is_some()) => {
            format!(" Changes since €{} ", old)
        }
        _ => " Changes ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    );

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_spans = vec![
        Span::styled(
            format!(" {} ", app.status.text),
            Style::default().fg(app.status.color()),
        ),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Calculate | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Local/Remote | "),
        Span::styled("z", Style::default().fg(Color::Yellow)),
        Span::raw(if app.show_zeros { " Hide zeros | " } else { " Show zeros | " }),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Reset | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
