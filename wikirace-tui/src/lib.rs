use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wikirace_client::SolveClient;
use wikirace_core::config::{ClientConfig, config_file_in};
use wikirace_core::text::{TextDiagram, TextResults};
use wikirace_core::{FormFields, Phase, SharedForm, SubmitEvent, SubmitHandler, SubmitOutcome};

mod form;

pub use form::{Field, FieldCursor};

pub type FormHandler = SubmitHandler<SharedForm, TextResults, TextDiagram>;

/// Messages sent back from submission tasks
#[derive(Debug, Clone, PartialEq)]
pub enum FormMessage {
    Rendered { token: u64, nodes: usize },
    Failed { token: u64, message: String },
    Stale { token: u64 },
}

impl From<&SubmitOutcome> for FormMessage {
    fn from(outcome: &SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Rendered { token, response } => FormMessage::Rendered {
                token: *token,
                nodes: response.solution.len(),
            },
            SubmitOutcome::Failed { token, error } => FormMessage::Failed {
                token: *token,
                message: error.to_string(),
            },
            SubmitOutcome::Stale { token } => FormMessage::Stale { token: *token },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StatusLevel {
    Info,
    Error,
}

pub struct App {
    handler: Arc<FormHandler>,
    form: SharedForm,
    cursor: FieldCursor,
    results_lines: Vec<String>,
    diagram_lines: Vec<String>,
    status: (StatusLevel, String),
    should_quit: bool,
    tx: mpsc::UnboundedSender<FormMessage>,
    rx: mpsc::UnboundedReceiver<FormMessage>,
}

impl App {
    pub fn new(client: SolveClient, default_algorithm: &str) -> Self {
        let form = SharedForm::new(FormFields::new("", "", default_algorithm));
        let handler = Arc::new(SubmitHandler::new(
            client,
            form.clone(),
            TextResults::default(),
            TextDiagram::default(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            handler,
            form,
            cursor: FieldCursor::default(),
            results_lines: Vec::new(),
            diagram_lines: Vec::new(),
            status: (
                StatusLevel::Info,
                "Fill in the form and press Enter to search".to_string(),
            ),
            should_quit: false,
            tx,
            rx,
        }
    }

    pub fn form(&self) -> FormFields {
        self.form.snapshot()
    }

    pub fn focused(&self) -> Field {
        self.cursor.field()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status_message(&self) -> &str {
        &self.status.1
    }

    /// Apply a key press. Returns true when the form was submitted.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::Down => {
                let fields = self.form();
                self.cursor.next_field(&fields);
            }
            KeyCode::BackTab | KeyCode::Up => {
                let fields = self.form();
                self.cursor.previous_field(&fields);
            }
            KeyCode::Char(c) => {
                let cursor = &mut self.cursor;
                self.form.update(|fields| cursor.insert(fields, c));
            }
            KeyCode::Backspace => {
                let cursor = &mut self.cursor;
                self.form.update(|fields| cursor.backspace(fields));
            }
            KeyCode::Left => self.cursor.left(),
            KeyCode::Right => {
                let fields = self.form();
                self.cursor.right(&fields);
            }
            KeyCode::Home => self.cursor.home(),
            KeyCode::End => {
                let fields = self.form();
                self.cursor.end(&fields);
            }
            KeyCode::Enter => {
                self.submit();
                return true;
            }
            _ => {}
        }
        false
    }

    /// Run one submission on the tokio runtime; the outcome arrives on the
    /// message channel.
    fn submit(&mut self) {
        let fields = self.form();
        self.status = (
            StatusLevel::Info,
            format!("Solving {} -> {}...", fields.start.trim(), fields.end.trim()),
        );

        let handler = self.handler.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut event = SubmitEvent::new();
            let outcome = handler.handle_submit(&mut event).await;
            // Receiver is gone once the UI has exited
            let _ = tx.send(FormMessage::from(&outcome));
        });
    }

    pub fn apply_message(&mut self, message: FormMessage) {
        match message {
            FormMessage::Rendered { nodes, .. } => {
                self.status = (StatusLevel::Info, format!("Found a path with {} nodes", nodes));
            }
            FormMessage::Failed { message, .. } => {
                self.status = (StatusLevel::Error, format!("Search failed: {}", message));
            }
            // A newer submission owns the status line
            FormMessage::Stale { .. } => {}
        }
    }

    fn process_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply_message(message);
        }
    }

    /// Copy region contents when no submission is currently writing them
    fn refresh_regions(&mut self) {
        if let Some((results, diagram)) = self.handler.try_regions() {
            self.results_lines = results.lines();
            self.diagram_lines = diagram.lines();
        }
    }
}

pub async fn run(config_dir: &str) -> Result<()> {
    let config = ClientConfig::load_or_default(&config_file_in(config_dir))?;
    let client = SolveClient::from_options(&config.client)?;
    let mut app = App::new(client, &config.default_algorithm);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.process_messages();
        app.refresh_regions();
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Only process KeyPress events, ignore KeyRelease
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        } else {
            // Give spawned submissions a chance to run between polls
            tokio::task::yield_now().await;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Form
            Constraint::Length(6), // Results
            Constraint::Min(3),    // Diagram
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_form(f, app, chunks[0]);

    let results: Vec<Line> = if app.results_lines.is_empty() {
        vec![Line::from(Span::styled(
            "No results yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.results_lines.iter().map(|l| Line::from(l.clone())).collect()
    };
    let results = Paragraph::new(results).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Results ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(results, chunks[1]);

    let diagram: Vec<Line> = app
        .diagram_lines
        .iter()
        .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(Color::Yellow))))
        .collect();
    let diagram = Paragraph::new(diagram).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Path ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(diagram, chunks[2]);

    let phase = match app.handler.phase() {
        Phase::Idle => "idle",
        Phase::Submitting => "solving",
        Phase::Rendered => "done",
        Phase::Failed => "failed",
    };
    let status_style = match app.status.0 {
        StatusLevel::Info => Style::default().fg(Color::DarkGray),
        StatusLevel::Error => Style::default().fg(Color::Red),
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(format!("[{}] ", phase), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(app.status.1.clone(), status_style),
        Span::raw(" | "),
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" next field | "),
        Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" search | "),
        Span::styled("ESC", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ]));
    f.render_widget(status, chunks[3]);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(area);

    let fields = app.form();
    for (index, field) in Field::ALL.iter().enumerate() {
        let focused = app.focused() == *field;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(field.value(&fields).to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", field.title()))
                .border_style(border),
        );
        f.render_widget(input, columns[index]);

        if focused {
            f.set_cursor_position((
                columns[index].x + 1 + app.cursor.position() as u16,
                columns[index].y + 1,
            ));
        }
    }
}
