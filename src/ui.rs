use std::fmt::Display;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use log::{debug, error};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Terminal;
use tokio::task::JoinHandle;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::backend::{Dispatcher, Outcome, FALLBACK_MESSAGE};
use crate::controller::{update, AppState, AppViewModel, Effect, Msg, Status};
use crate::effects;
use crate::model::{ContentKind, Operation};
use crate::prompts;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum RequestProgress {
    Waiting,
    S0,
    S1,
    S2,
    S3,
}

impl RequestProgress {
    const fn next_state(self) -> Self {
        match self {
            Self::Waiting | Self::S3 => Self::S0,
            Self::S0 => Self::S1,
            Self::S1 => Self::S2,
            Self::S2 => Self::S3,
        }
    }
}

impl Display for RequestProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, ""),
            Self::S0 => write!(f, "-"),
            Self::S1 => write!(f, "\\"),
            Self::S2 => write!(f, "|"),
            Self::S3 => write!(f, "/"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Exit,
    Send(Msg),
    Edit,
    Ignore,
}

fn map_key(key: &KeyEvent) -> KeyAction {
    match key {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Esc, ..
        } => KeyAction::Exit,
        KeyEvent {
            code: KeyCode::Char('p'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => KeyAction::Send(Msg::OperationRequested(Operation::Paraphrase)),
        KeyEvent {
            code: KeyCode::Char('s'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => KeyAction::Send(Msg::OperationRequested(Operation::Summarize)),
        KeyEvent {
            code: KeyCode::Tab, ..
        } => KeyAction::Send(Msg::ContentKindToggled),
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => KeyAction::Ignore,
        _ => KeyAction::Edit,
    }
}

enum Wake {
    Terminal(Event),
    Tick,
    Settled(Msg),
}

const fn input_title(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::PlainText => prompts::INPUT_TITLE_TEXT,
        ContentKind::ArticleUrl => prompts::INPUT_TITLE_URL,
    }
}

fn output_text(status: &Status) -> &str {
    match status {
        Status::Idle => prompts::OUTPUT_PLACEHOLDER,
        Status::Loading | Status::Failure(_) => "",
        Status::Success(output) if output.is_empty() => prompts::EMPTY_RESULT_PLACEHOLDER,
        Status::Success(output) => output.as_str(),
    }
}

fn controls_text(view: &AppViewModel) -> &'static str {
    if matches!(view.status, Status::Loading) {
        prompts::CONTROLS_PROCESSING
    } else if view.triggers_enabled {
        prompts::CONTROLS_READY
    } else {
        prompts::CONTROLS_EMPTY_INPUT
    }
}

fn create_input_paragraph<'t>(text: &'t str, title: &'t str) -> Paragraph<'t> {
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(Alignment::Left)
}

fn create_output_paragraph(view: &AppViewModel, progress: RequestProgress) -> Paragraph<'_> {
    let title = format!("{} {progress}", prompts::OUTPUT_TITLE);
    Paragraph::new(output_text(&view.status))
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
}

fn create_error_paragraph(view: &AppViewModel) -> Paragraph<'_> {
    Paragraph::new(view.error().unwrap_or_default())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
}

fn create_controls_paragraph<'t>(view: &AppViewModel) -> Paragraph<'t> {
    Paragraph::new(controls_text(view))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
}

fn create_layout() -> Layout {
    Layout::default().direction(Direction::Vertical).constraints(
        [
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(2),
            Constraint::Length(2),
        ]
        .as_ref(),
    )
}

/// Resolves when the in-flight dispatch settles; never resolves when idle.
async fn wait_settled(pending: &mut Option<JoinHandle<Msg>>) -> Msg {
    match pending.as_mut() {
        Some(handle) => handle.await.unwrap_or_else(|err| {
            error!("dispatch task failed: {err}");
            Msg::DispatchSettled(Outcome::Failed(FALLBACK_MESSAGE.to_string()))
        }),
        None => std::future::pending().await,
    }
}

pub struct RecastUI {
    term: Terminal<CrosstermBackend<Stdout>>,
    dispatcher: Dispatcher,
    state: AppState,
    input: Input,
    progress: RequestProgress,
}

impl RecastUI {
    /// This function initializes the UI and eases disabling terminal raw mode in all circumstances
    fn initialization(
        dispatcher: Dispatcher,
        state: AppState,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let term = Terminal::new(backend)?;

        let input = Input::new(state.input().to_string());
        Ok(Self {
            term,
            dispatcher,
            state,
            input,
            progress: RequestProgress::Waiting,
        })
    }

    pub fn new(dispatcher: Dispatcher, state: AppState) -> Result<Self, Box<dyn std::error::Error>> {
        enable_raw_mode()?;
        match Self::initialization(dispatcher, state) {
            Ok(ui) => Ok(ui),
            Err(err) => {
                disable_raw_mode()?;
                Err(err)
            }
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let result = self.mainloop().await;

        // restore terminal mode
        disable_raw_mode()?;
        crossterm::execute!(
            self.term.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.term.show_cursor()?;
        result
    }

    async fn mainloop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(100));
        let mut pending: Option<JoinHandle<Msg>> = None;

        loop {
            self.draw()?;

            let wake = tokio::select! {
                event = events.next() => match event {
                    Some(event) => Wake::Terminal(event?),
                    None => return Ok(()),
                },
                _ = tick.tick() => Wake::Tick,
                msg = wait_settled(&mut pending) => Wake::Settled(msg),
            };

            let msg = match wake {
                Wake::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    match map_key(&key) {
                        KeyAction::Exit => return Ok(()),
                        KeyAction::Send(Msg::OperationRequested(operation)) => {
                            debug!("{operation} requested for {} input", self.state.kind());
                            Msg::OperationRequested(operation)
                        }
                        KeyAction::Send(msg) => msg,
                        KeyAction::Edit => {
                            self.input.handle_event(&Event::Key(key));
                            Msg::InputChanged(self.input.value().to_string())
                        }
                        KeyAction::Ignore => continue,
                    }
                }
                Wake::Terminal(_) => continue,
                Wake::Tick => {
                    self.progress = if self.state.dispatch_slot_held() {
                        self.progress.next_state()
                    } else {
                        RequestProgress::Waiting
                    };
                    continue;
                }
                Wake::Settled(msg) => {
                    pending = None;
                    msg
                }
            };

            // The controller emits a dispatch only while the slot is free, so
            // there is never more than one in flight.
            for effect in self.apply(msg) {
                pending = Some(self.spawn(effect));
            }
        }
    }

    fn apply(&mut self, msg: Msg) -> Vec<Effect> {
        let (state, effects) = update(std::mem::take(&mut self.state), msg);
        self.state = state;
        effects
    }

    fn spawn(&self, effect: Effect) -> JoinHandle<Msg> {
        debug!("spawning {effect:?}");
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move { effects::execute(&dispatcher, effect).await })
    }

    fn draw(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let view = self.state.view();
        let progress = self.progress;
        let input = &self.input;
        self.term.draw(|f| {
            let chunks = create_layout().split(f.size());
            let width = chunks[0].width.max(3) - 3; // keep 2 for borders and 1 for cursor
            let scroll = input.visual_scroll(width as usize);
            f.render_widget(
                create_input_paragraph(input.value(), input_title(view.kind))
                    .scroll((0, u16::try_from(scroll).unwrap_or_default())),
                chunks[0],
            );
            f.set_cursor(
                chunks[0].x
                    + u16::try_from(input.visual_cursor().max(scroll) - scroll)
                        .unwrap_or_default()
                    + 1,
                chunks[0].y + 1,
            );
            f.render_widget(create_output_paragraph(&view, progress), chunks[1]);
            f.render_widget(create_error_paragraph(&view), chunks[2]);
            f.render_widget(create_controls_paragraph(&view), chunks[3]);
        })?;
        Ok(())
    }
}
