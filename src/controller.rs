//! Interactive state: pure state machine driven by messages.
//!
//! The UI and the one-shot commands feed [`Msg`]s into [`update`] and execute
//! the returned [`Effect`]s. Nothing here touches the network.

use crate::backend::Outcome;
use crate::model::{ContentKind, Operation, RequestSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the input buffer.
    InputChanged(String),
    ContentKindSelected(ContentKind),
    ContentKindToggled,
    /// User pressed paraphrase or summarize.
    OperationRequested(Operation),
    /// The in-flight call finished.
    DispatchSettled(Outcome),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Dispatch(RequestSpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    kind: ContentKind,
    input: String,
    status: Status,
}

/// Snapshot handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub kind: ContentKind,
    pub input: String,
    pub status: Status,
    pub triggers_enabled: bool,
}

impl AppViewModel {
    pub fn output(&self) -> Option<&str> {
        match &self.status {
            Status::Success(output) => Some(output.as_str()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(kind: ContentKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
            status: Status::Idle,
        }
    }

    pub const fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub const fn status(&self) -> &Status {
        &self.status
    }

    /// The dispatch slot is held from the request until the call settles.
    pub const fn dispatch_slot_held(&self) -> bool {
        matches!(self.status, Status::Loading)
    }

    pub fn triggers_enabled(&self) -> bool {
        !self.dispatch_slot_held() && !self.input.is_empty()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            kind: self.kind,
            input: self.input.clone(),
            status: self.status.clone(),
            triggers_enabled: self.triggers_enabled(),
        }
    }
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(input) => {
            state.input = input;
            Vec::new()
        }
        Msg::ContentKindSelected(kind) => {
            state.kind = kind;
            Vec::new()
        }
        Msg::ContentKindToggled => {
            state.kind = state.kind.toggled();
            Vec::new()
        }
        Msg::OperationRequested(operation) => {
            if !state.triggers_enabled() {
                return (state, Vec::new());
            }
            // Loading replaces any previous output or error.
            state.status = Status::Loading;
            vec![Effect::Dispatch(RequestSpec::resolve(
                state.kind,
                operation,
                &state.input,
            ))]
        }
        Msg::DispatchSettled(outcome) => {
            if !state.dispatch_slot_held() {
                return (state, Vec::new());
            }
            state.status = match outcome {
                Outcome::Output(output) => Status::Success(output),
                Outcome::Failed(message) => Status::Failure(message),
            };
            Vec::new()
        }
    };

    (state, effects)
}
