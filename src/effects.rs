use crate::backend::Dispatcher;
use crate::controller::{Effect, Msg};

/// Runs one effect to completion and returns the message that reports it.
pub async fn execute(dispatcher: &Dispatcher, effect: Effect) -> Msg {
    match effect {
        Effect::Dispatch(spec) => Msg::DispatchSettled(dispatcher.dispatch(&spec).await),
    }
}
