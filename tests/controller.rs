use pretty_assertions::assert_eq;
use recast::{
    update, AppState, ContentKind, Effect, Msg, Operation, Outcome, RequestSpec, Status,
};

fn typed(input: &str) -> AppState {
    let (state, effects) = update(AppState::new(), Msg::InputChanged(input.to_string()));
    assert!(effects.is_empty());
    state
}

#[test]
fn request_moves_to_loading_and_emits_dispatch() {
    let state = typed("Some text.");
    let (state, effects) = update(state, Msg::OperationRequested(Operation::Paraphrase));

    assert_eq!(state.status(), &Status::Loading);
    assert!(state.dispatch_slot_held());
    assert_eq!(
        effects,
        vec![Effect::Dispatch(RequestSpec::resolve(
            ContentKind::PlainText,
            Operation::Paraphrase,
            "Some text."
        ))]
    );
}

#[test]
fn second_request_while_pending_is_ignored() {
    let state = typed("Some text.");
    let (state, _) = update(state, Msg::OperationRequested(Operation::Paraphrase));
    let (state, effects) = update(state, Msg::OperationRequested(Operation::Summarize));

    assert!(effects.is_empty());
    assert_eq!(state.status(), &Status::Loading);
    assert!(!state.view().triggers_enabled);

    // Once settled the slot is free again.
    let (state, _) = update(
        state,
        Msg::DispatchSettled(Outcome::Output("paraphrased".to_string())),
    );
    let (_, effects) = update(state, Msg::OperationRequested(Operation::Summarize));
    assert_eq!(effects.len(), 1);
}

#[test]
fn success_sets_output_only() {
    let state = typed("Some text.");
    let (state, _) = update(state, Msg::OperationRequested(Operation::Summarize));
    let (state, _) = update(state, Msg::DispatchSettled(Outcome::Output("Y".to_string())));

    let view = state.view();
    assert_eq!(view.output(), Some("Y"));
    assert_eq!(view.error(), None);
    assert!(view.triggers_enabled);
}

#[test]
fn failure_sets_error_only() {
    let state = typed("Some text.");
    let (state, _) = update(state, Msg::OperationRequested(Operation::Summarize));
    let (state, _) = update(
        state,
        Msg::DispatchSettled(Outcome::Failed("bad input".to_string())),
    );

    let view = state.view();
    assert_eq!(view.error(), Some("bad input"));
    assert_eq!(view.output(), None);
}

#[test]
fn loading_clears_previous_result() {
    let state = typed("Some text.");
    let (state, _) = update(state, Msg::OperationRequested(Operation::Summarize));
    let (state, _) = update(
        state,
        Msg::DispatchSettled(Outcome::Failed("bad input".to_string())),
    );
    let (state, _) = update(state, Msg::OperationRequested(Operation::Paraphrase));

    let view = state.view();
    assert_eq!(view.error(), None);
    assert_eq!(view.output(), None);
    assert_eq!(view.status, Status::Loading);
}

#[test]
fn empty_input_never_dispatches() {
    let (state, effects) = update(
        AppState::new(),
        Msg::OperationRequested(Operation::Paraphrase),
    );
    assert!(effects.is_empty());
    assert_eq!(state.status(), &Status::Idle);
    assert!(!state.view().triggers_enabled);
}

#[test]
fn settle_without_pending_dispatch_is_ignored() {
    let state = typed("Some text.");
    let (state, effects) = update(
        state,
        Msg::DispatchSettled(Outcome::Output("stray".to_string())),
    );
    assert!(effects.is_empty());
    assert_eq!(state.status(), &Status::Idle);
}

#[test]
fn switching_kind_keeps_input_and_changes_route() {
    let state = typed("https://example.com/article");
    let (state, _) = update(state, Msg::ContentKindToggled);
    assert_eq!(state.kind(), ContentKind::ArticleUrl);
    assert_eq!(state.input(), "https://example.com/article");

    let (_, effects) = update(state, Msg::OperationRequested(Operation::Summarize));
    assert_eq!(
        effects,
        vec![Effect::Dispatch(RequestSpec::resolve(
            ContentKind::ArticleUrl,
            Operation::Summarize,
            "https://example.com/article"
        ))]
    );
}

#[test]
fn editing_while_loading_does_not_touch_the_pending_call() {
    let state = typed("first");
    let (state, _) = update(state, Msg::OperationRequested(Operation::Paraphrase));
    let (state, effects) = update(state, Msg::InputChanged("second".to_string()));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::ContentKindSelected(ContentKind::ArticleUrl));
    assert!(effects.is_empty());

    assert_eq!(state.status(), &Status::Loading);
    assert_eq!(state.input(), "second");
    assert_eq!(state.kind(), ContentKind::ArticleUrl);
}

#[test]
fn with_input_starts_idle() {
    let state = AppState::with_input(ContentKind::ArticleUrl, "https://example.com");
    assert_eq!(state.status(), &Status::Idle);
    assert!(state.triggers_enabled());
}
