use dioxus::prelude::*;
use dioxus_router::use_navigator;
use trivia_core::model::GamePhase;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{ChoiceVm, FeedbackVm, GameIntent, GameVm};

/// The gameplay request the view is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Starting,
    Selecting(usize),
    Advancing,
}

impl Pending {
    const fn for_intent(intent: GameIntent) -> Option<Self> {
        match intent {
            GameIntent::Start => Some(Self::Starting),
            GameIntent::Select(index) => Some(Self::Selecting(index)),
            GameIntent::Advance => Some(Self::Advancing),
            GameIntent::Restart => None,
        }
    }

    const fn selected(self) -> Option<usize> {
        match self {
            Self::Selecting(index) => Some(index),
            Self::Starting | Self::Advancing => None,
        }
    }
}

#[component]
pub fn PlayView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let game = ctx.game();

    let mut player_name = use_signal(String::new);
    let vm = use_signal(GameVm::new);
    let pending = use_signal(|| None::<Pending>);
    // Bumped on restart; results of requests started before it are dropped.
    let epoch = use_signal(|| 0_u64);

    use_effect(move || {
        if ctx.take_open_admin_on_launch() {
            let _ = navigator.push(Route::Admin {});
        }
    });

    let dispatch = {
        let game = game.clone();
        use_callback(move |intent: GameIntent| {
            let mut vm = vm;
            let mut pending = pending;
            let mut epoch = epoch;

            let Some(action) = Pending::for_intent(intent) else {
                vm.write().restart(&game);
                pending.set(None);
                *epoch.write() += 1;
                return;
            };
            if pending.peek().is_some() {
                return;
            }
            pending.set(Some(action));

            let game = game.clone();
            let name = player_name.peek().to_string();
            let started_in = *epoch.peek();
            spawn(async move {
                let mut local = GameVm::clone(&vm.peek());
                let outcome = match action {
                    Pending::Starting => local.start(&game, &name).await,
                    Pending::Selecting(index) => local.select(&game, index).await.map(|_| ()),
                    Pending::Advancing => local.advance(&game).await,
                };
                if *epoch.peek() != started_in {
                    tracing::debug!(?action, "discarding result of a restarted game");
                    return;
                }
                if let Err(err) = outcome {
                    tracing::debug!(?action, error = err.message(), "game action failed");
                }
                vm.set(local);
                pending.set(None);
            });
        })
    };

    let busy = pending().is_some();
    let mock_mode = game.is_mock_mode();
    let current = GameVm::clone(&vm.read());
    let error_text = current.error().map(str::to_owned);

    let body = match current.phase() {
        GamePhase::Idle | GamePhase::AwaitingQuestion => {
            let name_missing = player_name.read().trim().is_empty();
            let start_label = if busy { "Starting..." } else { "Start game" };
            rsx! {
                form {
                    class: "start-form",
                    onsubmit: move |evt: FormEvent| {
                        evt.prevent_default();
                        dispatch.call(GameIntent::Start);
                    },
                    label { class: "field-label", r#for: "player-name", "Player name" }
                    input {
                        id: "player-name",
                        r#type: "text",
                        placeholder: "Your name",
                        value: "{player_name}",
                        disabled: busy,
                        oninput: move |evt| player_name.set(evt.value()),
                    }
                    button {
                        class: "primary",
                        r#type: "submit",
                        disabled: busy || name_missing,
                        "{start_label}"
                    }
                }
            }
        }
        GamePhase::Playing | GamePhase::Answered => {
            let prompt = current.prompt().unwrap_or_default().to_string();
            let choices = current.choices(pending().and_then(Pending::selected));
            let feedback = current.feedback();
            let can_advance = current.phase() == GamePhase::Answered;
            rsx! {
                div { class: "game-status",
                    span { class: "game-progress", "{current.progress_label()}" }
                    span { class: "game-score", "{current.score_label()}" }
                }
                h2 { class: "question-prompt", "{prompt}" }
                div { class: "choices",
                    for choice in choices {
                        ChoiceButton { key: "{choice.index}", choice: choice.clone(), on_intent: dispatch }
                    }
                }
                {feedback.map(|feedback| rsx! { FeedbackPanel { feedback } })}
                if can_advance {
                    button {
                        class: "primary advance",
                        disabled: busy,
                        onclick: move |_| dispatch.call(GameIntent::Advance),
                        "{current.advance_label()}"
                    }
                }
            }
        }
        GamePhase::Complete => rsx! {
            div { class: "game-complete",
                h2 { "Well played, {current.player_name()}!" }
                p { class: "final-score", "{current.final_score_label()}" }
                button {
                    class: "primary",
                    onclick: move |_| dispatch.call(GameIntent::Restart),
                    "Play again"
                }
            }
        },
    };
    let show_restart = matches!(current.phase(), GamePhase::Playing | GamePhase::Answered);

    rsx! {
        div { class: "page page--play",
            header { class: "page-header",
                h2 { "Play" }
                if mock_mode {
                    span { class: "badge badge--mock", title: "The backend is unavailable; using built-in questions", "Mock mode" }
                }
            }
            {body}
            {error_text.map(|text| rsx! { p { class: "error", role: "alert", "{text}" } })}
            if show_restart {
                button {
                    class: "link restart",
                    onclick: move |_| dispatch.call(GameIntent::Restart),
                    "Restart"
                }
            }
        }
    }
}

#[component]
fn ChoiceButton(choice: ChoiceVm, on_intent: EventHandler<GameIntent>) -> Element {
    let index = choice.index;
    let class = choice.state.class();
    rsx! {
        button {
            class: "{class}",
            disabled: choice.state.is_disabled(),
            onclick: move |_| on_intent.call(GameIntent::Select(index)),
            "{choice.label}"
        }
    }
}

#[component]
fn FeedbackPanel(feedback: FeedbackVm) -> Element {
    let class = if feedback.correct {
        "feedback feedback--correct"
    } else {
        "feedback feedback--incorrect"
    };
    rsx! {
        div { class: "{class}",
            p { class: "feedback-headline", "{feedback.headline}" }
            {feedback.explanation.map(|text| rsx! { p { class: "feedback-explanation", "{text}" } })}
        }
    }
}
