use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AdminIntent, AdminVm, QuestionRowVm};

#[component]
pub fn AdminView() -> Element {
    let ctx = use_context::<AppContext>();
    let admin = ctx.admin();

    let mut vm = use_signal(AdminVm::new);
    let busy = use_signal(|| false);

    let admin_for_resource = admin.clone();
    let mut resource = use_resource(move || {
        let admin = admin_for_resource.clone();
        let mut vm = vm;

        async move {
            let records = admin.list_questions().await.map_err(ViewError::from)?;
            vm.write().set_records(records);
            Ok::<_, ViewError>(())
        }
    });

    let dispatch = {
        let admin = admin.clone();
        use_callback(move |intent: AdminIntent| {
            let mut vm = vm;
            let mut busy = busy;

            match intent {
                AdminIntent::Edit(index) => vm.write().edit(index),
                AdminIntent::CancelEdit => vm.write().cancel_edit(),
                AdminIntent::Submit | AdminIntent::Delete(_) => {
                    if *busy.peek() {
                        return;
                    }
                    busy.set(true);
                    let admin = admin.clone();
                    spawn(async move {
                        let mut local = AdminVm::clone(&vm.peek());
                        let outcome = match intent {
                            AdminIntent::Delete(index) => local.delete(&admin, index).await,
                            _ => local.submit(&admin).await,
                        };
                        if let Err(err) = outcome {
                            tracing::debug!(?intent, error = err.message(), "admin action failed");
                        }
                        vm.set(local);
                        busy.set(false);
                    });
                }
            }
        })
    };

    let state = view_state_from_resource(resource);
    let busy_now = busy();
    let current = AdminVm::clone(&vm.read());
    let rows = current.rows();
    let form = current.form().clone();
    let editing = current.editing().is_some();
    let form_title = if editing { "Edit question" } else { "New question" };
    let error_text = current.error().map(str::to_owned);

    rsx! {
        div { class: "page page--admin",
            h2 { "Manage questions" }
            section { class: "admin-list-section",
                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { "Loading questions..." }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "error", "{err.message()}" }
                        button {
                            class: "secondary",
                            onclick: move |_| resource.restart(),
                            "Retry"
                        }
                    },
                    ViewState::Ready(()) => rsx! {
                        QuestionList { rows, busy: busy_now, on_intent: dispatch }
                    },
                }
            }
            form {
                class: "admin-form",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    dispatch.call(AdminIntent::Submit);
                },
                h3 { "{form_title}" }
                label { class: "field-label", r#for: "admin-prompt", "Prompt" }
                input {
                    id: "admin-prompt",
                    r#type: "text",
                    value: "{form.prompt}",
                    disabled: busy_now,
                    oninput: move |evt| vm.write().form_mut().prompt = evt.value(),
                }
                label { class: "field-label", r#for: "admin-choices", "Choices (one per line)" }
                textarea {
                    id: "admin-choices",
                    rows: "4",
                    value: "{form.choices_text}",
                    disabled: busy_now,
                    oninput: move |evt| vm.write().form_mut().choices_text = evt.value(),
                }
                label { class: "field-label", r#for: "admin-index", "Correct index (starting at 0)" }
                input {
                    id: "admin-index",
                    r#type: "number",
                    min: "0",
                    value: "{form.correct_index}",
                    disabled: busy_now,
                    oninput: move |evt| vm.write().form_mut().correct_index = evt.value(),
                }
                label { class: "field-label", r#for: "admin-explanation", "Explanation (optional)" }
                textarea {
                    id: "admin-explanation",
                    rows: "2",
                    value: "{form.explanation}",
                    disabled: busy_now,
                    oninput: move |evt| vm.write().form_mut().explanation = evt.value(),
                }
                {error_text.map(|text| rsx! { p { class: "error", role: "alert", "{text}" } })}
                div { class: "admin-form-actions",
                    button {
                        class: "primary",
                        r#type: "submit",
                        disabled: busy_now,
                        "{current.submit_label()}"
                    }
                    if editing {
                        button {
                            class: "secondary",
                            r#type: "button",
                            disabled: busy_now,
                            onclick: move |_| dispatch.call(AdminIntent::CancelEdit),
                            "Cancel"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionList(
    rows: Vec<QuestionRowVm>,
    busy: bool,
    on_intent: EventHandler<AdminIntent>,
) -> Element {
    if rows.is_empty() {
        return rsx! {
            p { class: "empty", "No questions yet." }
        };
    }
    rsx! {
        ul { class: "admin-list",
            for row in rows {
                QuestionRow { key: "{row.index}", row: row.clone(), busy, on_intent }
            }
        }
    }
}

#[component]
fn QuestionRow(row: QuestionRowVm, busy: bool, on_intent: EventHandler<AdminIntent>) -> Element {
    let index = row.index;
    rsx! {
        li { class: "admin-row",
            div { class: "admin-row-text",
                span { class: "admin-row-prompt", "{row.prompt}" }
                span { class: "admin-row-meta", "{row.choice_count}" }
                {row.answer.map(|answer| rsx! { span { class: "admin-row-meta", "Answer: {answer}" } })}
            }
            div { class: "admin-row-actions",
                button {
                    class: "secondary",
                    disabled: busy,
                    onclick: move |_| on_intent.call(AdminIntent::Edit(index)),
                    "Edit"
                }
                button {
                    class: "danger",
                    disabled: busy || !row.has_id,
                    onclick: move |_| on_intent.call(AdminIntent::Delete(index)),
                    "Delete"
                }
            }
        }
    }
}
