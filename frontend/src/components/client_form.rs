use std::rc::Rc;

use crm_shared::{Client, ClientDraft, ClientStatus, SaveTarget, Tag, TagField};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use super::auth::CrmContext;
use super::tag_input::TagInput;

enum DraftAction {
    Name(String),
    Status(ClientStatus),
    Tags(TagField, Vec<Tag>),
    Notes(String),
    Comments(String),
}

#[derive(Default, PartialEq)]
struct DraftState(ClientDraft);

impl Reducible for DraftState {
    type Action = DraftAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut draft = self.0.clone();
        match action {
            DraftAction::Name(name) => draft.name = name,
            DraftAction::Status(status) => draft.status = status,
            DraftAction::Tags(field, tags) => draft.set_tags(field, tags),
            DraftAction::Notes(notes) => draft.notes = notes,
            DraftAction::Comments(comments) => draft.comments = comments,
        }
        Rc::new(Self(draft))
    }
}

#[derive(Properties, PartialEq)]
pub struct ClientFormProps {
    /// `None` opens an empty form for a new client.
    pub client: Option<Client>,
    pub on_close: Callback<()>,
}

/// Modal record editor for creating or editing a client.
#[function_component(ClientForm)]
pub fn client_form(props: &ClientFormProps) -> Html {
    let ctx = use_context::<CrmContext>();
    let draft = use_reducer(|| {
        DraftState(
            props
                .client
                .as_ref()
                .map(ClientDraft::from_client)
                .unwrap_or_default(),
        )
    });
    let validation_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let Some(ctx) = ctx else {
        return html! {};
    };

    let target = SaveTarget::for_client(props.client.as_ref());
    let title = if target.is_new() { "Add Client" } else { "Edit Client" };

    let onsubmit = {
        let draft = draft.clone();
        let validation_error = validation_error.clone();
        let saving = saving.clone();
        let on_close = props.on_close.clone();
        let target = target.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match draft.0.submit(target.clone()) {
                Ok(request) => request,
                Err(err) => {
                    validation_error.set(Some(err.to_string()));
                    return;
                }
            };
            validation_error.set(None);
            saving.set(true);

            let saving = saving.clone();
            let on_close = on_close.clone();
            ctx.run(move |controller| async move {
                let saved = controller.save_client(request).await.is_ok();
                saving.set(false);
                if saved {
                    on_close.emit(());
                }
            });
        })
    };

    let on_name = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.dispatch(DraftAction::Name(input.value()));
        })
    };

    let on_status = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            draft.dispatch(DraftAction::Status(ClientStatus::from(select.value())));
        })
    };

    let on_notes = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            draft.dispatch(DraftAction::Notes(input.value()));
        })
    };

    let on_comments = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            draft.dispatch(DraftAction::Comments(input.value()));
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let current = &draft.0;
    // Unknown stored statuses stay selectable so editing does not rewrite them
    let mut statuses = ClientStatus::SELECTABLE.to_vec();
    if !statuses.contains(&current.status) {
        statuses.push(current.status.clone());
    }

    html! {
        <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-50 p-4">
            <div class="bg-gray-800 rounded-lg border border-gray-700 w-full max-w-2xl max-h-full overflow-y-auto">
                <div class="px-6 py-4 border-b border-gray-700 flex items-center justify-between">
                    <h2 class="text-xl font-semibold text-white">{title}</h2>
                    <button type="button" onclick={on_cancel.clone()} class="text-gray-400 hover:text-white">{"×"}</button>
                </div>

                <form class="p-6 space-y-4" {onsubmit}>
                    <div>
                        <label class="block text-sm font-medium text-gray-300 mb-1">{"Client Name *"}</label>
                        <input
                            type="text"
                            class="w-full px-3 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white placeholder-gray-400 focus:outline-none focus:ring-2 focus:ring-blue-500"
                            placeholder="Client name"
                            value={current.name.clone()}
                            oninput={on_name}
                        />
                        if let Some(error) = (*validation_error).clone() {
                            <p class="mt-1 text-sm text-red-400">{error}</p>
                        }
                    </div>

                    <div>
                        <label class="block text-sm font-medium text-gray-300 mb-1">{"Status"}</label>
                        <select
                            class="w-full px-3 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white"
                            onchange={on_status}
                        >
                            { for statuses.iter().map(|status| html! {
                                <option value={status.as_str().to_string()} selected={*status == current.status}>
                                    {status.as_str()}
                                </option>
                            }) }
                        </select>
                    </div>

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        { for TagField::ALL.iter().map(|field| {
                            let field = *field;
                            let on_change = {
                                let draft = draft.clone();
                                Callback::from(move |tags: Vec<Tag>| draft.dispatch(DraftAction::Tags(field, tags)))
                            };
                            html! {
                                <TagInput
                                    key={field.label()}
                                    {field}
                                    tags={current.tags(field).to_vec()}
                                    {on_change}
                                />
                            }
                        }) }
                    </div>

                    <div>
                        <label class="block text-sm font-medium text-gray-300 mb-1">{"Notes"}</label>
                        <textarea
                            rows="3"
                            class="w-full px-3 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white"
                            value={current.notes.clone()}
                            oninput={on_notes}
                        />
                    </div>

                    <div>
                        <label class="block text-sm font-medium text-gray-300 mb-1">{"Comments"}</label>
                        <textarea
                            rows="3"
                            class="w-full px-3 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white"
                            value={current.comments.clone()}
                            oninput={on_comments}
                        />
                    </div>

                    <div class="flex justify-end space-x-3 pt-2">
                        <button
                            type="button"
                            onclick={on_cancel}
                            class="px-4 py-2 rounded-lg text-gray-300 hover:bg-gray-700"
                        >
                            {"Cancel"}
                        </button>
                        <button
                            type="submit"
                            disabled={*saving}
                            class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded-lg disabled:opacity-50"
                        >
                            if *saving { {"Saving..."} } else { {"Save Client"} }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
