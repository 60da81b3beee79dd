use crm_shared::{Client, ClientComment, TagField, audit};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;
use yew_hooks::{UseAsyncOptions, use_async_with_options};

use super::auth::CrmContext;
use crate::utils::format_timestamp;

#[derive(Properties, PartialEq)]
pub struct ClientDetailProps {
    pub client: Client,
    pub on_close: Callback<()>,
    pub on_edit: Callback<Client>,
}

/// Read-only view of one client with its comment thread and audit history.
#[function_component(ClientDetail)]
pub fn client_detail(props: &ClientDetailProps) -> Html {
    let ctx = use_context::<CrmContext>();
    let new_comment = use_state(String::new);
    let posting = use_state(|| false);

    let comments = {
        let controller = ctx.as_ref().map(|ctx| ctx.controller.clone());
        let client_id = props.client.id.clone();
        use_async_with_options(
            async move {
                let thread = match controller {
                    Some(controller) => controller.load_comments(&client_id).await,
                    None => Vec::new(),
                };
                Ok::<Vec<ClientComment>, ()>(thread)
            },
            UseAsyncOptions::enable_auto(),
        )
    };

    let Some(ctx) = ctx else {
        return html! {};
    };
    let client = &props.client;

    let on_comment_input = {
        let new_comment = new_comment.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            new_comment.set(input.value());
        })
    };

    let on_add_comment = {
        let ctx = ctx.clone();
        let new_comment = new_comment.clone();
        let posting = posting.clone();
        let comments = comments.clone();
        let client_id = client.id.clone();
        Callback::from(move |_: MouseEvent| {
            let text = (*new_comment).clone();
            if text.trim().is_empty() {
                return;
            }
            posting.set(true);

            let new_comment = new_comment.clone();
            let posting = posting.clone();
            let comments = comments.clone();
            let client_id = client_id.clone();
            ctx.run(move |controller| async move {
                if controller.add_comment(&client_id, &text).await.is_ok() {
                    new_comment.set(String::new());
                    comments.run();
                }
                posting.set(false);
            });
        })
    };

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let on_edit = {
        let on_edit = props.on_edit.clone();
        let client = client.clone();
        Callback::from(move |_: MouseEvent| on_edit.emit(client.clone()))
    };

    let history = audit::for_client(&ctx.state.audit_log, &client.id);
    let thread = comments.data.clone().unwrap_or_default();

    html! {
        <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-50 p-4">
            <div class="bg-gray-800 rounded-lg border border-gray-700 w-full max-w-3xl max-h-full overflow-y-auto">
                <div class="px-6 py-4 border-b border-gray-700 flex items-center justify-between">
                    <div class="flex items-center space-x-3">
                        <h2 class="text-xl font-semibold text-white">{&client.name}</h2>
                        <span class={format!("px-2 py-0.5 rounded text-xs font-medium {}", client.status.badge_class())}>
                            {client.status.as_str()}
                        </span>
                    </div>
                    <div class="flex items-center space-x-2">
                        <button onclick={on_edit} class="bg-blue-600 hover:bg-blue-700 text-white px-3 py-1.5 rounded-lg text-sm">{"Edit"}</button>
                        <button onclick={on_close} class="text-gray-400 hover:text-white px-2">{"×"}</button>
                    </div>
                </div>

                <div class="p-6 space-y-6">
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        { for TagField::ALL.iter().map(|field| html! {
                            <div class="bg-gray-900 rounded-lg p-4">
                                <h3 class="text-sm font-medium text-gray-400 mb-2">{field.label()}</h3>
                                if client.tags(*field).is_empty() {
                                    <p class="text-gray-500 text-sm">{"None"}</p>
                                } else {
                                    <ul class="space-y-1">
                                        { for client.tags(*field).iter().map(|tag| html! {
                                            <li class="text-sm">
                                                <span class="text-white">{&tag.value}</span>
                                                if !tag.comment.is_empty() {
                                                    <span class="text-gray-400">{format!(" - {}", tag.comment)}</span>
                                                }
                                            </li>
                                        }) }
                                    </ul>
                                }
                            </div>
                        }) }
                    </div>

                    if !client.notes.is_empty() {
                        <div>
                            <h3 class="text-sm font-medium text-gray-400 mb-1">{"Notes"}</h3>
                            <p class="text-gray-200 whitespace-pre-wrap">{&client.notes}</p>
                        </div>
                    }
                    if !client.comments.is_empty() {
                        <div>
                            <h3 class="text-sm font-medium text-gray-400 mb-1">{"Comments"}</h3>
                            <p class="text-gray-200 whitespace-pre-wrap">{&client.comments}</p>
                        </div>
                    }

                    <div>
                        <h3 class="text-lg font-medium text-white mb-3">{"Comment Thread"}</h3>
                        if comments.loading {
                            <p class="text-gray-400 text-sm">{"Loading comments..."}</p>
                        } else if thread.is_empty() {
                            <p class="text-gray-500 text-sm">{"No comments yet"}</p>
                        }
                        <div class="space-y-3">
                            { for thread.iter().map(|comment| html! {
                                <div class="bg-gray-900 rounded-lg p-3">
                                    <p class="text-gray-200 whitespace-pre-wrap">{&comment.comment}</p>
                                    <p class="text-gray-500 text-xs mt-1">
                                        {format!("{} - {}", comment.user_email, format_timestamp(comment.created_at))}
                                    </p>
                                </div>
                            }) }
                        </div>
                        <div class="mt-3 flex items-start space-x-2">
                            <textarea
                                rows="2"
                                class="flex-1 px-3 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white placeholder-gray-400"
                                placeholder="Add a comment"
                                value={(*new_comment).clone()}
                                oninput={on_comment_input}
                            />
                            <button
                                onclick={on_add_comment}
                                disabled={*posting}
                                class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded-lg disabled:opacity-50"
                            >
                                {"Add"}
                            </button>
                        </div>
                    </div>

                    <div>
                        <h3 class="text-lg font-medium text-white mb-3">{"History"}</h3>
                        if history.is_empty() {
                            <p class="text-gray-500 text-sm">{"No recorded changes"}</p>
                        } else {
                            <ul class="divide-y divide-gray-700">
                                { for history.iter().map(|entry| html! {
                                    <li class="py-2">
                                        <div class="flex items-center justify-between">
                                            <span class="text-sm text-white">{entry.action.as_str()}</span>
                                            <span class="text-xs text-gray-500">{format_timestamp(entry.created_at)}</span>
                                        </div>
                                        <p class="text-sm text-gray-400">{&entry.new_value}</p>
                                    </li>
                                }) }
                            </ul>
                        }
                    </div>
                </div>
            </div>
        </div>
    }
}
