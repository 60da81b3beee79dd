// Clients page: searchable, sortable, paginated list with the record editor

use std::rc::Rc;

use crm_shared::listing::SEARCH_DEBOUNCE_MS;
use crm_shared::{Client, ClientQuery, Paginator, SortDirection, SortField};
use gloo_timers::callback::Timeout;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::auth::CrmContext;
use crate::components::client_detail::ClientDetail;
use crate::components::client_form::ClientForm;
use crate::components::pagination_controls::PaginationControls;
use crate::utils::{SameList, format_date};

#[derive(Clone, PartialEq)]
enum Panel {
    Closed,
    Form(Option<Client>),
    Detail(String),
}

#[function_component(ClientsPage)]
pub fn clients_page() -> Html {
    let ctx = use_context::<CrmContext>();
    let search_input = use_state(String::new);
    let search = use_state(String::new);
    let sort_field = use_state(SortField::default);
    let sort_direction = use_state(SortDirection::default);
    let paginator = use_state_eq(Paginator::default);
    let panel = use_state(|| Panel::Closed);
    let debounce = use_mut_ref(|| None::<Timeout>);

    let clients: Rc<Vec<Client>> = ctx
        .as_ref()
        .map(|ctx| ctx.state.clients.clone())
        .unwrap_or_default();
    let query = ClientQuery::new((*search).clone(), *sort_field, *sort_direction);
    let filtered = use_memo((SameList(clients.clone()), query), |(clients, query)| {
        query.apply(&clients.0)
    });

    // Back to the first page whenever the visible set changes size
    {
        let paginator = paginator.clone();
        use_effect_with(filtered.len(), move |total| {
            let mut next = *paginator;
            next.reset_if_changed(*total);
            paginator.set(next);
            || ()
        });
    }

    let Some(ctx) = ctx else {
        return html! {};
    };

    let on_search = {
        let search_input = search_input.clone();
        let search = search.clone();
        let debounce = debounce.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            search_input.set(value.clone());

            // Replacing the pending timeout cancels it
            let search = search.clone();
            *debounce.borrow_mut() = Some(Timeout::new(SEARCH_DEBOUNCE_MS, move || search.set(value)));
        })
    };

    let on_sort_field = {
        let sort_field = sort_field.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(field) = SortField::parse(&select.value()) {
                sort_field.set(field);
            }
        })
    };

    let on_toggle_direction = {
        let sort_direction = sort_direction.clone();
        Callback::from(move |_: MouseEvent| sort_direction.set(sort_direction.toggled()))
    };

    let total = filtered.len();
    let on_page = {
        let paginator = paginator.clone();
        Callback::from(move |page: usize| {
            let mut next = *paginator;
            next.go_to_page(page, total);
            paginator.set(next);
        })
    };

    let on_prev = {
        let paginator = paginator.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = *paginator;
            next.prev_page();
            paginator.set(next);
        })
    };

    let on_next = {
        let paginator = paginator.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = *paginator;
            next.next_page(total);
            paginator.set(next);
        })
    };

    let open_panel = |next: Panel| {
        let panel = panel.clone();
        Callback::from(move |_: MouseEvent| panel.set(next.clone()))
    };

    let close_panel = {
        let panel = panel.clone();
        Callback::from(move |_: ()| panel.set(Panel::Closed))
    };

    let edit_from_detail = {
        let panel = panel.clone();
        Callback::from(move |client: Client| panel.set(Panel::Form(Some(client))))
    };

    let on_delete = |client: &Client| {
        let ctx = ctx.clone();
        let id = client.id.clone();
        let name = client.name.clone();
        Callback::from(move |_: MouseEvent| {
            if !gloo::dialogs::confirm(&format!("Are you sure you want to delete {}?", name)) {
                return;
            }
            let id = id.clone();
            ctx.run(move |controller| async move {
                // Failures are reported through the error banner
                let _ = controller.delete_client(&id).await;
            });
        })
    };

    let page = paginator.page(&filtered);

    html! {
        <div class="p-6 space-y-4">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-bold text-white">{"Clients"}</h1>
                    if !search.is_empty() {
                        <p class="text-sm text-gray-400">
                            {format!("Showing {} of {} clients", filtered.len(), clients.len())}
                        </p>
                    }
                </div>
                <button
                    onclick={open_panel(Panel::Form(None))}
                    class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded-lg flex items-center space-x-1"
                >
                    <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 4v16m8-8H4"/>
                    </svg>
                    <span>{"Add Client"}</span>
                </button>
            </div>

            <div class="flex flex-col md:flex-row md:items-center gap-3">
                <div class="relative flex-1">
                    <svg class="absolute left-3 top-1/2 transform -translate-y-1/2 w-4 h-4 text-gray-400" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M21 21l-6-6m2-5a7 7 0 11-14 0 7 7 0 0114 0z"/>
                    </svg>
                    <input
                        type="text"
                        placeholder="Search by name, status, SSO or TMC..."
                        value={(*search_input).clone()}
                        oninput={on_search}
                        class="w-full pl-10 pr-4 py-2 bg-gray-800 border border-gray-700 rounded-lg text-sm text-white placeholder-gray-500"
                    />
                </div>
                <div class="flex items-center space-x-2">
                    <label class="text-sm text-gray-400">{"Sort by"}</label>
                    <select
                        onchange={on_sort_field}
                        class="px-3 py-2 bg-gray-800 border border-gray-700 rounded-lg text-sm text-white"
                    >
                        { for SortField::ALL.iter().map(|field| html! {
                            <option value={field.as_str()} selected={*field == *sort_field}>{field.label()}</option>
                        }) }
                    </select>
                    <button
                        onclick={on_toggle_direction}
                        class="px-3 py-2 bg-gray-800 border border-gray-700 rounded-lg text-sm text-white"
                    >
                        {sort_direction.arrow()}
                    </button>
                </div>
            </div>

            <div class="bg-gray-800 rounded-lg border border-gray-700 overflow-hidden">
                <table class="min-w-full divide-y divide-gray-700">
                    <thead class="bg-gray-900">
                        <tr>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"Name"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"Status"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"SSO Systems"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"TMCs"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"Last Updated"}</th>
                            <th class="px-4 py-3 text-right text-xs font-medium text-gray-400 uppercase">{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-gray-700">
                        { for page.items.iter().map(|client| html! {
                            <tr key={client.id.clone()} class="hover:bg-gray-700/50">
                                <td class="px-4 py-3 text-white font-medium">{&client.name}</td>
                                <td class="px-4 py-3">
                                    <span class={format!("px-2 py-0.5 rounded text-xs font-medium {}", client.status.badge_class())}>
                                        {client.status.as_str()}
                                    </span>
                                </td>
                                <td class="px-4 py-3 text-sm text-gray-300">{tag_list(&client.sso_systems)}</td>
                                <td class="px-4 py-3 text-sm text-gray-300">{tag_list(&client.tmcs)}</td>
                                <td class="px-4 py-3 text-sm text-gray-400">{format_date(client.updated_at)}</td>
                                <td class="px-4 py-3 text-right space-x-2 whitespace-nowrap">
                                    <button onclick={open_panel(Panel::Detail(client.id.clone()))} class="text-blue-400 hover:text-blue-300 text-sm">{"View"}</button>
                                    <button onclick={open_panel(Panel::Form(Some(client.clone())))} class="text-gray-300 hover:text-white text-sm">{"Edit"}</button>
                                    <button onclick={on_delete(client)} class="text-red-400 hover:text-red-300 text-sm">{"Delete"}</button>
                                </td>
                            </tr>
                        }) }
                    </tbody>
                </table>

                if filtered.is_empty() {
                    <div class="p-6 text-center text-gray-400">
                        if clients.is_empty() { {"No clients yet"} } else { {"No clients match your search"} }
                    </div>
                }

                <PaginationControls
                    current_page={page.current_page}
                    total_pages={page.total_pages}
                    start_index={page.start_index}
                    end_index={page.end_index}
                    total_items={page.total_items}
                    has_prev={page.has_prev_page}
                    has_next={page.has_next_page}
                    {on_page}
                    {on_prev}
                    {on_next}
                />
            </div>

            {
                match &*panel {
                    Panel::Closed => html! {},
                    Panel::Form(client) => html! {
                        <ClientForm client={client.clone()} on_close={close_panel.clone()} />
                    },
                    Panel::Detail(id) => match ctx.state.client(id) {
                        Some(client) => html! {
                            <ClientDetail client={client.clone()} on_close={close_panel.clone()} on_edit={edit_from_detail} />
                        },
                        None => html! {},
                    },
                }
            }
        </div>
    }
}

fn tag_list(tags: &[crm_shared::Tag]) -> String {
    if tags.is_empty() {
        return "-".to_string();
    }
    tags.iter()
        .map(|tag| tag.value.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
