use crm_shared::pagination::{PageLink, page_links};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaginationControlsProps {
    pub current_page: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub total_items: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub on_page: Callback<usize>,
    pub on_prev: Callback<MouseEvent>,
    pub on_next: Callback<MouseEvent>,
}

#[function_component(PaginationControls)]
pub fn pagination_controls(props: &PaginationControlsProps) -> Html {
    if props.total_items == 0 {
        return html! {};
    }

    let go_to = |page: usize| {
        let on_page = props.on_page.clone();
        Callback::from(move |_: MouseEvent| on_page.emit(page))
    };

    let nav_class = "px-3 py-1 rounded text-sm text-gray-300 hover:bg-gray-700 disabled:opacity-40 disabled:cursor-not-allowed";

    html! {
        <div class="flex items-center justify-between px-4 py-3 border-t border-gray-700">
            <p class="text-sm text-gray-400">
                {format!("Showing {}-{} of {}", props.start_index, props.end_index, props.total_items)}
            </p>
            if props.total_pages > 1 {
                <div class="flex items-center space-x-1">
                    <button class={nav_class} disabled={!props.has_prev} onclick={props.on_prev.clone()}>
                        {"Previous"}
                    </button>
                    { for page_links(props.current_page, props.total_pages).into_iter().map(|link| match link {
                        PageLink::Number(page) if page == props.current_page => html! {
                            <span class="px-3 py-1 rounded text-sm bg-blue-600 text-white">{page}</span>
                        },
                        PageLink::Number(page) => html! {
                            <button class="px-3 py-1 rounded text-sm text-gray-300 hover:bg-gray-700" onclick={go_to(page)}>
                                {page}
                            </button>
                        },
                        PageLink::Gap => html! { <span class="px-2 text-gray-500">{"..."}</span> },
                    }) }
                    <button class={nav_class} disabled={!props.has_next} onclick={props.on_next.clone()}>
                        {"Next"}
                    </button>
                </div>
            }
        </div>
    }
}
