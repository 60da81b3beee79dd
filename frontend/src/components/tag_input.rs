use crm_shared::{Tag, TagEditor, TagField};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TagInputProps {
    pub field: TagField,
    /// Initial tags; later edits flow out through `on_change`.
    pub tags: Vec<Tag>,
    pub on_change: Callback<Vec<Tag>>,
}

#[function_component(TagInput)]
pub fn tag_input(props: &TagInputProps) -> Html {
    let editor = use_state(|| TagEditor::from_tags(props.tags.clone()));

    let update = {
        let editor = editor.clone();
        let on_change = props.on_change.clone();
        move |next: TagEditor| {
            on_change.emit(next.tags().to_vec());
            editor.set(next);
        }
    };

    let oninput = {
        let editor = editor.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*editor).clone();
            next.set_input(input.value());
            editor.set(next);
        })
    };

    // Enter adds the tag instead of submitting the surrounding form
    let onkeydown = {
        let editor = editor.clone();
        let update = update.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() != "Enter" {
                return;
            }
            e.prevent_default();
            let mut next = (*editor).clone();
            if next.confirm() {
                update(next);
            } else {
                editor.set(next);
            }
        })
    };

    let tags = editor.tags().to_vec();

    html! {
        <div>
            <label class="block text-sm font-medium text-gray-300 mb-1">{props.field.label()}</label>
            <input
                type="text"
                class="w-full px-3 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white placeholder-gray-400 focus:outline-none focus:ring-2 focus:ring-blue-500"
                placeholder={props.field.placeholder()}
                value={editor.input().to_string()}
                {oninput}
                {onkeydown}
            />
            if !tags.is_empty() {
                <div class="mt-2 space-y-2">
                    { for tags.into_iter().enumerate().map(|(index, tag)| {
                        let on_remove = {
                            let editor = editor.clone();
                            let update = update.clone();
                            Callback::from(move |_: MouseEvent| {
                                let mut next = (*editor).clone();
                                if next.remove(index).is_some() {
                                    update(next);
                                }
                            })
                        };
                        let on_comment = {
                            let editor = editor.clone();
                            let update = update.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                let mut next = (*editor).clone();
                                if next.set_comment(index, input.value()) {
                                    update(next);
                                }
                            })
                        };
                        html! {
                            <div key={format!("{}-{}", index, tag.value)} class="flex items-center space-x-2">
                                <span class="inline-flex items-center bg-blue-900/50 text-blue-200 text-sm px-2 py-1 rounded">
                                    {&tag.value}
                                    <button type="button" onclick={on_remove} class="ml-2 text-blue-300 hover:text-white">{"×"}</button>
                                </span>
                                <input
                                    type="text"
                                    class="flex-1 px-2 py-1 bg-gray-700 border border-gray-600 rounded text-sm text-white placeholder-gray-500"
                                    placeholder="Comment (optional)"
                                    value={tag.comment.clone()}
                                    oninput={on_comment}
                                />
                            </div>
                        }
                    }) }
                </div>
            }
        </div>
    }
}
