use std::future::Future;
use std::rc::Rc;

use crm_shared::{AppState, Controller};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, StorageEvent};
use yew::prelude::*;
use yew_hooks::use_mount;

use crate::services::{AppController, GlooTimer, SESSION_STORAGE_KEY, SupabaseBackend};

// App context: the latest state snapshot plus the controller that owns I/O
#[derive(Clone)]
pub struct CrmContext {
    pub state: AppState,
    pub controller: Rc<AppController>,
}

impl PartialEq for CrmContext {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && Rc::ptr_eq(&self.controller, &other.controller)
    }
}

impl CrmContext {
    /// Spawns a controller call. Its outcome arrives through the state
    /// subscription, so nothing is returned.
    pub fn run<F, Fut>(&self, task: F)
    where
        F: FnOnce(Rc<AppController>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let controller = self.controller.clone();
        spawn_local(task(controller));
    }

    pub fn config_warning(&self) -> Option<String> {
        self.controller
            .backend()
            .config_error()
            .map(|err| format!("Backend configuration problem: {}", err))
    }
}

#[derive(Properties, PartialEq)]
pub struct CrmProviderProps {
    pub children: Children,
}

#[function_component(CrmProvider)]
pub fn crm_provider(props: &CrmProviderProps) -> Html {
    let controller = use_memo((), |_| {
        let backend = SupabaseBackend::from_env();
        let timeouts = backend.timeouts();
        Controller::new(backend, GlooTimer, timeouts)
    });
    let state = use_state(|| controller.state());

    // Mirror every controller change into component state
    {
        let controller = controller.clone();
        let setter = state.setter();
        use_effect_with((), move |_| {
            controller.subscribe(move |snapshot| setter.set(snapshot.clone()));
            move || controller.unsubscribe()
        });
    }

    {
        let controller = controller.clone();
        use_mount(move || {
            spawn_local(async move { controller.check_session().await });
        });
    }

    // Sign-in and sign-out in other tabs show up as storage events
    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "storage", move |event| {
                    let Some(event) = event.dyn_ref::<StorageEvent>() else {
                        return;
                    };
                    if event.key().as_deref() != Some(SESSION_STORAGE_KEY) {
                        return;
                    }
                    let controller = controller.clone();
                    spawn_local(async move {
                        controller
                            .on_session_change(SupabaseBackend::stored_session())
                            .await;
                    });
                })
            });
            move || drop(listener)
        });
    }

    let context = CrmContext {
        state: (*state).clone(),
        controller,
    };

    html! {
        <ContextProvider<CrmContext> {context}>
            {props.children.clone()}
        </ContextProvider<CrmContext>>
    }
}

#[function_component(LoginForm)]
pub fn login_form() -> Html {
    let ctx = use_context::<CrmContext>();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let loading = use_state(|| false);

    let Some(ctx) = ctx else {
        return html! {};
    };

    let onsubmit = {
        let ctx = ctx.clone();
        let email = email.clone();
        let password = password.clone();
        let loading = loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let email = (*email).clone();
            let password = (*password).clone();
            let loading = loading.clone();
            loading.set(true);

            ctx.run(move |controller| async move {
                // Failures land in the shared error banner
                let _ = controller.sign_in(&email, &password).await;
                loading.set(false);
            });
        })
    };

    let email_oninput = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let password_oninput = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_dismiss = {
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| ctx.controller.dismiss_error())
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-gray-900 py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-8">
                <div>
                    <h2 class="mt-6 text-center text-3xl font-extrabold text-white">
                        {"CI360 Client Tracker"}
                    </h2>
                    <p class="mt-2 text-center text-sm text-gray-400">
                        {"Sign in to manage client onboardings"}
                    </p>
                </div>

                if let Some(warning) = ctx.config_warning() {
                    <div class="bg-yellow-900/50 border border-yellow-700 text-yellow-200 px-4 py-3 rounded-lg text-sm">
                        {warning}
                    </div>
                }

                <form class="mt-8 space-y-6" {onsubmit}>
                    <div class="rounded-md shadow-sm -space-y-px">
                        <div>
                            <label for="email-address" class="sr-only">{"Email address"}</label>
                            <input
                                id="email-address"
                                name="email"
                                type="email"
                                autocomplete="email"
                                required=true
                                class="appearance-none rounded-none relative block w-full px-3 py-2 border border-gray-600 bg-gray-800 placeholder-gray-500 text-white rounded-t-md focus:outline-none focus:ring-blue-500 focus:border-blue-500 focus:z-10 sm:text-sm"
                                placeholder="Email address"
                                value={(*email).clone()}
                                oninput={email_oninput}
                            />
                        </div>
                        <div>
                            <label for="password" class="sr-only">{"Password"}</label>
                            <input
                                id="password"
                                name="password"
                                type="password"
                                autocomplete="current-password"
                                required=true
                                class="appearance-none rounded-none relative block w-full px-3 py-2 border border-gray-600 bg-gray-800 placeholder-gray-500 text-white rounded-b-md focus:outline-none focus:ring-blue-500 focus:border-blue-500 focus:z-10 sm:text-sm"
                                placeholder="Password"
                                value={(*password).clone()}
                                oninput={password_oninput}
                            />
                        </div>
                    </div>

                    if let Some(error) = ctx.state.error.clone() {
                        <div class="bg-red-900/50 border border-red-700 text-red-200 px-4 py-3 rounded-lg flex items-start justify-between">
                            <span>{error}</span>
                            <button type="button" onclick={on_dismiss} class="ml-4 text-red-300 hover:text-white">{"×"}</button>
                        </div>
                    }

                    <div>
                        <button
                            type="submit"
                            disabled={*loading}
                            class="group relative w-full flex justify-center py-2 px-4 border border-transparent text-sm font-medium rounded-md text-white bg-blue-600 hover:bg-blue-700 focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-blue-500 disabled:opacity-50 disabled:cursor-not-allowed"
                        >
                            if *loading {
                                <svg class="animate-spin -ml-1 mr-3 h-5 w-5 text-white" xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24">
                                    <circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4"></circle>
                                    <path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4zm2 5.291A7.962 7.962 0 014 12H0c0 3.042 1.135 5.824 3 7.938l3-2.647z"></path>
                                </svg>
                                {"Signing in..."}
                            } else {
                                {"Sign in"}
                            }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
