use yew::prelude::*;
use yew_router::prelude::*;

use super::auth::CrmContext;
use crate::Route;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Html,
}

/// Header with tab navigation and the signed-in user, then the page.
#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let ctx = use_context::<CrmContext>();
    let current_route = use_route::<Route>().unwrap_or(Route::Dashboard);
    let show_user_menu = use_state(|| false);

    let Some(ctx) = ctx else {
        return html! {};
    };

    let toggle_user_menu = {
        let show_user_menu = show_user_menu.clone();
        Callback::from(move |_| show_user_menu.set(!*show_user_menu))
    };

    let sign_out = {
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| {
            ctx.run(|controller| async move { controller.sign_out().await });
        })
    };

    let email = ctx
        .state
        .user()
        .map(|user| user.email.clone())
        .unwrap_or_default();
    let initial = email
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('U');

    html! {
        <div class="min-h-screen bg-gray-900 flex flex-col">
            <header class="bg-gray-800 border-b border-gray-700 h-14 flex-shrink-0 z-50">
                <div class="h-full flex items-center justify-between px-4">
                    <div class="flex items-center space-x-6">
                        <div class="flex items-center space-x-2">
                            <div class="w-8 h-8 bg-blue-500 rounded flex items-center justify-center">
                                <span class="text-white font-bold text-sm">{"CI"}</span>
                            </div>
                            <span class="text-white font-semibold text-lg">{"Client Tracker"}</span>
                        </div>

                        <nav class="flex items-center space-x-1">
                            <NavTab route={Route::Dashboard} label="Dashboard" current={current_route.clone()} />
                            <NavTab route={Route::Clients} label="Clients" current={current_route.clone()} />
                            <NavTab route={Route::AuditLog} label="Audit Log" current={current_route.clone()} />
                        </nav>
                    </div>

                    <div class="relative">
                        <button
                            onclick={toggle_user_menu}
                            class="flex items-center space-x-2 text-gray-300 hover:text-white"
                        >
                            <div class="w-8 h-8 bg-blue-500 rounded-full flex items-center justify-center">
                                <span class="text-white text-sm font-medium">{initial}</span>
                            </div>
                            <span class="hidden md:inline text-sm">{email.clone()}</span>
                        </button>

                        if *show_user_menu {
                            <div class="absolute right-0 mt-2 w-56 bg-gray-800 rounded-lg shadow-lg border border-gray-700 py-2">
                                <div class="px-4 py-3 border-b border-gray-700">
                                    <p class="text-gray-400 text-sm">{"Signed in as"}</p>
                                    <p class="text-white font-medium truncate">{email}</p>
                                </div>
                                <div class="py-1">
                                    <button
                                        onclick={sign_out}
                                        class="w-full text-left px-4 py-2 text-red-400 hover:bg-gray-700"
                                    >
                                        {"Sign Out"}
                                    </button>
                                </div>
                            </div>
                        }
                    </div>
                </div>
            </header>

            if let Some(warning) = ctx.config_warning() {
                <div class="bg-yellow-900/50 border-b border-yellow-700 text-yellow-200 px-4 py-2 text-sm">
                    {warning}
                </div>
            }

            <ErrorBanner />

            <main class="flex-1 overflow-y-auto">
                {props.children.clone()}
            </main>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct NavTabProps {
    route: Route,
    label: &'static str,
    current: Route,
}

#[function_component(NavTab)]
fn nav_tab(props: &NavTabProps) -> Html {
    let class = if props.route == props.current {
        "px-3 py-1.5 rounded-lg text-sm font-medium bg-blue-600 text-white"
    } else {
        "px-3 py-1.5 rounded-lg text-sm font-medium text-gray-300 hover:bg-gray-700 hover:text-white"
    };

    html! {
        <Link<Route> to={props.route.clone()} classes={class}>
            {props.label}
        </Link<Route>>
    }
}

/// The single dismissible error slot.
#[function_component(ErrorBanner)]
pub fn error_banner() -> Html {
    let Some(ctx) = use_context::<CrmContext>() else {
        return html! {};
    };
    let Some(error) = ctx.state.error.clone() else {
        return html! {};
    };

    let on_dismiss = {
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| ctx.controller.dismiss_error())
    };

    html! {
        <div class="bg-red-900/50 border-b border-red-700 text-red-200 px-4 py-3 flex items-center justify-between">
            <div class="flex items-center">
                <svg class="w-5 h-5 mr-2" fill="currentColor" viewBox="0 0 20 20">
                    <path fill-rule="evenodd" d="M10 18a8 8 0 100-16 8 8 0 000 16zM8.707 7.293a1 1 0 00-1.414 1.414L8.586 10l-1.293 1.293a1 1 0 101.414 1.414L10 11.414l1.293 1.293a1 1 0 001.414-1.414L11.414 10l1.293-1.293a1 1 0 00-1.414-1.414L10 8.586 8.707 7.293z" clip-rule="evenodd"/>
                </svg>
                <span>{error}</span>
            </div>
            <button onclick={on_dismiss} class="text-red-300 hover:text-white px-2">{"Dismiss"}</button>
        </div>
    }
}
