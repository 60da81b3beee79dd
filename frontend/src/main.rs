use wasm_bindgen::JsValue;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod logging;
mod pages;
mod services;
mod utils;

use components::{CrmContext, CrmProvider, Layout, LoginForm};
use pages::{audit_log::AuditLogPage, clients::ClientsPage, dashboard::DashboardPage};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/clients")]
    Clients,
    #[at("/audit")]
    AuditLog,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Clients => html! { <ClientsPage /> },
        Route::AuditLog => html! { <AuditLogPage /> },
        Route::NotFound => html! {
            <div class="min-h-full flex items-center justify-center py-24">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-white">{"404"}</h1>
                    <p class="text-xl mt-4 text-gray-400">{"Page Not Found"}</p>
                </div>
            </div>
        },
    }
}

#[function_component(AppRouter)]
fn app_router() -> Html {
    let Some(ctx) = use_context::<CrmContext>() else {
        return html! {};
    };

    if ctx.state.session.is_checking() {
        return html! {
            <div class="min-h-screen flex items-center justify-center bg-gray-900">
                <div class="animate-spin rounded-full h-12 w-12 border-b-2 border-blue-500"></div>
            </div>
        };
    }

    // Anything but an established session lands on the sign-in form
    if ctx.state.user().is_none() {
        return html! { <LoginForm /> };
    }

    html! {
        <BrowserRouter>
            <Layout>
                <Switch<Route> render={switch} />
            </Layout>
        </BrowserRouter>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <CrmProvider>
            <AppRouter />
        </CrmProvider>
    }
}

fn add_stylesheet(href: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no head"))?;

    let link = document.create_element("link")?;
    link.set_attribute("href", href)?;
    link.set_attribute("rel", "stylesheet")?;
    head.append_child(&link)?;
    Ok(())
}

fn main() {
    logging::init();

    if let Err(err) = add_stylesheet("https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css") {
        tracing::warn!(error = ?err, "failed to load stylesheet");
    }

    yew::Renderer::<App>::new().render();
}
