//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::{navbar::Navbar, route_guard::RouteGuard};
use crate::net::api::ApiClient;
use crate::net::transport::default_transport;
use crate::pages::{
    dashboard::DashboardPage, home::HomePage, login::LoginPage, not_found::NotFoundPage, register::RegisterPage,
    reset::ResetPage,
};
use crate::query::QueryClient;
use crate::state::auth::{AuthStore, provide_auth};
use crate::state::notice::NoticeState;
use crate::util::config::AppConfig;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the session store for this build target and sets up routing behind
/// the navigation guard.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::load();
    let store = AuthStore::new(ApiClient::new(default_transport(&config)), QueryClient::new());
    provide_auth(store);
    provide_context(RwSignal::new(NoticeState::default()));

    view! {
        <Stylesheet id="leptos" href="/pkg/gatehouse.css"/>
        <Title text="Gatehouse"/>

        <Router>
            <Navbar/>
            <main>
                <RouteGuard>
                    <Routes fallback=|| view! { <NotFoundPage/> }>
                        <Route path=StaticSegment("") view=HomePage/>
                        <Route path=(StaticSegment("auth"), StaticSegment("login")) view=LoginPage/>
                        <Route path=(StaticSegment("auth"), StaticSegment("register")) view=RegisterPage/>
                        <Route path=(StaticSegment("auth"), StaticSegment("reset")) view=ResetPage/>
                        <Route path=StaticSegment("dashboard") view=DashboardPage/>
                    </Routes>
                </RouteGuard>
            </main>
        </Router>
    }
}
