//! Wraps the routes and runs the navigation guard on every location change.
//!
//! SYSTEM CONTEXT
//! ==============
//! The wrapped view stays hidden until the guard has approved the current
//! path, so protected pages never render for a visitor who is about to be
//! redirected. Redirects replace the history entry so Back does not return
//! to the denied page.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::auth::use_auth;

#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let pathname = use_location().pathname;
    let navigate = use_navigate();
    let approved = RwSignal::new(None::<String>);

    Effect::new(move || {
        let path = pathname.get();
        let store = auth.store();
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let decision = crate::util::guard::check(&store, &path).await;
            // A newer navigation owns the outcome now.
            if pathname.get_untracked() != path {
                return;
            }
            match decision {
                crate::util::guard::GuardDecision::Proceed => approved.set(Some(path)),
                crate::util::guard::GuardDecision::Redirect(to) => navigate(
                    to,
                    leptos_router::NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                ),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (path, store, navigate, approved);
    });

    let ready = move || approved.with(|p| p.as_deref() == Some(pathname.get().as_str()));

    view! {
        <Show when=ready fallback=|| view! { <div class="page-loading">"Loading..."</div> }>
            {children()}
        </Show>
    }
}
