use std::rc::Rc;

use super::{home::Home, learn_more::LearnMore, member_list::MemberList, nav::Nav};
use crate::config::AppConfig;
use crate::model::User;
use crate::services::{AccountService, MembersService, NavState, Navigator, Route};
use crate::state::ResetBus;
use yew::prelude::*;

// Shared services and session, handed to every view as one prop.
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub bus: ResetBus,
    pub navigator: Navigator,
    pub members: MembersService,
    pub account: AccountService,
    pub user: Option<User>,
    pub set_user: Callback<Option<User>>,
}

#[derive(Properties, PartialEq, Clone)]
pub struct ViewProps {
    pub ctx: AppContext,
}

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".into())
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let config = props.config.clone();
    let account = {
        let api_url = config.api_url.clone();
        use_memo((), move |_| AccountService::new(api_url))
    };
    let user = {
        let account = account.clone();
        use_state(move || account.current_user())
    };
    let members = {
        let config = config.clone();
        let user = (*user).clone();
        use_memo((), move |_| MembersService::new(config.api_url.clone(), config.page_size, user.as_ref()))
    };
    let bus = use_memo((), |_| ResetBus::new());
    let nav_state = use_reducer(|| NavState::new(Route::from_path(&current_path())));
    let navigator = {
        let dispatcher = nav_state.dispatcher();
        use_memo((), move |_| Navigator::new(Callback::from(move |route| dispatcher.dispatch(route))))
    };

    // Navigation is complete once the new view has rendered.
    {
        let navigator = navigator.clone();
        let route = nav_state.route;
        use_effect_with(nav_state.seq, move |_| {
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                if current_path() != route.path() {
                    let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(route.path()));
                }
            }
            navigator.complete_pending();
            || ()
        });
    }

    let set_user = {
        let user = user.clone();
        let members = members.clone();
        Callback::from(move |next: Option<User>| {
            members.set_user(next.as_ref());
            user.set(next);
        })
    };

    let ctx = AppContext {
        config: config.clone(),
        bus: (*bus).clone(),
        navigator: (*navigator).clone(),
        members: (*members).clone(),
        account: (*account).clone(),
        user: (*user).clone(),
        set_user,
    };

    let content = match nav_state.route {
        Route::Home => html! { <Home ctx={ctx.clone()} /> },
        Route::Members if user.is_none() => html! { <Home ctx={ctx.clone()} /> },
        Route::Members => html! { <MemberList ctx={ctx.clone()} /> },
        Route::LearnMore => html! { <LearnMore /> },
    };

    html! {
        <>
            <Nav ctx={ctx} />
            <main style="margin-top:64px; padding:0 16px;">{ content }</main>
        </>
    }
}
