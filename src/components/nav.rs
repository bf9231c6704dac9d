use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::app::ViewProps;
use crate::model::LoginRequest;
use crate::services::Route;
use crate::services::navigation::go_home;
use crate::state::CollapseState;
use crate::util::input_value;

#[function_component(Nav)]
pub fn nav(props: &ViewProps) -> Html {
    let ctx = &props.ctx;
    let nav_ref = use_node_ref();
    // Read by the document listener, so kept outside render state.
    let collapse = use_mut_ref(CollapseState::default);
    let trigger = use_force_update();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let login_error = use_state_eq(|| None::<String>);

    // Collapse the menu on clicks outside the navbar, for as long as it is mounted.
    {
        let nav_ref = nav_ref.clone();
        let collapse = collapse.clone();
        let trigger = trigger.clone();
        use_effect_with((), move |_| {
            let document = web_sys::window().and_then(|w| w.document());
            let click_cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
                let Some(region) = nav_ref.cast::<web_sys::Element>() else {
                    return;
                };
                let Some(target) = e.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok()) else {
                    return;
                };
                if collapse.borrow_mut().on_document_click(&region, &target) {
                    trigger.force_update();
                }
            }) as Box<dyn FnMut(_)>);
            if let Some(doc) = &document {
                let _ = doc.add_event_listener_with_callback("click", click_cb.as_ref().unchecked_ref());
            }
            move || {
                if let Some(doc) = &document {
                    let _ = doc.remove_event_listener_with_callback("click", click_cb.as_ref().unchecked_ref());
                }
                drop(click_cb);
            }
        });
    }

    let toggle = {
        let collapse = collapse.clone();
        let trigger = trigger.clone();
        Callback::from(move |_: MouseEvent| {
            collapse.borrow_mut().toggle();
            trigger.force_update();
        })
    };
    // Menu entries close the menu themselves.
    let goto = |route: Route| {
        let collapse = collapse.clone();
        let trigger = trigger.clone();
        let navigator = ctx.navigator.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if collapse.borrow_mut().collapse() {
                trigger.force_update();
            }
            spawn_local({
                let nav = navigator.navigate_to(route);
                async move {
                    nav.await;
                }
            });
        })
    };
    let home = {
        let navigator = ctx.navigator.clone();
        let bus = ctx.bus.clone();
        let collapse = collapse.clone();
        let trigger = trigger.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if collapse.borrow_mut().collapse() {
                trigger.force_update();
            }
            spawn_local(go_home(navigator.clone(), bus.clone()));
        })
    };
    let login = {
        let account = ctx.account.clone();
        let set_user = ctx.set_user.clone();
        let navigator = ctx.navigator.clone();
        let username = username.clone();
        let password = password.clone();
        let login_error = login_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let req = LoginRequest {
                username: (*username).trim().to_lowercase(),
                password: (*password).clone(),
            };
            let account = account.clone();
            let set_user = set_user.clone();
            let navigator = navigator.clone();
            let login_error = login_error.clone();
            spawn_local(async move {
                match account.login(&req).await {
                    Ok(user) => {
                        login_error.set(None);
                        set_user.emit(Some(user));
                        navigator.navigate_to(Route::Members).await;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "login failed");
                        login_error.set(Some(err.to_string()));
                    }
                }
            });
        })
    };
    let logout = {
        let account = ctx.account.clone();
        let set_user = ctx.set_user.clone();
        let navigator = ctx.navigator.clone();
        Callback::from(move |_: MouseEvent| {
            account.logout();
            set_user.emit(None);
            spawn_local({
                let nav = navigator.navigate_to(Route::Home);
                async move {
                    nav.await;
                }
            });
        })
    };
    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| username.set(input_value(&e)))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| password.set(input_value(&e)))
    };

    let is_collapsed = collapse.borrow().is_collapsed;
    let menu_style = if is_collapsed { "display:none;" } else { "display:flex; flex-direction:column; gap:8px;" };

    let account_area = match &ctx.user {
        Some(user) => html! {
            <div style="display:flex; align-items:center; gap:8px;">
                <span>{ format!("Welcome {}", user.known_as) }</span>
                <button onclick={logout}>{"Logout"}</button>
            </div>
        },
        None => html! {
            <form onsubmit={login} style="display:flex; gap:6px; align-items:center;">
                <input placeholder="Username" value={(*username).clone()} oninput={on_username} />
                <input type="password" placeholder="Password" value={(*password).clone()} oninput={on_password} />
                <button type="submit">{"Login"}</button>
                if let Some(msg) = &*login_error {
                    <span style="color:#f85149; font-size:12px;">{ msg.clone() }</span>
                }
            </form>
        },
    };

    html! {
        <nav ref={nav_ref} style="position:fixed; top:0; left:0; right:0; background:#161b22; border-bottom:1px solid #30363d; padding:8px 16px; z-index:20;">
            <div style="display:flex; align-items:center; justify-content:space-between; gap:12px;">
                <a href="/" onclick={home} style="font-weight:bold;">{"Dating App"}</a>
                <button onclick={toggle} aria-label="Toggle navigation">{"☰"}</button>
            </div>
            <div style={menu_style}>
                if ctx.user.is_some() {
                    <a href={Route::Members.path()} onclick={goto(Route::Members)}>{"Matches"}</a>
                }
                <a href={Route::LearnMore.path()} onclick={goto(Route::LearnMore)}>{"Learn more"}</a>
                { account_area }
            </div>
        </nav>
    }
}
