use yew::prelude::*;

use super::app::ViewProps;
use super::register::Register;
use crate::services::Route;
use crate::util::scroll_to_origin_smooth;

#[function_component(Home)]
pub fn home(props: &ViewProps) -> Html {
    let ctx = &props.ctx;
    let register_mode = use_state_eq(|| false);

    // Listen for reset requests while mounted; the subscription is dropped on unmount.
    {
        let register_mode = register_mode.clone();
        use_effect_with(ctx.bus.clone(), move |bus| {
            let sub = bus.subscribe(move || {
                register_mode.set(false);
                scroll_to_origin_smooth();
                Ok(())
            });
            move || sub.unsubscribe()
        });
    }

    let toggle_register = {
        let register_mode = register_mode.clone();
        Callback::from(move |_: MouseEvent| register_mode.set(!*register_mode))
    };
    let cancel_register = {
        let register_mode = register_mode.clone();
        Callback::from(move |mode: bool| register_mode.set(mode))
    };
    let learn_more = {
        let navigator = ctx.navigator.clone();
        Callback::from(move |_: MouseEvent| {
            wasm_bindgen_futures::spawn_local({
                let nav = navigator.navigate_to(Route::LearnMore);
                async move {
                    nav.await;
                }
            });
        })
    };

    if *register_mode {
        return html! {
            <div style="max-width:420px; margin:24px auto;">
                <Register ctx={ctx.clone()} on_cancel={cancel_register} />
            </div>
        };
    }

    html! {
        <div style="text-align:center; padding:48px 12px;">
            <h1>{"Find your match"}</h1>
            <p style="opacity:0.8;">{"Come on in to view your matches... all you need to do is sign up!"}</p>
            <div style="display:flex; gap:12px; justify-content:center;">
                if ctx.user.is_none() {
                    <button onclick={toggle_register}>{"Register"}</button>
                }
                <button onclick={learn_more}>{"Learn more"}</button>
            </div>
        </div>
    }
}
