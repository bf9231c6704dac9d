use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::TouchEvent;
use yew::prelude::*;

use super::app::ViewProps;
use super::member_card::MemberCard;
use crate::model::OrderBy;
use crate::services::{MemberSource, MembersService};
use crate::state::{BrowserSleep, PullToRefresh};
use crate::util::{input_value, select_value, window_scroll_y};

fn first_touch_y(e: &TouchEvent) -> Option<f64> {
    e.touches().item(0).map(|t| t.client_y() as f64)
}

fn load(members: &MembersService, trigger: &UseForceUpdateHandle) {
    let fetch = members.fetch();
    let trigger = trigger.clone();
    spawn_local(async move {
        if let Err(err) = fetch.await {
            tracing::warn!(error = %err, "loading members failed");
        }
        trigger.force_update();
    });
}

#[function_component(MemberList)]
pub fn member_list(props: &ViewProps) -> Html {
    let ctx = &props.ctx;
    let root_ref = use_node_ref();
    let trigger = use_force_update();
    let controller = {
        let members = ctx.members.clone();
        let gesture = ctx.config.gesture.clone();
        let trigger = trigger.clone();
        use_memo((), move |_| {
            PullToRefresh::new(Rc::new(members), BrowserSleep, gesture, move |_| trigger.force_update())
        })
    };

    // Reuse a cached page when coming back to the list.
    {
        let members = ctx.members.clone();
        let trigger = trigger.clone();
        use_effect_with((), move |_| {
            if members.paginated_result().is_none() {
                load(&members, &trigger);
            }
            || ()
        });
    }

    // Touch listeners go on the element directly: touchmove must be non-passive
    // for preventDefault to stop the page rubber-banding.
    {
        let root_ref = root_ref.clone();
        let controller = controller.clone();
        use_effect_with((), move |_| {
            let el = root_ref.cast::<web_sys::HtmlElement>();
            let touch_start_cb = {
                let ctl = controller.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if let Some(y) = first_touch_y(&e) {
                        ctl.touch_start(y, window_scroll_y());
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_move_cb = {
                let ctl = controller.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if let Some(y) = first_touch_y(&e) {
                        if ctl.touch_move(y, window_scroll_y()) {
                            e.prevent_default();
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_end_cb = {
                let ctl = controller.clone();
                Closure::wrap(Box::new(move |_e: TouchEvent| {
                    if let Some(task) = ctl.touch_end() {
                        spawn_local(task);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_cancel_cb = {
                let ctl = controller.clone();
                Closure::wrap(Box::new(move |_e: TouchEvent| ctl.touch_cancel()) as Box<dyn FnMut(_)>)
            };
            if let Some(el) = &el {
                let opts = web_sys::AddEventListenerOptions::new();
                opts.set_passive(false);
                let _ = el.add_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref());
                let _ = el.add_event_listener_with_callback_and_add_event_listener_options(
                    "touchmove",
                    touch_move_cb.as_ref().unchecked_ref(),
                    &opts,
                );
                let _ = el.add_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref());
                let _ = el.add_event_listener_with_callback("touchcancel", touch_cancel_cb.as_ref().unchecked_ref());
            } else {
                tracing::warn!("member list root missing, pull to refresh disabled");
            }
            move || {
                if let Some(el) = &el {
                    let _ = el.remove_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref());
                    let _ = el.remove_event_listener_with_callback("touchmove", touch_move_cb.as_ref().unchecked_ref());
                    let _ = el.remove_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref());
                    let _ = el.remove_event_listener_with_callback("touchcancel", touch_cancel_cb.as_ref().unchecked_ref());
                }
                let _keep_alive = (&touch_start_cb, &touch_move_cb, &touch_end_cb, &touch_cancel_cb);
            }
        });
    }

    let params = ctx.members.user_params();

    let on_gender = {
        let members = ctx.members.clone();
        let trigger = trigger.clone();
        Callback::from(move |e: Event| {
            let mut p = members.user_params();
            p.gender = select_value(&e);
            members.set_user_params(p);
            trigger.force_update();
        })
    };
    let age_input = |is_min: bool| {
        let members = ctx.members.clone();
        Callback::from(move |e: InputEvent| {
            let Ok(age) = input_value(&e).trim().parse::<u32>() else {
                return;
            };
            let mut p = members.user_params();
            if is_min {
                p.min_age = age;
            } else {
                p.max_age = age;
            }
            members.set_user_params(p);
        })
    };
    let order_by = |order: OrderBy| {
        let members = ctx.members.clone();
        let trigger = trigger.clone();
        Callback::from(move |_: MouseEvent| {
            let mut p = members.user_params();
            p.order_by = order;
            p.page_number = 1;
            members.set_user_params(p);
            load(&members, &trigger);
        })
    };
    let apply = {
        let members = ctx.members.clone();
        let trigger = trigger.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            members.reset_page_cursor();
            load(&members, &trigger);
        })
    };
    let reset_filters = {
        let members = ctx.members.clone();
        let trigger = trigger.clone();
        Callback::from(move |_: MouseEvent| {
            members.reset_user_params();
            load(&members, &trigger);
        })
    };
    let page_changed = |page: u32| {
        let members = ctx.members.clone();
        let trigger = trigger.clone();
        Callback::from(move |_: MouseEvent| {
            if members.set_page(page) {
                load(&members, &trigger);
            }
        })
    };

    let gesture = controller.state();
    let indicator = if gesture.is_refreshing {
        html! { <div style="text-align:center; padding:8px;">{"Refreshing…"}</div> }
    } else if gesture.pull_distance > 0.0 {
        let ready = gesture.pull_distance > controller.config().commit_threshold;
        let opacity = gesture.pull_progress(controller.config());
        html! {
            <div style={format!("text-align:center; height:{}px; opacity:{:.2}; overflow:hidden;", gesture.pull_distance, opacity)}>
                { if ready { "Release to refresh" } else { "Pull to refresh" } }
            </div>
        }
    } else {
        html! {}
    };

    let result = ctx.members.paginated_result();
    let pagination = result.as_ref().and_then(|r| r.pagination);
    let cards = result
        .as_ref()
        .map(|r| {
            r.items
                .iter()
                .map(|m| html! { <MemberCard key={m.id} member={m.clone()} /> })
                .collect::<Html>()
        })
        .unwrap_or_default();
    let pager = match pagination {
        Some(p) if p.total_pages > 1 => html! {
            <div style="display:flex; gap:8px; justify-content:center; align-items:center; margin:16px 0;">
                <button disabled={p.current_page <= 1} onclick={page_changed(p.current_page.saturating_sub(1).max(1))}>{"Previous"}</button>
                <span>{ format!("Page {} of {}", p.current_page, p.total_pages) }</span>
                <button disabled={p.current_page >= p.total_pages} onclick={page_changed((p.current_page + 1).min(p.total_pages))}>{"Next"}</button>
            </div>
        },
        _ => html! {},
    };

    html! {
        <div ref={root_ref} style="min-height:100vh;">
            { indicator }
            <h3 style="text-align:center;">
                { format!("Your matches - {} found", pagination.map(|p| p.total_items).unwrap_or(0)) }
            </h3>
            <form onsubmit={apply} style="display:flex; flex-wrap:wrap; gap:8px; align-items:center; margin-bottom:12px;">
                <label>{"Age from: "}<input type="number" style="width:70px;" value={params.min_age.to_string()} oninput={age_input(true)} /></label>
                <label>{"Age to: "}<input type="number" style="width:70px;" value={params.max_age.to_string()} oninput={age_input(false)} /></label>
                <label>{"Show: "}
                    <select onchange={on_gender}>
                        <option value="male" selected={params.gender == "male"}>{"Males"}</option>
                        <option value="female" selected={params.gender == "female"}>{"Females"}</option>
                    </select>
                </label>
                <button type="submit">{"Apply filters"}</button>
                <button type="button" onclick={reset_filters}>{"Reset filters"}</button>
                <span style="flex:1;"></span>
                <button type="button" disabled={params.order_by == OrderBy::LastActive} onclick={order_by(OrderBy::LastActive)}>{"Last active"}</button>
                <button type="button" disabled={params.order_by == OrderBy::Created} onclick={order_by(OrderBy::Created)}>{"Newest members"}</button>
            </form>
            <div style="display:grid; grid-template-columns:repeat(auto-fill, minmax(180px, 1fr)); gap:12px;">
                { cards }
            </div>
            { pager }
        </div>
    }
}
