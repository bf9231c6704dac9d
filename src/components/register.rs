use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::app::AppContext;
use crate::model::RegisterRequest;
use crate::services::Route;
use crate::util::{input_value, select_value};

#[derive(Properties, PartialEq, Clone)]
pub struct RegisterProps {
    pub ctx: AppContext,
    /// Emits the new register mode (always false) when the form is dismissed.
    pub on_cancel: Callback<bool>,
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Username,
    KnownAs,
    DateOfBirth,
    City,
    Country,
    Password,
}

fn set_field(form: &mut RegisterRequest, field: Field, value: String) {
    match field {
        Field::Username => form.username = value,
        Field::KnownAs => form.known_as = value,
        Field::DateOfBirth => form.date_of_birth = value,
        Field::City => form.city = value,
        Field::Country => form.country = value,
        Field::Password => form.password = value,
    }
}

/// Returns the first problem with the form, if any.
fn validate(form: &RegisterRequest, confirm: &str) -> Option<&'static str> {
    if form.username.trim().is_empty() || form.known_as.trim().is_empty() {
        return Some("Username and known as are required");
    }
    if form.date_of_birth.is_empty() || form.city.trim().is_empty() || form.country.trim().is_empty() {
        return Some("Date of birth, city and country are required");
    }
    if !(4..=8).contains(&form.password.chars().count()) {
        return Some("Password must be 4 to 8 characters");
    }
    if form.password != confirm {
        return Some("Passwords do not match");
    }
    None
}

#[function_component(Register)]
pub fn register(props: &RegisterProps) -> Html {
    let ctx = &props.ctx;
    let form = use_state(|| RegisterRequest {
        gender: "male".into(),
        ..Default::default()
    });
    let confirm = use_state(String::new);
    let error = use_state_eq(|| None::<String>);

    let bind = |field: Field| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let mut next = (*form).clone();
            set_field(&mut next, field, input_value(&e));
            form.set(next);
        })
    };
    let on_gender = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let mut next = (*form).clone();
            next.gender = select_value(&e);
            form.set(next);
        })
    };
    let on_confirm = {
        let confirm = confirm.clone();
        Callback::from(move |e: InputEvent| confirm.set(input_value(&e)))
    };
    let on_submit = {
        let form = form.clone();
        let confirm = confirm.clone();
        let error = error.clone();
        let account = ctx.account.clone();
        let set_user = ctx.set_user.clone();
        let navigator = ctx.navigator.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(problem) = validate(&form, &confirm) {
                error.set(Some(problem.to_string()));
                return;
            }
            let req = (*form).clone();
            let account = account.clone();
            let set_user = set_user.clone();
            let navigator = navigator.clone();
            let error = error.clone();
            spawn_local(async move {
                match account.register(&req).await {
                    Ok(user) => {
                        set_user.emit(Some(user));
                        navigator.navigate_to(Route::Members).await;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "registration failed");
                        error.set(Some(err.to_string()));
                    }
                }
            });
        })
    };
    let cancel = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| cb.emit(false))
    };

    html! {
        <form onsubmit={on_submit} style="display:flex; flex-direction:column; gap:8px;">
            <h2 style="text-align:center;">{"Sign up"}</h2>
            <select onchange={on_gender}>
                <option value="male" selected={form.gender == "male"}>{"Male"}</option>
                <option value="female" selected={form.gender == "female"}>{"Female"}</option>
            </select>
            <input placeholder="Username" value={form.username.clone()} oninput={bind(Field::Username)} />
            <input placeholder="Known as" value={form.known_as.clone()} oninput={bind(Field::KnownAs)} />
            <input type="date" value={form.date_of_birth.clone()} oninput={bind(Field::DateOfBirth)} />
            <input placeholder="City" value={form.city.clone()} oninput={bind(Field::City)} />
            <input placeholder="Country" value={form.country.clone()} oninput={bind(Field::Country)} />
            <input type="password" placeholder="Password" value={form.password.clone()} oninput={bind(Field::Password)} />
            <input type="password" placeholder="Confirm password" value={(*confirm).clone()} oninput={on_confirm} />
            if let Some(msg) = &*error {
                <div style="color:#f85149; font-size:12px;">{ msg.clone() }</div>
            }
            <div style="display:flex; gap:8px; justify-content:center;">
                <button type="submit">{"Register"}</button>
                <button type="button" onclick={cancel}>{"Cancel"}</button>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RegisterRequest {
        RegisterRequest {
            username: "bob".into(),
            known_as: "Bob".into(),
            gender: "male".into(),
            date_of_birth: "1990-04-02".into(),
            city: "Leeds".into(),
            country: "UK".into(),
            password: "Pa55w0rd".into(),
        }
    }

    #[test]
    fn complete_form_passes() {
        assert_eq!(validate(&filled(), "Pa55w0rd"), None);
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        assert_eq!(validate(&filled(), "other"), Some("Passwords do not match"));
    }

    #[test]
    fn password_length_is_bounded() {
        let mut form = filled();
        form.password = "abc".into();
        assert!(validate(&form, "abc").is_some());
    }

    #[test]
    fn set_field_targets_one_field() {
        let mut form = RegisterRequest::default();
        set_field(&mut form, Field::City, "Oslo".into());
        assert_eq!(form.city, "Oslo");
        assert!(form.country.is_empty());
    }
}
