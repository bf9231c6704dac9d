use yew::prelude::*;

#[function_component(LearnMore)]
pub fn learn_more() -> Html {
    html! {
        <div style="max-width:640px; margin:24px auto; line-height:1.5;">
            <h2>{"How it works"}</h2>
            <p>{"Create a profile, add a few photos and browse members near you. Like the people you are interested in and message your mutual matches."}</p>
            <p>{"On a phone, pull the member list down from the top to refresh it."}</p>
        </div>
    }
}
