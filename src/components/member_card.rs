use yew::prelude::*;

use crate::model::Member;

#[derive(Properties, PartialEq, Clone)]
pub struct MemberCardProps {
    pub member: Member,
}

#[function_component(MemberCard)]
pub fn member_card(props: &MemberCardProps) -> Html {
    let m = &props.member;
    let photo = m
        .photo_url
        .clone()
        .or_else(|| m.photos.iter().find(|p| p.is_main).map(|p| p.url.clone()))
        .unwrap_or_else(|| "./assets/user.png".into());
    html! {
        <div style="background:#161b22; border:1px solid #30363d; border-radius:8px; overflow:hidden;">
            <img src={photo} alt={m.known_as.clone()} style="width:100%; aspect-ratio:1; object-fit:cover;" />
            <div style="padding:8px;">
                <div style="font-weight:bold;">{ format!("{}, {}", m.known_as, m.age) }</div>
                <div style="font-size:12px; opacity:0.7;">{ m.city.clone() }</div>
            </div>
        </div>
    }
}
