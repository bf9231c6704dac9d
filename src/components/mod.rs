pub mod app;
pub mod home;
pub mod learn_more;
pub mod member_card;
pub mod member_list;
pub mod nav;
pub mod register;
