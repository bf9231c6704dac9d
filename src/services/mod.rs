pub mod account;
pub mod members;
pub mod navigation;

pub use account::AccountService;
pub use members::{MemberSource, MembersService};
pub use navigation::{NavState, Navigator, Route};
