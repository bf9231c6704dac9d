pub mod collapse;
pub mod gesture;
pub mod refresh;
pub mod reset_bus;

pub use collapse::CollapseState;
pub use refresh::{BrowserSleep, PullToRefresh};
pub use reset_bus::ResetBus;
