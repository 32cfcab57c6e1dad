pub mod availability;
pub mod dispatch;
pub mod poll;
pub mod util;
