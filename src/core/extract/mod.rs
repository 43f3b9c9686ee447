pub mod call_locator;

pub use call_locator::{LocatedCall, OwnedCallInfo, locate_calls};
