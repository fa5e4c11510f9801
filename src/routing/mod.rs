//! Client-side routing: route table, history and the protected-route guard.

mod guard;
mod history;
mod intent;
mod table;

pub use guard::{GuardDecision, RouteGuard};
pub use history::{History, Location, NavigationMode, NavigationRequest};
pub use intent::NavigationIntent;
pub use table::{Page, RouteEntry, RouteTable};
