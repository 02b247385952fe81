pub mod event;
pub mod event_result;
pub mod role;
pub mod team;
pub mod user;

pub use event::{Event, EventCategory};
pub use event_result::EventResult;
pub use role::Role;
pub use team::{Team, TeamMember};
pub use user::User;
