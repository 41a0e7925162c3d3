//! Match entities: proposed and confirmed pairings between reports.

pub mod model;
pub mod status;

pub use model::{Match, MatchParty, NewMatch};
pub use status::MatchStatus;
