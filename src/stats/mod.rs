pub mod aggregation;
pub mod ranking;
pub mod types;

pub use aggregation::match_delta;
pub use ranking::{rank_players, DerivedMetrics};
pub use types::{RankedPlayer, Totals};
