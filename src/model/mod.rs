pub mod player;
pub mod tournament;
pub mod variant;

pub use player::{GameCount, Performance, PlayTime, Player, Profile};
pub use tournament::{Clock, RatingCap, Tournament, TournamentStatus, VariantDescriptor};
pub use variant::Variant;
