// Core algorithm exports
pub mod matcher;
pub mod relay;
pub mod rooms;
pub mod scoring;

pub use matcher::{Matcher, select_best};
pub use relay::SignalRelay;
pub use rooms::{RoomRegistry, SessionHandle};
pub use scoring::{cosine_similarity, interest_vector, normalize_interests};
