// Model exports
pub mod domain;
pub mod events;
pub mod requests;
pub mod responses;

pub use domain::{UserInterests, MatchPair, BestMatch, MatchOutcome, ConnectionId, NegotiationKind};
pub use events::{ClientEvent, ServerEvent};
pub use requests::SubmitInterestsRequest;
pub use responses::{SubmitInterestsResponse, MatchResponse, MessageResponse, HealthResponse, ErrorResponse};
