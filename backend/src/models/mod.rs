pub mod locations;
pub mod social;
pub mod travelers;

pub use locations::{LocatedTraveler, NearbyResponse, NearbyStats, NearbyUser, UserLocation};
pub use social::{
    ChatPair, ConnectionRequest, ConnectionState, ConnectionStatus, FollowRelationship,
    MutualFollowStatus, PrivateChat, PrivateChatOpened, PrivateChatSummary,
};
pub use travelers::TravelerProfile;
