pub mod chats;
pub mod events;
pub mod messages;
pub mod participations;
pub mod profiles;
pub mod reviews;
pub mod sessions;
pub mod submissions;
pub mod users;
