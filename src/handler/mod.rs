pub mod auth;
pub mod jobs;
pub mod messages;
pub mod profiles;
pub mod reviews;
pub mod wallet;
