pub mod attendance;
pub mod query;
pub mod requests;
pub mod roster;
pub mod settings;
pub mod stats;
