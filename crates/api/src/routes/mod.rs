pub mod classes;
pub mod health;
pub mod records;
pub mod session;
pub mod settings;
pub mod stats;
