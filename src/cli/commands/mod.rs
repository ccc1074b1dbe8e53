pub mod health;
pub mod queries;
pub mod token;
