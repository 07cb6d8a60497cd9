pub mod health;
pub mod paths;
pub mod query;
pub mod recommendations;
pub mod users;
