pub mod clans;
pub mod health;
