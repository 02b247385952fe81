pub mod event;
pub mod scoring;
pub mod team;
pub mod user;
