pub mod scoring;
pub mod team_code;
