#![warn(clippy::unwrap_used)]

pub mod constants;
pub mod fork_name;
pub mod index;
pub mod misc;
pub mod validator;
