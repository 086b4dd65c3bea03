#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
mod id;

mod account;
mod email;
mod error;
mod exercise;
mod history;
mod instructor;
mod name;
mod password;
pub mod recommendation;
mod service;
mod student;
mod workout;

#[cfg(test)]
mod testing;

pub use account::*;
pub use email::*;
pub use error::*;
pub use exercise::*;
pub use history::*;
pub use instructor::*;
pub use name::*;
pub use password::*;
pub use service::*;
pub use student::*;
pub use workout::*;
