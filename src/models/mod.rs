//! Typed views of the REST resources
//!
//! Each struct accepts both the Graph (camelCase) and the Outlook REST
//! (PascalCase) spelling of its properties.

mod contact;
mod event;
mod message;
mod user;

pub use contact::*;
pub use event::*;
pub use message::*;
pub use user::*;
