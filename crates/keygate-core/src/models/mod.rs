//! Domain models shared between the authentication core and its collaborators.

pub mod user;

pub use user::User;
