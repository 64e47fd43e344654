//! A barebones client for the parts of the Spotify Web API that the label site needs.
#![deny(missing_docs)]

mod client;
pub use client::*;

mod token;
pub use token::*;

mod playlist;
pub use playlist::*;

mod request;
