pub mod config;
pub mod consts;
pub mod error;
pub mod events;
pub mod face;
pub mod geometry;
pub mod input;
pub mod io;
pub mod layout;
pub mod surface;
pub mod sync;
pub mod timing;
pub mod viewport;
