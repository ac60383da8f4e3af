//! Request handlers.

pub mod health;
pub mod media;
pub mod payments;
pub mod platforms;

pub use health::*;
pub use media::*;
pub use payments::*;
pub use platforms::*;
