pub mod cv;
pub mod error;
pub mod gui;
pub mod image;
pub mod model;
pub mod monitor;
pub mod proctor;
pub mod result;
pub mod setting;
pub mod sync;
pub mod tracing;
pub mod upload;

pub use error::Error;
pub use result::Result;
