pub mod configurations;
mod dispatch;
pub mod extract;
pub mod run;

pub use dispatch::dispatch;
