pub mod action;
pub mod app;
pub mod components;
pub mod event;
pub mod system;
pub mod theme;

#[cfg(test)]
mod test_utils;

pub use app::App;
