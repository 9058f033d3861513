pub mod game;
pub mod ai;
pub mod controller;
pub mod error;
pub mod config;

pub use error::{GameError, AIError, Result};
pub use config::{Config, ConfigError};
pub use controller::{Controller, ControllerEvent, View};
