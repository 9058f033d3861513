pub mod types;
pub mod player;
pub mod board;
pub mod rules;
pub mod state;

pub use types::*;
pub use player::*;
pub use board::*;
pub use rules::*;
pub use state::*;
