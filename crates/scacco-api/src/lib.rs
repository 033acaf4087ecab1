//! Engine facade for UI collaborators: game sessions, move queries,
//! play/undo, and SAN formatting. Rendering, dialogs, and preference
//! persistence stay on the UI's side of this boundary.

mod error;
mod game;
mod san;

pub use error::GameError;
pub use game::Game;
