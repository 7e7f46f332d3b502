pub mod board;
pub mod note;
pub mod user;

pub use board::{Board, BoardModel};
pub use note::{ActionResponse, Note, NoteModel};
pub use user::{Session, User};
