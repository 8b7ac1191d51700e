//! Repositories for database operations

pub mod memory;
pub mod note;
pub mod user;

pub use memory::MemoryStore;
pub use note::PgNoteRepository;
pub use user::PgUserRepository;
