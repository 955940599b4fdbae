mod guest_repository;
mod pg_guest_repository;

pub use guest_repository::{GuestPage, GuestRepository, RepositoryError};
pub use pg_guest_repository::PgGuestRepository;
