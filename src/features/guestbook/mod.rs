//! Guestbook (buku tamu) feature.
//!
//! Visitors register through the public form; staff browse, correct and
//! remove entries through the admin endpoints.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Access | Description |
//! |--------|----------|--------|-------------|
//! | POST | `/guestbook` | public | Register a visit (JSON) |
//! | POST | `/guestbook/submit` | public | Register a visit with an optional photo (multipart) |
//! | GET | `/guestbook` | admin | Paginated, searchable list |
//! | GET | `/guestbook/{id}` | admin | Single entry |
//! | PUT | `/guestbook/{id}` | admin | Partial update |
//! | DELETE | `/guestbook/{id}` | admin | Remove an entry |
//! | GET | `/locations` | public | Desa/kelurahan choices |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use handlers::GuestbookState;
pub use repositories::{GuestRepository, PgGuestRepository};
pub use services::{EntryFormService, GuestbookService};
