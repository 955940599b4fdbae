pub mod auth;
pub mod guestbook;
pub mod health;
pub mod uploads;
