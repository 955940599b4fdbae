mod entry_form_service;
mod guestbook_service;

pub use entry_form_service::{EntryFormService, GuestEntryForm};
pub use guestbook_service::GuestbookService;
