mod guest_entry;

pub use guest_entry::{GuestEntry, GuestEntryChanges, NewGuestEntry};
