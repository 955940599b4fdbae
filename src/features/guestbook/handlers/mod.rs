mod guest_entry_handler;

pub use guest_entry_handler::*;
