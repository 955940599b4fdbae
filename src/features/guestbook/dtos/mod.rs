mod guest_entry_dto;

pub use guest_entry_dto::{
    CreateGuestEntryDto, DocumentationDto, DocumentationStatus, LocationsResponseDto,
    SubmissionResponseDto, SubmitGuestEntryForm, UpdateGuestEntryDto,
};
