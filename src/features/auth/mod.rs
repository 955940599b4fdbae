pub mod guards;
pub mod model;

pub use guards::RequireAdmin;
pub use model::AdminAccess;
