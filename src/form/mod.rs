pub mod format;
pub mod schema;
pub mod state;
pub mod submission;

pub use state::FormState;
pub use submission::{FormError, FormSubmission, NameResolver};
