mod api_key;
mod errors;
mod storage;
mod types;
mod validation_token;

pub use api_key::{ApiKey, Right};
pub use errors::UserError;
pub use storage::UserStore;
pub use types::{User, UserEntity, UserWithAttributes};
pub use validation_token::ValidationToken;

/// Entity kind under which user attributes are stored
pub(crate) const USER_ENTITY_KIND: &str = "user";
