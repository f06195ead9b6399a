//! Users module - registration, profile management and pairing codes.

mod users_model;
mod users_service;
mod users_traits;


pub use users_model::{
    normalize_email, user_not_found, validate_email, validate_name, NewUser, NewUserRecord, Page,
    ProfileUpdate, User, UserProfile,
};
pub use users_service::{random_unique_code, UserService};
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
