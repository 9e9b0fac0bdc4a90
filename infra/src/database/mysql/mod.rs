//! MySQL repository implementations

mod identity_repository_impl;
mod token_repository_impl;

pub use identity_repository_impl::MySqlIdentityRepository;
pub use token_repository_impl::MySqlTokenRecordRepository;
