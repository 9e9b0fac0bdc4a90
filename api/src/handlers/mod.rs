pub mod error;

pub use error::{
    handle_domain_error, json_error_handler, INTERNAL_ERROR_MESSAGE, INVALID_CLIENT_REQUEST_MESSAGE,
    MISSING_FIELDS_MESSAGE,
};
