pub use crate::Result;
pub use crate::api::{
    ApiCall, CallDetails, CallDetailsWithBody, Configure, Handle, auth::Auth, method::Method,
    response::Response,
};
