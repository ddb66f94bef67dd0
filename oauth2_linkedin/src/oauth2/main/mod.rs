mod core;
mod extract;
mod linkedin;
mod normalize;

pub(crate) use core::{handle_callback, prepare_auth_request};
pub(crate) use normalize::{credentials, extra, info, uid};
