//! Database models
//!
//! Note that these may have to be updated by hand alongside the schema in `store`.

mod user;

pub(crate) use user::*;
