//! Outer surfaces of the session store.

pub mod http;
