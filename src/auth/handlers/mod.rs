//! HTTP handlers for the authentication endpoints.
//!
//! - **`login`** - `POST /token` password login
//! - **`oauth`** - Yandex.ID redirect and callback
//! - **`pages`** - index, welcome, logout
//! - **`types`** - request/response types

pub mod login;
pub mod oauth;
pub mod pages;
pub mod types;

pub use login::login;
pub use oauth::{yandex_callback, yandex_login};
pub use pages::{index, logout, welcome};
