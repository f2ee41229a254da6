//! # gatehouse
//!
//! Client for a remote authentication API: sign-up, sign-in, and a gated
//! application page.
//!
//! The core is session gating. [`session::AuthContext::resolve`] reads the
//! stored credential token and asks the server whether it is still valid;
//! [`gate::decide`] turns the resulting [`session::SessionState`] into a
//! render-or-redirect decision for each page. [`pages::Navigator`] ties both
//! together the way a browser router would, and the `gatehouse` binary drives
//! it from the command line.

pub mod api;
pub mod config;
pub mod forms;
pub mod gate;
pub mod pages;
pub mod session;
pub mod storage;
