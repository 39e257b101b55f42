//! Headless view models.
//!
//! Each view model owns a [`mvi::StateStore`] that hosts observe; the
//! async methods drive use cases to completion and reduce every
//! emission into state.

pub mod auth;
pub mod connectivity;
pub mod home;
pub mod mvi;
