//! View state that outlives a single render but not the component: pure
//! transitions, kept apart from the `html!` code so they can be tested
//! without a browser.

pub mod accounts;
pub mod review;
pub mod table;
pub mod upload;
