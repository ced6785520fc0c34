//! Helpers for the end-to-end test suite. The suite itself lives in `tests/`: it runs the order backend and the payment
//! simulator side by side on random ports and drives them over HTTP.
pub mod helpers;
