//! HTTP-level tests over in-memory stores.

mod availability_test;
mod booking_test;
mod helpers;
