//! Unit test modules.

mod interpolation_test;
mod locale_store_test;
