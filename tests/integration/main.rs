mod build_tests;
mod common;
mod runtime_tests;
