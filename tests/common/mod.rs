#![allow(dead_code)]

pub use tasking_test_utils::builders;
pub use tasking_test_utils::probe;
pub use tasking_test_utils::{init_tracing, run_capped, with_timeout};
