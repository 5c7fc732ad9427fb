//! Integration tests for the panel

mod support;
mod test_actions;
mod test_run;
mod test_tail;
