pub mod token_guard;
