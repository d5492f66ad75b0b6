pub mod converter;
pub mod debounce;
pub mod favorites;
pub mod history;
pub mod input;
pub mod session;
pub mod storage;
