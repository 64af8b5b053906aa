pub mod shopping;
pub mod system;
