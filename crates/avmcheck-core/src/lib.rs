#[macro_use]
extern crate lazy_static;

pub use avmcheck_kit as kit;

pub mod check;
pub mod interfaces;
pub mod variable;
