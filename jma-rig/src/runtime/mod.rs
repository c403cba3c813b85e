mod compose;
mod hierarchy;
mod import;
mod matcher;
mod pose;
mod rest;
mod validator;

pub use compose::*;
pub use hierarchy::*;
pub use import::*;
pub use matcher::*;
pub use pose::*;
pub use rest::*;
pub use validator::*;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod matcher_tests;



#[cfg(test)]
mod compose_tests;
