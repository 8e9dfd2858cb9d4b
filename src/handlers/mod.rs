pub mod elevated;
pub mod protected;
pub mod public;
pub mod validation;
