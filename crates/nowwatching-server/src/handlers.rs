pub mod callback;
pub mod login;
pub mod view;
