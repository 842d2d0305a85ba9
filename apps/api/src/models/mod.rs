pub mod badge;
pub mod skill;
