pub mod history;
pub mod layout;
pub mod theme;
pub mod validation;
