pub mod decimal;
pub mod password;
pub mod reference;
pub mod token;
