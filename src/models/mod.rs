pub mod jobmodel;
pub mod ledgermodel;
pub mod messagemodel;
pub mod profilemodel;
pub mod reviewmodel;
pub mod usermodel;
