pub mod db;
pub mod jobdb;
pub mod ledgerdb;
pub mod messagedb;
pub mod profiledb;
pub mod reviewdb;
pub mod userdb;
