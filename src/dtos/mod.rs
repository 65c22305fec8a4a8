pub mod jobdtos;
pub mod messagedtos;
pub mod profiledtos;
pub mod reviewdtos;
pub mod userdtos;
pub mod walletdtos;
