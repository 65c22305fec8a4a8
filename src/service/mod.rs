pub mod error;
pub mod escrow_service;
pub mod reputation_service;
pub mod wallet_service;
