pub mod withdrawals;
