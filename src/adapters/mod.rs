pub mod helius;
