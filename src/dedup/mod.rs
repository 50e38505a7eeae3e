pub mod minhash;
