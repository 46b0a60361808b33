pub mod sample_store;
