pub mod capture_gate;
pub mod embedding_aggregator;
pub mod similarity_decider;
