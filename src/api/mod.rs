//! API Module - Boundary types handed to the transport layer

pub mod response;

pub use response::{BatchSummary, PredictionResponse};
