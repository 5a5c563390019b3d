pub mod audit;
pub mod resolve;
pub mod routes;
