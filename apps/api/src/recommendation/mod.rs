// Badge recommendation: ranking pipeline and the `/predict` endpoint.

pub mod handlers;
pub mod ranker;
