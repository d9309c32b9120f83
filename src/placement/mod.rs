mod orchestrator;
pub mod request;

pub use orchestrator::{
    FailedBet, PaperSettlement, PlacedBet, PlacementOrchestrator, PlacementReport,
    SettlementBackend,
};
pub use request::{LegSpec, PlaceBetRequest, PlaceParlayRequest, PlaceResponse};

use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type PlacementResult<T> = Result<T, PlacementError>;
