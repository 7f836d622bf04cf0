//! REST API 数据传输对象

pub mod request;
pub mod response;

pub use request::{BatchIssueRequest, GenerateQuizRequest, MinterRequest, SubmitQuizRequest};
pub use response::{
    ApiResponse, BalanceResponse, BatchIssueResponse, ChainsResponse, HoldingsResponse,
    RoadmapResponse,
};
