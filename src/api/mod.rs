//! HTTP callable API
//!
//! Entry points follow the callable-function wire shape: the request body is
//! `{"data": ..}` and a successful response is `{"result": ..}`. Failures use
//! the envelope rendered by [`AppError`](crate::error::AppError).

pub mod callable;
pub mod health;
pub mod metrics;

use serde::{Deserialize, Serialize};

/// Request envelope. An absent or `null` `data` is treated as an empty request.
#[derive(Debug, Clone, Deserialize)]
pub struct CallableRequest<T> {
    #[serde(default)]
    pub data: Option<T>,
}

impl<T: Default> CallableRequest<T> {
    pub fn into_data(self) -> T {
        self.data.unwrap_or_default()
    }
}

/// Success envelope
#[derive(Debug, Clone, Serialize)]
pub struct CallableResponse<T> {
    pub result: T,
}

impl<T> CallableResponse<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}
