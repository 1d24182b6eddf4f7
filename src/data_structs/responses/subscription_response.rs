use serde::{Deserialize, Serialize};

use crate::data_structs::subscription::Subscription;

/// Success body of the lookup endpoint: the row, or an explicit null when the
/// user has no subscription (absence is not an error).
#[derive(Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub subscription: Option<Subscription>,
}

#[derive(Debug, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
