use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// An order handed to an execution sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub security: String,
    pub side: Side,
    /// Price observed when the order was raised.
    pub price: f64,
    pub size: i64,
}

impl Order {
    pub fn new(security: impl Into<String>, side: Side, price: f64, size: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            security: security.into(),
            side,
            price,
            size,
        }
    }
}

/// Confirmation of an executed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub order_id: String,
    pub security: String,
    pub side: Side,
    pub fill_price: f64,
    pub size: i64,
    pub timestamp: DateTime<Utc>,
}

/// One line of a price tick stream: `SECURITY PRICE`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub security: String,
    pub price: f64,
}

impl FromStr for PriceTick {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let (Some(security), Some(raw_price), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Parse(format!(
                "expected 'SECURITY PRICE', got '{}'",
                line.trim()
            )));
        };

        // Non-finite prices are kept: filtering them is the listener's job.
        let price = raw_price
            .parse::<f64>()
            .map_err(|e| Error::Parse(format!("bad price '{raw_price}': {e}")))?;

        Ok(Self {
            security: security.to_string(),
            price,
        })
    }
}
