//! Destination tables and the entities bound to them.
//!
//! The table set is closed: a `Table` can only be one of the four variants
//! below, so no request content can ever select or alter a destination.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Signals,
    PendingOrders,
    Trades,
    TradeEvents,
}

impl Table {
    /// All tables, in route order.
    pub const ALL: [Table; 4] = [
        Table::Signals,
        Table::PendingOrders,
        Table::Trades,
        Table::TradeEvents,
    ];

    /// Table name as it exists in the store.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Table::Signals => "signals",
            Table::PendingOrders => "pending_orders",
            Table::Trades => "trades",
            Table::TradeEvents => "trade_events",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record kind accepted by the ingestion API.
///
/// Each entity is a fixed binding of one route to one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Signal,
    Order,
    Trade,
    Event,
}

impl Entity {
    pub const ALL: [Entity; 4] = [Entity::Signal, Entity::Order, Entity::Trade, Entity::Event];

    /// Destination table for this entity.
    pub const fn table(&self) -> Table {
        match self {
            Entity::Signal => Table::Signals,
            Entity::Order => Table::PendingOrders,
            Entity::Trade => Table::Trades,
            Entity::Event => Table::TradeEvents,
        }
    }

    /// Short name used in routes, logs and error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Entity::Signal => "signal",
            Entity::Order => "order",
            Entity::Trade => "trade",
            Entity::Event => "event",
        }
    }

    /// HTTP route accepting this entity.
    pub const fn path(&self) -> &'static str {
        match self {
            Entity::Signal => "/signal",
            Entity::Order => "/order",
            Entity::Trade => "/trade",
            Entity::Event => "/event",
        }
    }

    /// Fixed message returned to callers when the store rejects a write.
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Entity::Signal => "Failed to save signal",
            Entity::Order => "Failed to save order",
            Entity::Trade => "Failed to save trade",
            Entity::Event => "Failed to save event",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
