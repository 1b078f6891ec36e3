//! Enumerations shared by the terminal clients and the order flows.
//!
//! Discriminants follow the MetaTrader 5 trade constants so the REST bridge
//! can put them on the wire unchanged (`TRADE_ACTION_DEAL`, `ORDER_TYPE_BUY`,
//! `ORDER_FILLING_IOC`, `ORDER_TIME_GTC`, `TRADE_RETCODE_*`).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Order side
// ---------------------------------------------------------------------------

/// Buy or sell direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// MetaTrader order type code (`ORDER_TYPE_BUY` = 0, `ORDER_TYPE_SELL` = 1).
    pub fn order_type_code(self) -> u32 {
        match self {
            Self::Buy => 0,
            Self::Sell => 1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

// ---------------------------------------------------------------------------
// Request metadata
// ---------------------------------------------------------------------------

/// Trade action of an order request. Only immediate market deals are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradeAction {
    #[default]
    Deal,
}

impl TradeAction {
    /// `TRADE_ACTION_DEAL` = 1.
    pub fn code(self) -> u32 {
        match self {
            Self::Deal => 1,
        }
    }
}

/// Order filling policy. Market orders here are always immediate-or-cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FillingMode {
    #[default]
    Ioc,
}

impl FillingMode {
    /// `ORDER_FILLING_IOC` = 1.
    pub fn code(self) -> u32 {
        match self {
            Self::Ioc => 1,
        }
    }
}

/// Order time in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeInForce {
    #[default]
    Gtc,
}

impl TimeInForce {
    /// `ORDER_TIME_GTC` = 0.
    pub fn code(self) -> u32 {
        match self {
            Self::Gtc => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Return codes
// ---------------------------------------------------------------------------

/// Broker return code of an order submission.
///
/// Only [`TradeRetcode::Done`] counts as success. Unlisted codes are kept
/// verbatim in [`TradeRetcode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeRetcode {
    Requote,
    Reject,
    Cancel,
    Placed,
    Done,
    DonePartial,
    Error,
    Timeout,
    Invalid,
    InvalidVolume,
    InvalidPrice,
    InvalidStops,
    TradeDisabled,
    MarketClosed,
    NoMoney,
    PriceChanged,
    PriceOff,
    InvalidExpiration,
    OrderChanged,
    TooManyRequests,
    NoChanges,
    ServerDisablesAutoTrading,
    ClientDisablesAutoTrading,
    Locked,
    Frozen,
    InvalidFill,
    Connection,
    OnlyReal,
    LimitOrders,
    LimitVolume,
    InvalidOrder,
    PositionClosed,
    InvalidCloseVolume,
    CloseOrderExist,
    LimitPositions,
    RejectCancel,
    LongOnly,
    ShortOnly,
    CloseOnly,
    FifoClose,
    HedgeProhibited,
    Other(u32),
}

impl TradeRetcode {
    /// Map a numeric broker code to its variant.
    pub fn from_code(code: u32) -> Self {
        match code {
            10004 => Self::Requote,
            10006 => Self::Reject,
            10007 => Self::Cancel,
            10008 => Self::Placed,
            10009 => Self::Done,
            10010 => Self::DonePartial,
            10011 => Self::Error,
            10012 => Self::Timeout,
            10013 => Self::Invalid,
            10014 => Self::InvalidVolume,
            10015 => Self::InvalidPrice,
            10016 => Self::InvalidStops,
            10017 => Self::TradeDisabled,
            10018 => Self::MarketClosed,
            10019 => Self::NoMoney,
            10020 => Self::PriceChanged,
            10021 => Self::PriceOff,
            10022 => Self::InvalidExpiration,
            10023 => Self::OrderChanged,
            10024 => Self::TooManyRequests,
            10025 => Self::NoChanges,
            10026 => Self::ServerDisablesAutoTrading,
            10027 => Self::ClientDisablesAutoTrading,
            10028 => Self::Locked,
            10029 => Self::Frozen,
            10030 => Self::InvalidFill,
            10031 => Self::Connection,
            10032 => Self::OnlyReal,
            10033 => Self::LimitOrders,
            10034 => Self::LimitVolume,
            10035 => Self::InvalidOrder,
            10036 => Self::PositionClosed,
            10038 => Self::InvalidCloseVolume,
            10039 => Self::CloseOrderExist,
            10040 => Self::LimitPositions,
            10041 => Self::RejectCancel,
            10042 => Self::LongOnly,
            10043 => Self::ShortOnly,
            10044 => Self::CloseOnly,
            10045 => Self::FifoClose,
            10046 => Self::HedgeProhibited,
            other => Self::Other(other),
        }
    }

    /// Numeric broker code.
    pub fn code(self) -> u32 {
        match self {
            Self::Requote => 10004,
            Self::Reject => 10006,
            Self::Cancel => 10007,
            Self::Placed => 10008,
            Self::Done => 10009,
            Self::DonePartial => 10010,
            Self::Error => 10011,
            Self::Timeout => 10012,
            Self::Invalid => 10013,
            Self::InvalidVolume => 10014,
            Self::InvalidPrice => 10015,
            Self::InvalidStops => 10016,
            Self::TradeDisabled => 10017,
            Self::MarketClosed => 10018,
            Self::NoMoney => 10019,
            Self::PriceChanged => 10020,
            Self::PriceOff => 10021,
            Self::InvalidExpiration => 10022,
            Self::OrderChanged => 10023,
            Self::TooManyRequests => 10024,
            Self::NoChanges => 10025,
            Self::ServerDisablesAutoTrading => 10026,
            Self::ClientDisablesAutoTrading => 10027,
            Self::Locked => 10028,
            Self::Frozen => 10029,
            Self::InvalidFill => 10030,
            Self::Connection => 10031,
            Self::OnlyReal => 10032,
            Self::LimitOrders => 10033,
            Self::LimitVolume => 10034,
            Self::InvalidOrder => 10035,
            Self::PositionClosed => 10036,
            Self::InvalidCloseVolume => 10038,
            Self::CloseOrderExist => 10039,
            Self::LimitPositions => 10040,
            Self::RejectCancel => 10041,
            Self::LongOnly => 10042,
            Self::ShortOnly => 10043,
            Self::CloseOnly => 10044,
            Self::FifoClose => 10045,
            Self::HedgeProhibited => 10046,
            Self::Other(code) => code,
        }
    }

    /// `true` only for a completed deal.
    pub fn is_success(self) -> bool {
        self == Self::Done
    }
}

impl std::fmt::Display for TradeRetcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for TradeRetcode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

impl<'de> Deserialize<'de> for TradeRetcode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_code)
    }
}
