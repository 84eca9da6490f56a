//! Order-domain enums and the billing address shared between the
//! storefront and the admin console.

use serde::{Deserialize, Serialize, de};

/// Delivery options offered at checkout.
///
/// Each option maps to a flat fee; the fee table lives with the checkout
/// pricing logic in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOption {
    #[default]
    Standard,
    Express,
    Pickup,
}

impl DeliveryOption {
    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard delivery",
            Self::Express => "Express delivery",
            Self::Pickup => "Store pickup",
        }
    }
}

impl std::fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Express => write!(f, "express"),
            Self::Pickup => write!(f, "pickup"),
        }
    }
}

impl std::str::FromStr for DeliveryOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "pickup" => Ok(Self::Pickup),
            _ => Err(format!("invalid delivery option: {s}")),
        }
    }
}

/// How the customer pays for an order.
///
/// The wire encoding is an integer discriminant (`Full` = 0, `Credit` = 1),
/// which is what the order API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentType {
    /// Pay the full amount up front through the payment gateway.
    #[default]
    Full,
    /// Installment credit over a chosen number of months.
    Credit,
}

impl PaymentType {
    /// The integer discriminant used on the wire.
    #[must_use]
    pub const fn discriminant(self) -> u8 {
        match self {
            Self::Full => 0,
            Self::Credit => 1,
        }
    }

    /// Decode the wire discriminant.
    #[must_use]
    pub const fn from_discriminant(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Full),
            1 => Some(Self::Credit),
            _ => None,
        }
    }
}

impl Serialize for PaymentType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.discriminant())
    }
}

impl<'de> Deserialize<'de> for PaymentType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::from_discriminant(value).ok_or_else(|| {
            de::Error::invalid_value(
                de::Unexpected::Unsigned(u64::from(value)),
                &"0 (full) or 1 (credit)",
            )
        })
    }
}

/// Order lifecycle status as reported by the order API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Store user role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular shopper.
    Customer,
    /// Staff member with back-office access.
    Staff,
    /// Full administrative access including user management.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Staff => write!(f, "staff"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Billing address collected at checkout.
///
/// All fields except `line2` are required for submission; the checkout
/// validation enforces that, not this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BillingAddress {
    pub full_name: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
}
