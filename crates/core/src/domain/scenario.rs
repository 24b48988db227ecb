use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequesterRole {
    Viewer,
    Member,
    Approver,
    Finance,
    Admin,
    Owner,
}

impl RequesterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Member => "Member",
            Self::Approver => "Approver",
            Self::Finance => "Finance",
            Self::Admin => "Admin",
            Self::Owner => "Owner",
        }
    }
}

impl FromStr for RequesterRole {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "member" => Ok(Self::Member),
            "approver" => Ok(Self::Approver),
            "finance" => Ok(Self::Finance),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown requester role `{other}` (expected viewer|member|approver|finance|admin|owner)"
            ))),
        }
    }
}

/// A hypothetical transaction run against a flow. `vendor` and `module`
/// are carried for display and never influence the decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(rename = "type")]
    pub transaction_type: String,
    #[serde(rename = "amountUGX", with = "rust_decimal::serde::arbitrary_precision")]
    pub amount_ugx: Decimal,
    pub requester_role: RequesterRole,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub module: String,
}

impl Scenario {
    pub fn new(
        transaction_type: impl Into<String>,
        amount_ugx: Decimal,
        requester_role: RequesterRole,
    ) -> Self {
        Self {
            transaction_type: transaction_type.into(),
            amount_ugx,
            requester_role,
            vendor: String::new(),
            module: String::new(),
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.amount_ugx < Decimal::ZERO {
            return Err(DomainError::InvariantViolation(format!(
                "scenario amount must be non-negative, got {}",
                self.amount_ugx
            )));
        }
        if !self.amount_ugx.fract().is_zero() {
            return Err(DomainError::InvariantViolation(format!(
                "scenario amount must be a whole number of UGX, got {}",
                self.amount_ugx
            )));
        }
        Ok(())
    }
}
