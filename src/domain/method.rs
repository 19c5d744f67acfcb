use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The NVP API calls that move money or read checkout state.
///
/// Anything else sent through the transport (`GetBalance`,
/// `TransactionSearch`, ...) is not a payment call and is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NvpMethod {
    SetExpressCheckout,
    GetExpressCheckoutDetails,
    DoExpressCheckoutPayment,
    DoAuthorization,
    DoCapture,
    DoVoid,
    RefundTransaction,
    DoDirectPayment,
}

impl NvpMethod {
    pub const ALL: [NvpMethod; 8] = [
        NvpMethod::SetExpressCheckout,
        NvpMethod::GetExpressCheckoutDetails,
        NvpMethod::DoExpressCheckoutPayment,
        NvpMethod::DoAuthorization,
        NvpMethod::DoCapture,
        NvpMethod::DoVoid,
        NvpMethod::RefundTransaction,
        NvpMethod::DoDirectPayment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NvpMethod::SetExpressCheckout => "SetExpressCheckout",
            NvpMethod::GetExpressCheckoutDetails => "GetExpressCheckoutDetails",
            NvpMethod::DoExpressCheckoutPayment => "DoExpressCheckoutPayment",
            NvpMethod::DoAuthorization => "DoAuthorization",
            NvpMethod::DoCapture => "DoCapture",
            NvpMethod::DoVoid => "DoVoid",
            NvpMethod::RefundTransaction => "RefundTransaction",
            NvpMethod::DoDirectPayment => "DoDirectPayment",
        }
    }

    /// Read-only calls get their currency forced but nothing converted.
    pub fn is_read_only(self) -> bool {
        self == NvpMethod::GetExpressCheckoutDetails
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl FromStr for NvpMethod {
    type Err = UnknownMethod;

    /// Method names are matched exactly, case included.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NvpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for NvpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
