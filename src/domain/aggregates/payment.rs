//! Gateway return redirects
//!
//! Momo and VNPay send the shopper back with the transaction result in the
//! query string. Signature checks happen server-side; here we only read the
//! result code and the invoice reference.

use crate::domain::aggregates::invoice::PaymentMethod;
use crate::domain::events::{InvoiceEvent, StoreEvent};
use crate::Id;

pub const MOMO_RESULT: &str = "resultCode";
pub const MOMO_ORDER: &str = "orderId";
pub const VNPAY_RESULT: &str = "vnp_ResponseCode";
pub const VNPAY_ORDER: &str = "vnp_TxnRef";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentReturn {
    method: PaymentMethod,
    params: Vec<(String, String)>,
}

impl PaymentReturn {
    pub fn momo(params: Vec<(String, String)>) -> Self { Self { method: PaymentMethod::Momo, params } }
    pub fn vnpay(params: Vec<(String, String)>) -> Self { Self { method: PaymentMethod::VnPay, params } }

    pub fn method(&self) -> PaymentMethod { self.method }
    pub fn params(&self) -> &[(String, String)] { &self.params }

    fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.trim())
    }

    fn result_code(&self) -> Option<&str> {
        match self.method {
            PaymentMethod::Momo => self.param(MOMO_RESULT),
            PaymentMethod::VnPay => self.param(VNPAY_RESULT),
            PaymentMethod::Cod => None,
        }
    }

    pub fn is_success(&self) -> bool {
        match (self.method, self.result_code()) {
            (PaymentMethod::Momo, Some(code)) => code.parse::<i64>() == Ok(0),
            (PaymentMethod::VnPay, Some(code)) => code == "00",
            _ => false,
        }
    }

    /// Invoice id from the gateway order reference, either `42` or `42-<suffix>`.
    pub fn invoice_id(&self) -> Option<Id> {
        let reference = match self.method {
            PaymentMethod::Momo => self.param(MOMO_ORDER),
            PaymentMethod::VnPay => self.param(VNPAY_ORDER),
            PaymentMethod::Cod => None,
        }?;
        reference.split('-').next()?.parse().ok()
    }

    pub fn failure_reason(&self) -> String {
        let code = self.result_code().unwrap_or("missing");
        match self.method {
            PaymentMethod::Momo => self.param("message").filter(|m| !m.is_empty()).map(str::to_string)
                .unwrap_or_else(|| format!("Momo payment failed (code {code})")),
            _ => vnpay_reason(code).map(str::to_string).unwrap_or_else(|| format!("VNPay payment failed (code {code})")),
        }
    }

    pub fn event(&self) -> StoreEvent {
        StoreEvent::Invoice(InvoiceEvent::PaymentReturned { invoice_id: self.invoice_id(), method: self.method, success: self.is_success() })
    }
}

fn vnpay_reason(code: &str) -> Option<&'static str> {
    Some(match code {
        "07" => "Transaction flagged as suspicious",
        "09" => "Card is not registered for internet banking",
        "11" => "Payment window expired",
        "12" => "Card is locked",
        "24" => "Payment was cancelled",
        "51" => "Insufficient balance",
        "65" => "Daily transaction limit exceeded",
        "75" => "Bank is under maintenance",
        "79" => "Too many wrong password attempts",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_momo_result() {
        let ok = PaymentReturn::momo(pairs(&[("resultCode", "0"), ("orderId", "42-1700000000")]));
        assert!(ok.is_success());
        assert_eq!(ok.invoice_id(), Some(42));
        let failed = PaymentReturn::momo(pairs(&[("resultCode", "1006"), ("orderId", "42"), ("message", "User denied")]));
        assert!(!failed.is_success());
        assert_eq!(failed.failure_reason(), "User denied");
    }

    #[test]
    fn test_vnpay_result() {
        let ok = PaymentReturn::vnpay(pairs(&[("vnp_ResponseCode", "00"), ("vnp_TxnRef", "9")]));
        assert!(ok.is_success());
        assert_eq!(ok.invoice_id(), Some(9));
        let cancelled = PaymentReturn::vnpay(pairs(&[("vnp_ResponseCode", "24"), ("vnp_TxnRef", "9")]));
        assert!(!cancelled.is_success());
        assert_eq!(cancelled.failure_reason(), "Payment was cancelled");
        assert!(!PaymentReturn::vnpay(vec![]).is_success());
    }
}
