//! Structured bill information in the Swico `//S1` syntax.
//!
//! The string form goes into the bill information field of the payload,
//! e.g. `//S1/10/10201409/11/200701/32/7.7/40/0:30`.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date or period the VAT statement refers to (tag `/31/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VatDate {
    /// Single date of supply.
    Date(NaiveDate),
    /// Service period, start and end inclusive.
    Period(NaiveDate, NaiveDate),
}

/// VAT rate in percent, optionally with the net amount it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatRate {
    pub rate: Decimal,
    pub net_amount: Option<Decimal>,
}

impl VatRate {
    /// Rate applying to the whole invoice amount.
    pub fn whole(rate: Decimal) -> Self {
        Self {
            rate,
            net_amount: None,
        }
    }

    pub fn partial(rate: Decimal, net_amount: Decimal) -> Self {
        Self {
            rate,
            net_amount: Some(net_amount),
        }
    }
}

/// Cash discount in percent granted when paying within `days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCondition {
    pub discount: Decimal,
    pub days: u32,
}

/// Swico structured bill information, version `S1`.
///
/// ```
/// use chrono::NaiveDate;
/// use qrbill::core::{BillInformation, PaymentCondition};
/// use rust_decimal_macros::dec;
///
/// let info = BillInformation::new()
///     .invoice_number("10201409")
///     .invoice_date(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap())
///     .payment_condition(PaymentCondition { discount: dec!(0), days: 30 });
///
/// assert_eq!(info.to_string(), "//S1/10/10201409/11/200701/40/0:30");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillInformation {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub customer_reference: Option<String>,
    /// UID number without the `CHE` prefix and separators.
    pub vat_number: Option<String>,
    pub vat_date: Option<VatDate>,
    pub vat_rates: Vec<VatRate>,
    pub import_tax: Vec<VatRate>,
    pub payment_conditions: Vec<PaymentCondition>,
}

impl BillInformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invoice_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = Some(number.into());
        self
    }

    pub fn invoice_date(mut self, date: NaiveDate) -> Self {
        self.invoice_date = Some(date);
        self
    }

    pub fn customer_reference(mut self, reference: impl Into<String>) -> Self {
        self.customer_reference = Some(reference.into());
        self
    }

    pub fn vat_number(mut self, number: impl Into<String>) -> Self {
        self.vat_number = Some(number.into());
        self
    }

    pub fn vat_date(mut self, date: VatDate) -> Self {
        self.vat_date = Some(date);
        self
    }

    pub fn vat_rate(mut self, rate: VatRate) -> Self {
        self.vat_rates.push(rate);
        self
    }

    pub fn import_tax(mut self, rate: VatRate) -> Self {
        self.import_tax.push(rate);
        self
    }

    pub fn payment_condition(mut self, condition: PaymentCondition) -> Self {
        self.payment_conditions.push(condition);
        self
    }
}

impl fmt::Display for BillInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("//S1")?;

        if let Some(number) = &self.invoice_number {
            write!(f, "/10/{}", escape(number))?;
        }
        if let Some(date) = self.invoice_date {
            write!(f, "/11/{}", date.format("%y%m%d"))?;
        }
        if let Some(reference) = &self.customer_reference {
            write!(f, "/20/{}", escape(reference))?;
        }
        if let Some(number) = &self.vat_number {
            write!(f, "/30/{}", escape(number))?;
        }
        match self.vat_date {
            Some(VatDate::Date(date)) => write!(f, "/31/{}", date.format("%y%m%d"))?,
            Some(VatDate::Period(start, end)) => write!(
                f,
                "/31/{}{}",
                start.format("%y%m%d"),
                end.format("%y%m%d")
            )?,
            None => {}
        }
        if !self.vat_rates.is_empty() {
            write!(f, "/32/{}", join_rates(&self.vat_rates))?;
        }
        if !self.import_tax.is_empty() {
            write!(f, "/33/{}", join_rates(&self.import_tax))?;
        }
        if !self.payment_conditions.is_empty() {
            let conditions = self
                .payment_conditions
                .iter()
                .map(|c| format!("{}:{}", c.discount, c.days))
                .collect::<Vec<_>>()
                .join(";");
            write!(f, "/40/{conditions}")?;
        }
        Ok(())
    }
}

fn join_rates(rates: &[VatRate]) -> String {
    rates
        .iter()
        .map(|r| match r.net_amount {
            Some(amount) => format!("{}:{}", r.rate, amount),
            None => r.rate.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Backslash-escape the tag separator and the escape character itself.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '/' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
