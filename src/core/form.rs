//! User-editable conversion form kept in sync with the rate store.

use crate::core::conversion::ConversionResult;
use crate::core::currency::Currency;
use crate::core::store::StoreState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConverterForm {
    pub from: Option<Currency>,
    pub to: Option<Currency>,
    /// Raw amount text as typed by the user.
    pub amount: String,
    pub result: Option<ConversionResult>,
    pub reversed: bool,
}

impl ConverterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_from(&mut self, currency: Currency, state: &StoreState) {
        self.from = Some(currency);
        self.recompute(state);
    }

    pub fn set_to(&mut self, currency: Currency, state: &StoreState) {
        self.to = Some(currency);
        self.recompute(state);
    }

    pub fn set_amount(&mut self, amount: impl Into<String>, state: &StoreState) {
        self.amount = amount.into();
        self.recompute(state);
    }

    /// Swaps the selected currencies.
    pub fn reverse(&mut self, state: &StoreState) {
        std::mem::swap(&mut self.from, &mut self.to);
        self.reversed = !self.reversed;
        self.recompute(state);
    }

    /// Picks currencies by code from the store's currency list. Unknown codes leave the
    /// selection untouched.
    pub fn select_codes(&mut self, from: &str, to: &str, state: &StoreState) {
        if let Some(currency) = state.currency(from) {
            self.from = Some(currency.clone());
        }
        if let Some(currency) = state.currency(to) {
            self.to = Some(currency.clone());
        }
        self.recompute(state);
    }

    /// Re-evaluates the result against a newly published store state.
    pub fn sync(&mut self, state: &StoreState) {
        self.recompute(state);
    }

    /// The amount, if the text is a positive finite number.
    pub fn parsed_amount(&self) -> Option<f64> {
        parse_amount(&self.amount)
    }

    fn recompute(&mut self, state: &StoreState) {
        self.result = match (&self.from, &self.to, self.parsed_amount()) {
            (Some(from), Some(to), Some(amount)) => state.convert(&from.code, &to.code, amount),
            _ => None,
        };
    }
}

pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}
