use super::ui;
use crate::core::conversion::ConversionResult;
use crate::core::form::{ConverterForm, parse_amount};
use crate::core::store::{RateStore, StoreState};
use anyhow::{Result, anyhow, bail};

/// One row of output: the requested pair and its conversion, if one was possible.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionLine {
    pub from: String,
    pub to: String,
    pub result: Option<ConversionResult>,
}

pub async fn run(
    store: &RateStore,
    amount: &str,
    from: &str,
    targets: &[String],
    reverse: bool,
) -> Result<()> {
    if parse_amount(amount).is_none() {
        bail!("Invalid amount: {amount}. Enter a number greater than zero");
    }
    if reverse && targets.len() != 1 {
        bail!("--reverse needs exactly one target currency");
    }

    let pb = ui::new_spinner("Fetching exchange rates...");
    store.refresh().await;
    pb.finish_and_clear();

    let state = store.state();
    if let Some(error) = &state.error {
        return Err(anyhow!(error.clone()));
    }

    let lines = conversions(&state, amount, from, targets, reverse);
    display_results(&lines, &state);
    Ok(())
}

/// Converts `amount` from `from` into every target, going through the same form logic
/// an interactive front end would use.
pub fn conversions(
    state: &StoreState,
    amount: &str,
    from: &str,
    targets: &[String],
    reverse: bool,
) -> Vec<ConversionLine> {
    let from = from.trim().to_uppercase();
    targets
        .iter()
        .map(|target| {
            let to = target.trim().to_uppercase();
            let mut form = ConverterForm::new();
            form.set_amount(amount, state);
            form.select_codes(&from, &to, state);
            let (from, to) = if reverse {
                form.reverse(state);
                (to, from.clone())
            } else {
                (from.clone(), to)
            };
            ConversionLine {
                from,
                to,
                result: form.result,
            }
        })
        .collect()
}

fn display_results(lines: &[ConversionLine], state: &StoreState) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Amount"),
        ui::header_cell("Converted"),
        ui::header_cell("Rate"),
    ]);

    for line in lines {
        table.add_row(vec![
            comfy_table::Cell::new(&line.from),
            comfy_table::Cell::new(&line.to),
            ui::format_optional_cell(line.result.as_ref(), |r| ui::format_amount(r.amount)),
            ui::format_optional_cell(line.result.as_ref(), |r| ui::format_amount(r.converted_amount)),
            ui::format_optional_cell(line.result.as_ref(), |r| {
                format!("1 {} = {} {}", r.from, ui::format_rate(r.rate), r.to)
            }),
        ]);
    }

    println!("{table}");

    let missing: Vec<String> = lines
        .iter()
        .filter(|line| line.result.is_none())
        .map(|line| format!("{}/{}", line.from, line.to))
        .collect();
    if !missing.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("No rate available for: {}", missing.join(", ")),
                ui::StyleType::Error
            )
        );
    }

    if let Some(updated_at) = state.snapshot.as_ref().and_then(|s| s.updated_at) {
        println!(
            "{}",
            ui::style_text(
                &format!("Rates last updated {}", updated_at.format("%Y-%m-%d %H:%M UTC")),
                ui::StyleType::Subtle
            )
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;
    use crate::core::currency::RateSnapshot;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn loaded_state() -> StoreState {
        let rates = HashMap::from([
            ("USD".to_string(), 1.0),
            ("EUR".to_string(), 0.85),
            ("GBP".to_string(), 0.73),
        ]);
        StoreState {
            currencies: catalog::currencies_from(&rates),
            snapshot: Some(Arc::new(RateSnapshot::new("USD", rates))),
            is_loading: false,
            error: None,
        }
    }

    #[test]
    fn test_conversions_to_multiple_targets() {
        let targets = vec!["gbp".to_string(), "USD".to_string(), "ZZZ".to_string()];
        let lines = conversions(&loaded_state(), "100", "eur", &targets, false);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].from, "EUR");
        assert_eq!(lines[0].to, "GBP");
        let gbp = lines[0].result.as_ref().unwrap();
        assert!((gbp.converted_amount - 85.88).abs() < 0.01);

        let usd = lines[1].result.as_ref().unwrap();
        assert!((usd.converted_amount - 117.647).abs() < 0.001);

        assert_eq!(lines[2].to, "ZZZ");
        assert!(lines[2].result.is_none());
    }

    #[test]
    fn test_conversions_reversed() {
        let targets = vec!["GBP".to_string()];
        let lines = conversions(&loaded_state(), "73", "EUR", &targets, true);

        assert_eq!(lines[0].from, "GBP");
        assert_eq!(lines[0].to, "EUR");
        let result = lines[0].result.as_ref().unwrap();
        assert_eq!(result.from, "GBP");
        assert!((result.converted_amount - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversions_without_snapshot() {
        let targets = vec!["GBP".to_string()];
        let lines = conversions(&StoreState::default(), "1", "EUR", &targets, false);
        assert!(lines[0].result.is_none());
    }
}
