use super::ui;
use crate::core::catalog;
use crate::core::currency::Currency;
use crate::core::store::RateStore;
use anyhow::{Result, anyhow};
use comfy_table::Cell;

/// Prints every currency in the latest snapshot along with its rate against the base.
pub async fn run(store: &RateStore, filter: Option<&str>) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    store.refresh().await;
    pb.finish_and_clear();

    let state = store.state();
    if let Some(error) = &state.error {
        return Err(anyhow!(error.clone()));
    }
    let Some(snapshot) = state.snapshot else {
        return Err(anyhow!("No exchange rates available"));
    };

    let currencies = filter_currencies(&state.currencies, filter);
    if currencies.is_empty() {
        println!("No currencies match the filter.");
        return Ok(());
    }

    println!(
        "\nRates against {}",
        ui::style_text(&snapshot.base, ui::StyleType::Title)
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Rate"),
    ]);
    for currency in currencies {
        table.add_row(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            ui::format_optional_cell(snapshot.rate(&currency.code), ui::format_rate),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Prints the built-in list of known currency names.
pub fn list_known(filter: Option<&str>) {
    let currencies = catalog::all_currencies();
    for currency in filter_currencies(&currencies, filter) {
        println!("{currency}");
    }
}

/// Keeps currencies whose code or name contains `filter`, ignoring case.
pub fn filter_currencies<'a>(currencies: &'a [Currency], filter: Option<&str>) -> Vec<&'a Currency> {
    let needle = filter.map(str::trim).unwrap_or_default().to_lowercase();
    currencies
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.code.to_lowercase().contains(&needle)
                || c.name.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn currencies() -> Vec<Currency> {
        vec![
            Currency::new("EUR", "Euro"),
            Currency::new("GBP", "British Pound Sterling"),
            Currency::new("USD", "US Dollar"),
        ]
    }

    #[test]
    fn test_filter_by_code_or_name() {
        let all = currencies();

        let by_code: Vec<&str> = filter_currencies(&all, Some("usd"))
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(by_code, vec!["USD"]);

        let by_name: Vec<&str> = filter_currencies(&all, Some("pound"))
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(by_name, vec!["GBP"]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let all = currencies();
        assert_eq!(filter_currencies(&all, None).len(), 3);
        assert_eq!(filter_currencies(&all, Some("  ")).len(), 3);
        assert!(filter_currencies(&all, Some("yen")).is_empty());
    }
}
