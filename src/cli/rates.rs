use std::collections::HashMap;

use comfy_table::{Cell, Table};

use crate::error::{Result, SoukError};
use crate::settings::{load_settings, save_settings};

pub fn run(set: &[String]) -> Result<()> {
    let mut settings = load_settings();

    if !set.is_empty() {
        // Replace, never merge. The base currency stays pinned at 1.
        let mut table = settings.rate_table();
        table.set_rates(parse_rate_specs(set)?);
        settings.rates = table.rates().clone();
        save_settings(&settings)?;
        println!("Updated rates ({} currencies)", settings.rates.len());
    }

    let table = settings.rate_table();
    let mut listing = Table::new();
    listing.set_header(vec!["Currency", "Rate"]);
    for code in table.currencies() {
        let note = if code == table.base() { " (base)" } else { "" };
        listing.add_row(vec![
            Cell::new(format!("{code}{note}")),
            Cell::new(format!(
                "1 {code} = {:.4} {}",
                table.rate(code)?,
                table.base()
            )),
        ]);
    }
    println!("Exchange rates\n{listing}");
    Ok(())
}

fn parse_rate_specs(specs: &[String]) -> Result<HashMap<String, f64>> {
    let mut rates = HashMap::new();
    for spec in specs {
        let (code, rate) = spec
            .split_once('=')
            .ok_or_else(|| SoukError::Other(format!("Invalid --set value: {spec} (expected CODE=RATE)")))?;
        let rate: f64 = rate
            .trim()
            .parse()
            .map_err(|_| SoukError::Other(format!("Invalid rate in --set value: {spec}")))?;
        if rate <= 0.0 || !rate.is_finite() {
            return Err(SoukError::Other(format!(
                "Rate must be a positive number: {spec}"
            )));
        }
        rates.insert(code.trim().to_uppercase(), rate);
    }
    Ok(rates)
}
