use crate::error::Result;
use crate::fmt::money;
use crate::settings::load_settings;

pub fn run(amount: f64, from: &str, to: &str) -> Result<()> {
    let settings = load_settings();
    let table = settings.rate_table();
    let from = from.to_uppercase();
    let to = to.to_uppercase();
    let converted = table.convert(amount, &from, &to)?;
    println!("{} = {}", money(amount, &from), money(converted, &to));
    Ok(())
}
