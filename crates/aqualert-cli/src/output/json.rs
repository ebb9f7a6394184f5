use aqualert_core::error::AqualertError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), AqualertError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
