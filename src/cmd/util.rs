use bspdoc::bsp::{BspError, Result};

/// Parse a decimal lump index argument.
pub(crate) fn parse_lump_index(value: &str) -> Result<u32> {
	value.parse::<u32>().map_err(|_| BspError::InvalidLumpIndex { value: value.to_owned() })
}

/// Print a payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: {err}"),
	}
}
