//! Hand-off files shared between separate runs and processes
//!
//! One writer, one reader, last write wins. Nothing here locks.

use crate::normalize::normalize_hotel;
use crate::{HotelRecord, PlannerError};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// First line that starts with `word`, trimmed; `None` if absent or the file does not exist
pub fn read_line_starting_with(path: &Path, word: &str) -> Result<Option<String>, PlannerError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Hand-off file not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.starts_with(word) {
            return Ok(Some(line.trim().to_string()));
        }
    }

    Ok(None)
}

/// Pretty-print a value to `path`, replacing any previous contents
pub fn dump_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PlannerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "Wrote JSON dump");
    Ok(())
}

/// Save the raw hotel listing for a later lookup by name
pub fn save_hotel_listing(path: &Path, hotels: &[Value]) -> Result<(), PlannerError> {
    dump_json(path, hotels)?;
    info!(path = %path.display(), hotels = hotels.len(), "Saved hotel listing");
    Ok(())
}

/// Find a hotel by exact name in a saved listing
pub fn find_hotel_by_name(path: &Path, name: &str) -> Result<Option<HotelRecord>, PlannerError> {
    let contents = fs::read_to_string(path)?;
    let hotels: Vec<Value> = serde_json::from_str(&contents)?;

    Ok(hotels
        .iter()
        .find(|hotel| hotel.get("name").and_then(Value::as_str) == Some(name))
        .map(normalize_hotel))
}
