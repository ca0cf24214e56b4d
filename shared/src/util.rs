/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a string entity ID.
///
/// Layout (53 bits, survives a round trip through spreadsheet cells
/// that treat numbers as IEEE doubles):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
///
/// The remote sheet stores IDs as plain cell values, so every ID in
/// the system is a string; numeric IDs coming back from the sheet are
/// re-stringified during normalization.
pub fn entity_id() -> String {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    ((ts << 12) | rand_bits).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_are_numeric_strings() {
        let id = entity_id();
        assert!(id.parse::<i64>().is_ok());
    }

    #[test]
    fn entity_ids_fit_in_f64_exactly() {
        let id: i64 = entity_id().parse().unwrap();
        assert!(id < (1i64 << 53));
        assert_eq!(id as f64 as i64, id);
    }
}
