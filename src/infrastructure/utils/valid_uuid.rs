use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path id. Anything that is not a UUID cannot name a stored
/// record, so it reports `not_found` rather than a format error.
pub fn valid_uuid(id: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_not_found() {
        let err = valid_uuid("not-a-uuid", "Project not found").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Project not found"));
    }

    #[test]
    fn well_formed_ids_parse() {
        let id = Uuid::new_v4();
        assert_eq!(valid_uuid(&id.to_string(), "x").unwrap(), id);
    }
}
