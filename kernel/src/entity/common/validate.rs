use crate::KernelError;
use error_stack::Report;

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn require_text(field: &'static str, value: String) -> error_stack::Result<String, KernelError> {
    if value.trim().is_empty() {
        return Err(Report::new(KernelError::Validation { field })
            .attach_printable(format!("`{field}` must not be blank")));
    }
    Ok(value)
}

/// Rejects identifiers that are zero or negative.
pub fn require_positive(field: &'static str, id: i64) -> error_stack::Result<i64, KernelError> {
    if id <= 0 {
        return Err(Report::new(KernelError::Validation { field })
            .attach_printable(format!("`{field}` must be a positive integer, got {id}")));
    }
    Ok(id)
}

#[cfg(test)]
mod test {
    use super::{require_positive, require_text};
    use crate::KernelError;

    #[test]
    fn blank_text_is_rejected() {
        let err = require_text("title", "   ".to_string()).unwrap_err();
        assert_eq!(
            err.current_context(),
            &KernelError::Validation { field: "title" }
        );
        assert_eq!(require_text("title", "Dune".to_string()).unwrap(), "Dune");
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        assert!(require_positive("bookId", 0).is_err());
        assert!(require_positive("bookId", -3).is_err());
        assert_eq!(require_positive("bookId", 7).unwrap(), 7);
    }
}
