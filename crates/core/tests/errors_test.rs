use std::error::Error;
use volly_core::errors::{VollyError, VollyResult};

#[test]
fn test_volly_error_display() {
    let not_found = VollyError::NotFound("User not found".to_string());
    let validation = VollyError::Validation("Invalid input".to_string());
    let conflict = VollyError::Conflict("Already signed up".to_string());
    let directory = VollyError::Directory("upstream returned 500".to_string());
    let database = VollyError::Database(eyre::eyre!("Database connection failed"));
    let internal = VollyError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: User not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(conflict.to_string(), "Conflict: Already signed up");
    assert_eq!(
        directory.to_string(),
        "Identity directory error: upstream returned 500"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let volly_error = VollyError::Internal(Box::new(io_error));

    assert!(volly_error.source().is_some());
}

#[test]
fn test_volly_result() {
    let result: VollyResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: VollyResult<i32> = Err(VollyError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_trait_implementation() {
    let eyre_error = eyre::eyre!("Database error");
    let volly_error: VollyError = eyre_error.into();

    assert!(volly_error.to_string().contains("Database error"));
}

#[test]
fn test_box_error_conversion() {
    let boxed: Box<dyn Error + Send + Sync> =
        Box::new(std::io::Error::new(std::io::ErrorKind::Other, "IO error"));
    let volly_error: VollyError = boxed.into();

    assert!(volly_error.to_string().contains("Internal server error"));
}
