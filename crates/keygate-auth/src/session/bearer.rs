//! `Authorization: Bearer <token>` parsing.

use keygate_core::error::AppError;

const SCHEME: &str = "Bearer";

/// Extracts the token from an `Authorization` header value.
///
/// A missing or blank header is `Unauthorized`; anything that is not
/// `Bearer <token>` is `BadRequest`.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let value = match header.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AppError::unauthorized("missing authorization header")),
    };

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme == SCHEME => Ok(token),
        _ => Err(AppError::bad_request("malformed authorization header")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_core::error::ErrorKind;

    #[test]
    fn test_extracts_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(extract_bearer_token(Some("  Bearer   abc  ")).unwrap(), "abc");
    }

    #[test]
    fn test_missing_header_unauthorized() {
        for header in [None, Some(""), Some("   ")] {
            let err = extract_bearer_token(header).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Unauthorized);
        }
    }

    #[test]
    fn test_malformed_header_bad_request() {
        for header in ["abc.def.ghi", "Basic dXNlcjpwdw==", "Bearer", "Bearer a b"] {
            let err = extract_bearer_token(Some(header)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::BadRequest, "{header}");
        }
    }
}
