// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use ecotrack::error::AppError;

#[test]
fn test_unknown_activity_type_is_bad_request() {
    let err = AppError::UnknownActivityType {
        category: "travel".to_string(),
        activity_type: "Helicopter".to_string(),
    };
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_invalid_amount_is_bad_request() {
    let err = AppError::InvalidAmount("amount must be non-negative, got -1".to_string());
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_external_api_is_bad_gateway() {
    let err = AppError::ExternalApi("AI gateway returned 500".to_string());
    assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn test_database_error_is_internal() {
    let err = AppError::Database("connection refused".to_string());
    assert_eq!(
        err.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_unauthorized_variants() {
    assert_eq!(
        AppError::Unauthorized.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::InvalidToken.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
}

#[test]
fn test_not_found_is_404() {
    let err = AppError::NotFound("Challenge abc".to_string());
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_error_message_names_the_offending_type() {
    let err = AppError::UnknownActivityType {
        category: "food".to_string(),
        activity_type: "Rocket Fuel".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("Rocket Fuel"));
    assert!(msg.contains("food"));
}
