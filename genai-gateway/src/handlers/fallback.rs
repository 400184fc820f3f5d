use service_core::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound("The requested endpoint does not exist".to_string())
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed(
        "This endpoint does not support the requested HTTP method".to_string(),
    )
}
