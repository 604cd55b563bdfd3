use serde_json::Value;

use super::ApiError;
use crate::models::{MediaSeason, MediaSort};

/// The catalog refuses pages larger than this.
pub const MAX_PER_PAGE: u32 = 50;

pub fn validate_anime_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid anime ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_page(page: u32) -> Result<u32, ApiError> {
    if page == 0 {
        return Err(ApiError::validation("Page must be 1 or greater"));
    }
    Ok(page)
}

pub fn validate_per_page(per_page: u32) -> Result<u32, ApiError> {
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(ApiError::validation(format!(
            "Invalid perPage: {per_page}. Must be between 1 and {MAX_PER_PAGE}"
        )));
    }
    Ok(per_page)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(trimmed)
}

/// Parses a season name; an empty string means "no season".
pub fn parse_season(value: &str) -> Result<Option<MediaSeason>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e| ApiError::validation(format!("{e}")))
}

pub fn parse_sort(value: &str) -> Result<MediaSort, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|e| ApiError::validation(format!("{e}")))
}

/// Checks the shape of a GraphQL request body before it is forwarded.
pub fn validate_graphql_request(body: &Value) -> Result<(), ApiError> {
    let Some(object) = body.as_object() else {
        return Err(ApiError::validation("Request body must be a JSON object"));
    };

    match object.get("query").and_then(Value::as_str) {
        Some(query) if !query.trim().is_empty() => {}
        _ => {
            return Err(ApiError::validation(
                "Request body must include a non-empty 'query' string",
            ));
        }
    }

    match object.get("variables") {
        None | Some(Value::Null | Value::Object(_)) => {}
        Some(_) => return Err(ApiError::validation("'variables' must be an object")),
    }

    match object.get("operationName") {
        None | Some(Value::Null | Value::String(_)) => {}
        Some(_) => return Err(ApiError::validation("'operationName' must be a string")),
    }

    Ok(())
}
