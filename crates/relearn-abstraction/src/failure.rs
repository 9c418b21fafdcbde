//! Uniform failure messages for non-success responses.

use crate::HttpResponse;

/// Builds the diagnostic reported for a failed request.
///
/// The message has exactly three lines:
/// 1. `The request failed with status code: {code}` plus the reason phrase when known
/// 2. every header as `Name: value`, joined by `; `
/// 3. the raw response body
pub fn format_failed_response(response: &HttpResponse) -> String {
    let status = match response.reason.as_deref() {
        Some(reason) if !reason.is_empty() => format!("{} {}", response.status, reason),
        _ => response.status.to_string(),
    };

    let headers = response
        .headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("; ");

    format!("The request failed with status code: {}\n{}\n{}", status, headers, response.body)
}
