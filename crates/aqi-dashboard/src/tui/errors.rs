//! User-friendly error message formatting.
//!
//! Converts client error strings into a short message plus an actionable
//! suggestion for the status bar.

/// Convert a technical error message to a user-friendly message with guidance.
///
/// Takes the raw error string and returns a tuple of (short_message, suggestion).
pub fn format_error_with_guidance(error: &str) -> (String, Option<String>) {
    let error_lower = error.to_lowercase();

    // Timeouts surface through reqwest as "operation timed out"
    if error_lower.contains("timed out") || error_lower.contains("timeout") {
        return (
            "Request timed out".to_string(),
            Some("The backend may be busy loading its model. It will be retried on the next poll.".to_string()),
        );
    }

    if error_lower.contains("not reachable")
        || error_lower.contains("connection refused")
        || error_lower.contains("error sending request")
        || error_lower.contains("dns error")
    {
        return (
            "Backend not reachable".to_string(),
            Some("Start the backend server or point --api-url / AQI_API_URL at it.".to_string()),
        );
    }

    if error_lower.contains("invalid url") {
        return (
            "Invalid backend URL".to_string(),
            Some("Use an absolute URL such as http://localhost:5000.".to_string()),
        );
    }

    if error_lower.contains("invalid argument") || error_lower.contains("finite") {
        return (
            "Invalid value".to_string(),
            Some("Enter a number, for example 42 or 137.5.".to_string()),
        );
    }

    if error_lower.contains("api error (5") {
        return (
            "Backend error".to_string(),
            Some("The server failed to handle the request. Check the backend logs.".to_string()),
        );
    }

    if error_lower.contains("api error (4") {
        return (
            "Request rejected".to_string(),
            Some("The backend did not accept the request. It may be an incompatible version.".to_string()),
        );
    }

    if error_lower.contains("decoding") || error_lower.contains("expected") {
        return (
            "Unexpected response".to_string(),
            Some("The server answered with data this dashboard cannot read.".to_string()),
        );
    }

    // Default: truncate long errors
    let short = if error.chars().count() > 60 {
        let truncated: String = error.chars().take(57).collect();
        format!("{}...", truncated)
    } else {
        error.to_string()
    };

    (short, None)
}
