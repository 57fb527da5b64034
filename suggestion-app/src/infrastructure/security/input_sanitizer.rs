use suggestion_errors::AppError;

pub struct InputSanitizer;

impl InputSanitizer {
    /// Title and description must both be present and non-empty. Content
    /// and length are not checked.
    pub fn validate_suggestion(
        title: Option<String>,
        description: Option<String>,
    ) -> Result<(String, String), AppError> {
        match (Self::present(title), Self::present(description)) {
            (Some(title), Some(description)) => Ok((title, description)),
            _ => Err(AppError::Validation(
                "Title and description are required".to_string(),
            )),
        }
    }

    pub fn validate_user_id(user_id: Option<String>) -> Result<String, AppError> {
        Self::present(user_id).ok_or_else(|| AppError::Validation("User ID is required".to_string()))
    }

    fn present(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.is_empty())
    }
}
