use crate::error::ApiError;
use crate::models::{NewClassSession, NewPlan, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_class(mut new: NewClassSession) -> Result<NewClassSession, ApiError> {
    new.title = new.title.trim().to_string();
    new.trainer_name = new.trainer_name.trim().to_string();

    if new.title.is_empty() {
        return Err(ApiError::BadRequest("title is required".into()));
    }
    if new.trainer_name.is_empty() {
        return Err(ApiError::BadRequest("trainer is required".into()));
    }
    if new.duration_minutes == 0 {
        return Err(ApiError::BadRequest("durationInMinutes must be positive".into()));
    }
    if new.capacity == 0 {
        return Err(ApiError::BadRequest("capacity must be positive".into()));
    }
    Ok(new)
}

pub fn validate_plan(mut new: NewPlan) -> Result<NewPlan, ApiError> {
    new.name = new.name.trim().to_string();
    new.features = new
        .features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    if new.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    if !new.price.is_finite() || new.price < 0.0 {
        return Err(ApiError::BadRequest("price must be a non-negative number".into()));
    }
    if new.duration_in_months == 0 {
        return Err(ApiError::BadRequest("durationInMonths must be positive".into()));
    }
    Ok(new)
}

pub fn validate_registration(mut req: RegisterRequest) -> Result<RegisterRequest, ApiError> {
    req.name = req.name.trim().to_string();
    req.email = normalize_email(&req.email);

    if req.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(req)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn class(title: &str, capacity: u32) -> NewClassSession {
        NewClassSession {
            title: title.to_string(),
            trainer_name: "Coach".to_string(),
            start_time: Utc::now(),
            duration_minutes: 60,
            capacity,
        }
    }

    #[test]
    fn test_validate_class() {
        assert_eq!(validate_class(class("  WOD ", 10)).unwrap().title, "WOD");
        assert!(validate_class(class("   ", 10)).is_err());
        assert!(validate_class(class("WOD", 0)).is_err());
    }

    #[test]
    fn test_validate_plan_drops_blank_features() {
        let plan = validate_plan(NewPlan {
            name: " Silver ".to_string(),
            price: 1500.0,
            duration_in_months: 1,
            features: vec!["Gym Access".to_string(), " ".to_string(), " Locker Room".to_string()],
            description: None,
        })
        .unwrap();
        assert_eq!(plan.name, "Silver");
        assert_eq!(plan.features, vec!["Gym Access", "Locker Room"]);
    }

    #[test]
    fn test_validate_plan_rejects_negative_price() {
        let result = validate_plan(NewPlan {
            name: "Free".to_string(),
            price: -1.0,
            duration_in_months: 1,
            features: vec![],
            description: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_registration() {
        let ok = validate_registration(RegisterRequest {
            name: "Ann".to_string(),
            email: " Ann@Example.COM ".to_string(),
            password: "password123".to_string(),
        })
        .unwrap();
        assert_eq!(ok.email, "ann@example.com");

        assert!(
            validate_registration(RegisterRequest {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                password: "short".to_string(),
            })
            .is_err()
        );
        assert!(
            validate_registration(RegisterRequest {
                name: "Ann".to_string(),
                email: "not-an-email".to_string(),
                password: "password123".to_string(),
            })
            .is_err()
        );
    }
}
