use crate::utils::error::{CatalogError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// Profile token 會被組進檔名標記 `__ENTSOE_<token>BD_`，只允許英數字
pub fn validate_profile_token(field_name: &str, token: &str) -> Result<()> {
    validate_non_empty_string(field_name, token)?;

    if !token.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: token.to_string(),
            reason: "Profile must contain only ASCII letters and digits".to_string(),
        });
    }
    Ok(())
}

pub fn validate_profiles(field_name: &str, profiles: &[String]) -> Result<()> {
    if profiles.is_empty() {
        return Err(CatalogError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    for profile in profiles {
        validate_profile_token(field_name, profile)?;
    }
    Ok(())
}
