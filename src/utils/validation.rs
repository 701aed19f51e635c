use crate::utils::error::{RaffleError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Into<String>, reason: impl Into<String>) -> RaffleError {
    RaffleError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.into(),
        reason: reason.into(),
    }
}

/// Sheet links and proxies are fetched with reqwest, so only http(s) makes sense.
pub fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("Invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(field, value, format!("Expected http or https, got {}", other))),
    }
}

pub fn validate_state_dir(field: &str, dir: &str) -> Result<()> {
    if dir.trim().is_empty() {
        return Err(invalid(field, dir, "State directory cannot be empty"));
    }
    if dir.contains('\0') {
        return Err(invalid(field, dir, "State directory contains a NUL byte"));
    }
    Ok(())
}

pub fn validate_nonzero_secs(field: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(invalid(field, "0", "Must be at least 1 second"));
    }
    Ok(())
}

/// A sheet reference is either a full link or a bare spreadsheet ID.
pub fn validate_sheet_reference(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Sheet link cannot be blank"));
    }
    if value.contains("://") {
        validate_http_url(field, value.trim())?;
    }
    Ok(())
}

/// 上傳檔案只接受 .csv（不分大小寫）
pub fn validate_csv_extension(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        Ok(())
    } else {
        Err(RaffleError::FormatError {
            path: path.display().to_string(),
        })
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| RaffleError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// Proxy templates are either `direct` or an http(s) URL carrying a `{url}` placeholder.
pub fn validate_proxy_template(field: &str, template: &str) -> Result<()> {
    if template == "direct" {
        return Ok(());
    }
    if !template.contains("{url}") {
        return Err(invalid(field, template, "Proxy template must contain a {url} placeholder"));
    }
    validate_http_url(field, &template.replace("{url}", "placeholder"))
}

pub fn validate_proxy_list(field: &str, proxies: &[String]) -> Result<()> {
    if proxies.is_empty() {
        return Err(invalid(field, "[]", "At least one proxy (or \"direct\") is required"));
    }
    proxies
        .iter()
        .try_for_each(|proxy| validate_proxy_template(field, proxy))
}
