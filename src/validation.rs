use axum::http::StatusCode;
use axum::Json;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

// File size limit: 25MB per attachment
pub const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;
pub const MAX_FILES: usize = 3;

// Consumer mail providers only. Rejecting corporate/custom domains is a
// business rule, not a technical limitation.
pub const ALLOWED_EMAIL_DOMAINS: [&str; 10] = [
    "gmail.com",
    "icloud.com",
    "yahoo.com",
    "outlook.com",
    "hotmail.com",
    "aol.com",
    "protonmail.com",
    "zoho.com",
    "mail.com",
    "yandex.com",
];

pub const ALLOWED_FILE_TYPES: [&str; 8] = [
    "application/pdf",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// A field-level rejection. The display string is the exact message the
/// frontend shows, so it must stay stable; clients that want something
/// sturdier than prose can route on `code()` and `field()` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Please enter a valid email address")]
    InvalidEmailSyntax,
    #[error("Please use a valid email provider (e.g., Gmail, iCloud, Outlook, Yahoo, etc.)")]
    DisallowedEmailDomain,
    #[error("Invalid contact type")]
    InvalidContactType,
    #[error("Email already registered")]
    EmailAlreadyRegistered,
    #[error("File size must be less than 25MB")]
    FileTooLarge,
    #[error("Invalid file type. Allowed: PDF, PPT, XLS, JPG")]
    UnsupportedFileType,
    #[error("You cannot upload more than 3 files.")]
    TooManyFiles,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "MISSING_FIELDS",
            ValidationError::InvalidEmailSyntax => "INVALID_EMAIL_SYNTAX",
            ValidationError::DisallowedEmailDomain => "DISALLOWED_EMAIL_DOMAIN",
            ValidationError::InvalidContactType => "INVALID_CONTACT_TYPE",
            ValidationError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            ValidationError::FileTooLarge => "FILE_TOO_LARGE",
            ValidationError::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            ValidationError::TooManyFiles => "TOO_MANY_FILES",
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingFields => None,
            ValidationError::InvalidEmailSyntax
            | ValidationError::DisallowedEmailDomain
            | ValidationError::EmailAlreadyRegistered => Some("email"),
            ValidationError::InvalidContactType => Some("contactType"),
            ValidationError::FileTooLarge
            | ValidationError::UnsupportedFileType
            | ValidationError::TooManyFiles => Some("files"),
        }
    }

    pub fn into_rejection(self) -> (StatusCode, Json<Value>) {
        let mut body = json!({
            "success": false,
            "code": self.code(),
            "message": self.to_string(),
        });
        if let Some(field) = self.field() {
            body["field"] = json!(field);
        }
        (StatusCode::BAD_REQUEST, Json(body))
    }
}

/// Raw text fields as decoded from the multipart form. Absent fields
/// stay empty and fail the required-fields check.
#[derive(Default)]
pub struct ContactFields {
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub project_details: String,
    pub contact_type: String,
}

/// Normalized, fully validated contact submission ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContact {
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub project_details: String,
    pub contact_type: String,
}

/// A decoded file part. Zero-length parts (empty file inputs submitted
/// by browsers) are filtered out before this struct is built.
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub data: bytes::Bytes,
}

/// Syntax check plus the consumer-domain allow-list. Returns the
/// lowercased address on success.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    if !EMAIL_REGEX.is_match(raw) {
        return Err(ValidationError::InvalidEmailSyntax);
    }
    // The regex forbids '@' inside the local and domain parts, so there
    // is exactly one '@' here.
    let domain = raw
        .split('@')
        .nth(1)
        .ok_or(ValidationError::InvalidEmailSyntax)?
        .to_lowercase();
    if !ALLOWED_EMAIL_DOMAINS.contains(&domain.as_str()) {
        return Err(ValidationError::DisallowedEmailDomain);
    }
    Ok(raw.to_lowercase())
}

/// First failure wins: required fields, then email syntax, then email
/// domain, then contact type.
pub fn validate_contact(fields: &ContactFields) -> Result<ValidatedContact, ValidationError> {
    if fields.full_name.is_empty()
        || fields.email.is_empty()
        || fields.subject.is_empty()
        || fields.project_details.is_empty()
        || fields.contact_type.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }

    let email = normalize_email(&fields.email)?;

    // Case-sensitive on purpose: the UI submits these from radio buttons.
    if fields.contact_type != "Individual" && fields.contact_type != "Business" {
        return Err(ValidationError::InvalidContactType);
    }

    Ok(ValidatedContact {
        full_name: fields.full_name.clone(),
        email,
        subject: fields.subject.clone(),
        project_details: fields.project_details.clone(),
        contact_type: fields.contact_type.to_uppercase(),
    })
}

/// Count, size and declared-MIME checks over the accepted file parts.
pub fn validate_files(files: &[UploadedFile]) -> Result<(), ValidationError> {
    if files.len() > MAX_FILES {
        return Err(ValidationError::TooManyFiles);
    }
    for file in files {
        if file.data.len() > MAX_FILE_SIZE {
            return Err(ValidationError::FileTooLarge);
        }
        if !ALLOWED_FILE_TYPES.contains(&file.content_type.as_str()) {
            return Err(ValidationError::UnsupportedFileType);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ContactFields {
        ContactFields {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@gmail.com".to_string(),
            subject: "Project inquiry".to_string(),
            project_details: "A small analytical engine".to_string(),
            contact_type: "Business".to_string(),
        }
    }

    fn file(size: usize, content_type: &str) -> UploadedFile {
        UploadedFile {
            name: "deck.pdf".to_string(),
            content_type: content_type.to_string(),
            data: bytes::Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn accepts_a_complete_submission() {
        let validated = validate_contact(&fields()).unwrap();
        assert_eq!(validated.email, "ada@gmail.com");
        assert_eq!(validated.contact_type, "BUSINESS");
    }

    #[test]
    fn any_missing_field_is_rejected_first() {
        let wipes: [fn(&mut ContactFields); 5] = [
            |f| f.full_name.clear(),
            |f| f.email.clear(),
            |f| f.subject.clear(),
            |f| f.project_details.clear(),
            |f| f.contact_type.clear(),
        ];
        for wipe in wipes {
            let mut f = fields();
            wipe(&mut f);
            assert_eq!(validate_contact(&f), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn email_syntax_is_checked() {
        for bad in [
            "no-at-sign.com",
            "two@@gmail.com",
            "spaces in@gmail.com",
            "nodot@gmailcom",
            "@gmail.com",
        ] {
            assert_eq!(
                normalize_email(bad),
                Err(ValidationError::InvalidEmailSyntax),
                "{bad}"
            );
        }
    }

    #[test]
    fn corporate_domains_are_rejected() {
        assert_eq!(
            normalize_email("user@company.io"),
            Err(ValidationError::DisallowedEmailDomain)
        );
    }

    #[test]
    fn domain_check_is_case_insensitive_and_normalizes() {
        assert_eq!(normalize_email("Ada@GMAIL.com").unwrap(), "ada@gmail.com");
    }

    #[test]
    fn contact_type_is_case_sensitive() {
        let mut f = fields();
        f.contact_type = "business".to_string();
        assert_eq!(validate_contact(&f), Err(ValidationError::InvalidContactType));
        f.contact_type = "Robot".to_string();
        assert_eq!(validate_contact(&f), Err(ValidationError::InvalidContactType));
    }

    #[test]
    fn file_at_the_size_boundary_is_accepted() {
        let ok = file(MAX_FILE_SIZE - 1, "application/pdf");
        assert_eq!(validate_files(std::slice::from_ref(&ok)), Ok(()));
        let too_big = file(MAX_FILE_SIZE + 1, "application/pdf");
        assert_eq!(
            validate_files(std::slice::from_ref(&too_big)),
            Err(ValidationError::FileTooLarge)
        );
    }

    #[test]
    fn undeclared_mime_types_are_rejected() {
        let txt = file(10, "text/plain");
        assert_eq!(
            validate_files(std::slice::from_ref(&txt)),
            Err(ValidationError::UnsupportedFileType)
        );
    }

    #[test]
    fn more_than_three_files_is_rejected() {
        let files: Vec<UploadedFile> = (0..4).map(|_| file(10, "image/png")).collect();
        assert_eq!(validate_files(&files), Err(ValidationError::TooManyFiles));
    }

    #[test]
    fn rejection_body_carries_code_and_field() {
        let (status, Json(body)) = ValidationError::FileTooLarge.into_rejection();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "FILE_TOO_LARGE");
        assert_eq!(body["field"], "files");
        assert_eq!(body["message"], "File size must be less than 25MB");
    }
}
