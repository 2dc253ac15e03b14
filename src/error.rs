use crate::auth::backend::AdminBackend;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::{fmt::Write, num::ParseIntError};
use uuid::Uuid;

pub type ShowcaseResult<T> = Result<T, ShowcaseError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ShowcaseError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Error serialising with rmp_serde"))]
    RmpSerdeEncode { source: rmp_serde::encode::Error },
    #[snafu(display("Error deserialising with rmp_serde"))]
    RmpSerdeDecode { source: rmp_serde::decode::Error },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to find student with UUID: {}", id))]
    MissingStudent { id: Uuid },
    #[snafu(display("Unknown department {:?}", name))]
    UnknownDepartment { name: String },
    #[snafu(display("Error with hashing/password verification"))]
    Bcrypt { source: bcrypt::BcryptError },
    #[snafu(display("Error joining blocking task"))]
    JoinBlockingTask { source: tokio::task::JoinError },
    #[snafu(display("Error with sessions"))]
    TowerSession {
        source: axum_login::tower_sessions::session::Error,
    },
    #[snafu(display("You need to be logged in as the admin to do that"))]
    NotLoggedIn,
    #[snafu(display("Error with multipart form input"))]
    Multipart {
        source: axum::extract::multipart::MultipartError,
    },
    #[snafu(display("Error parsing email address"))]
    Email { source: email_address::Error },
    #[snafu(display("Error with S3 Credentials"))]
    S3Creds {
        source: s3::creds::error::CredentialsError,
    },
    #[snafu(display("Error with S3"))]
    S3 { source: s3::error::S3Error },
    #[snafu(display("{:?} is not an image", file_name))]
    NotAnImage { file_name: String },
    #[snafu(display("Unable to parse {:?} as a number of students to seed", original))]
    ParseSeedCount {
        source: ParseIntError,
        original: String,
    },
}

impl From<axum_login::Error<AdminBackend>> for ShowcaseError {
    fn from(value: axum_login::Error<AdminBackend>) -> Self {
        match value {
            axum_login::Error::Session(source) => Self::TowerSession { source },
            axum_login::Error::Backend(backend) => backend,
        }
    }
}

impl ShowcaseError {
    ///this error's message, followed by the messages of everything in its source chain
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(inner) = source {
            let _ = write!(message, ": {inner}");
            source = inner.source();
        }
        message
    }

    pub fn hint(&self) -> FailureHint {
        FailureHint::classify(&self.full_message())
    }
}

/// A more specific explanation for a failed backend call, picked by looking at the error text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureHint {
    MissingBucket,
    RowLevelSecurity,
    PermissionDenied,
    MissingTable,
    Unknown,
}

impl FailureHint {
    pub fn classify(message: &str) -> Self {
        let normalised = message.to_lowercase();
        let has_any = |needles: &[&str]| needles.iter().any(|n| normalised.contains(n));

        if has_any(&[
            "bucket not found",
            "nosuchbucket",
            "specified bucket does not exist",
        ]) {
            Self::MissingBucket
        } else if has_any(&["row-level security"]) {
            Self::RowLevelSecurity
        } else if has_any(&[
            "permission denied",
            "unauthorized",
            "forbidden",
            "accessdenied",
        ]) {
            Self::PermissionDenied
        } else if has_any(&["does not exist", "not found", "42p01"]) {
            Self::MissingTable
        } else {
            Self::Unknown
        }
    }

    pub const fn describe(self, fallback: &'static str) -> &'static str {
        match self {
            Self::MissingBucket => {
                "Storage bucket not found. Create the configured bucket (\"student-images\" by default) and allow public reads on it."
            }
            Self::RowLevelSecurity => {
                "Write blocked by a row-level security policy. Allow INSERT and DELETE on the students table for the showcase database role."
            }
            Self::PermissionDenied => {
                "The storage or database backend rejected the request. Check the bucket credentials and the grants of the showcase database role."
            }
            Self::MissingTable => {
                "Database table \"students\" not found. Run the migrations in migrations/ against the configured database."
            }
            Self::Unknown => fallback,
        }
    }
}

impl IntoResponse for ShowcaseError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const NA: StatusCode = StatusCode::FORBIDDEN; //not allowed
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Showcase Error "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::OpenDatabase { .. } | Self::GetDatabaseConnection { .. } => ISE,
            Self::MakeQuery { source } => match source {
                sqlx::Error::RowNotFound => NF,
                _ => ISE,
            },
            Self::MigrateError { .. } => ISE,
            Self::RmpSerdeEncode { .. } => ISE,
            Self::RmpSerdeDecode { .. } => BI,
            Self::BadEnvVar { .. } | Self::ParsePort { .. } => ISE,
            Self::MissingStudent { .. } => NF,
            Self::UnknownDepartment { .. } => BI,
            Self::Bcrypt { .. } | Self::JoinBlockingTask { .. } => ISE,
            Self::TowerSession { .. } => ISE,
            Self::NotLoggedIn => NA,
            Self::Multipart { source } => source.status(),
            Self::Email { .. } => BI,
            Self::S3Creds { .. } | Self::S3 { .. } => ISE,
            Self::NotAnImage { .. } | Self::ParseSeedCount { .. } => BI,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_missing_bucket() {
        assert_eq!(
            FailureHint::classify("Got HTTP 404 with content '<Error><Code>NoSuchBucket</Code></Error>'"),
            FailureHint::MissingBucket
        );
        assert_eq!(
            FailureHint::classify("The specified bucket does not exist"),
            FailureHint::MissingBucket
        );
        assert_eq!(FailureHint::classify("Bucket not found"), FailureHint::MissingBucket);
    }

    #[test]
    fn classifies_policy_and_permissions() {
        assert_eq!(
            FailureHint::classify(
                "error returned from database: new row violates row-level security policy for table \"students\""
            ),
            FailureHint::RowLevelSecurity
        );
        assert_eq!(
            FailureHint::classify("error returned from database: permission denied for table students"),
            FailureHint::PermissionDenied
        );
        assert_eq!(
            FailureHint::classify("Got HTTP 403 with content '<Code>AccessDenied</Code>'"),
            FailureHint::PermissionDenied
        );
    }

    #[test]
    fn classifies_missing_table() {
        assert_eq!(
            FailureHint::classify("error returned from database: relation \"students\" does not exist"),
            FailureHint::MissingTable
        );
    }

    #[test]
    fn unknown_falls_back() {
        let hint = FailureHint::classify("connection reset by peer");
        assert_eq!(hint, FailureHint::Unknown);
        assert_eq!(hint.describe("Error uploading student."), "Error uploading student.");
    }

    #[test]
    fn full_message_includes_sources() {
        let err = ShowcaseError::MakeQuery {
            source: sqlx::Error::Protocol("relation \"students\" does not exist".into()),
        };
        assert!(err.full_message().starts_with("Error making SQL query: "));
        assert_eq!(err.hint(), FailureHint::MissingTable);
    }
}
