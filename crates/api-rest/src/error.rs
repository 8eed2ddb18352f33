//! Mapping of domain errors onto HTTP responses.

use api_shared::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use ward_core::{LedgerError, StoreError};

/// A rejected request: status code plus JSON error body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorRes,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorRes::new(message),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let status = match &err {
            LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
            LedgerError::AlreadyAdmitted { .. }
            | LedgerError::NotAdmitted { .. }
            | LedgerError::BedOccupied { .. }
            | LedgerError::SameBed { .. }
            | LedgerError::InvalidTransition { .. } => StatusCode::CONFLICT,
            LedgerError::IncompleteChecklist { .. } | LedgerError::InvalidInput(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        let unmet = match &err {
            LedgerError::IncompleteChecklist { unmet } => unmet.clone(),
            _ => Vec::new(),
        };
        Self {
            status,
            body: ErrorRes {
                message: err.to_string(),
                unmet,
            },
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::AlreadyRegistered { .. } | StoreError::DuplicateId { .. } => {
                StatusCode::CONFLICT
            }
            StoreError::InvalidInput(_) | StoreError::Text(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.body.message, "request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.body.message, "request rejected");
        }
        (self.status, Json(self.body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::{BedId, EntityKind, PatientId};

    #[test]
    fn ledger_conflicts_map_to_409() {
        let err = ApiError::from(LedgerError::BedOccupied {
            bed: BedId::from("PP-01"),
            occupant: PatientId(1),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = ApiError::from(LedgerError::SameBed {
            bed: BedId::from("PP-01"),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn checklist_error_carries_unmet_items() {
        let err = ApiError::from(LedgerError::IncompleteChecklist {
            unmet: vec!["newborn_screening".into()],
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body.unmet, vec!["newborn_screening".to_string()]);
    }

    #[test]
    fn store_errors_map_by_kind() {
        let not_found = ApiError::from(StoreError::NotFound {
            entity: EntityKind::LabOrder,
            id: "9".into(),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let duplicate = ApiError::from(StoreError::AlreadyRegistered {
            entity: EntityKind::Patient,
            field: "national id",
            value: "111.222.333-44".into(),
        });
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let layout = ApiError::from(StoreError::Layout("bad".into()));
        assert_eq!(layout.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
