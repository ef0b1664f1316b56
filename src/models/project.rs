use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::Status;
use super::client::ClientView;
use super::media::{Gallery, ImageSlot, ImageUpload};
use crate::error::ApiError;

/// SeaORM entity for the `projects` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub cover: Option<ImageUpload>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub logo: Option<ImageUpload>,
    #[sea_orm(column_type = "JsonBinary")]
    pub gallery: Gallery,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Double", nullable)]
    pub cost: Option<f64>,
    pub currency: Option<String>,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::component::Entity")]
    Components,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /project`. Dates are ISO-8601 strings, parsed by the handler.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub client_id: Uuid,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[validate(range(min = 0.0, message = "cost cannot be negative"))]
    pub cost: Option<f64>,
    #[validate(length(min = 1, max = 8, message = "currency must be a short code"))]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub client_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[validate(range(min = 0.0, message = "cost cannot be negative"))]
    pub cost: Option<f64>,
    #[validate(length(min = 1, max = 8, message = "currency must be a short code"))]
    pub currency: Option<String>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.client_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.cost.is_none()
            && self.currency.is_none()
    }
}

impl CreateProject {
    /// Parse the date fields; anything but strict ISO-8601 is rejected.
    pub fn parse(self) -> Result<NewProject, ApiError> {
        Ok(NewProject {
            start_date: parse_date("start_date", self.start_date.as_deref())?,
            end_date: parse_date("end_date", self.end_date.as_deref())?,
            name: self.name,
            client_id: self.client_id,
            cost: self.cost,
            currency: self.currency,
        })
    }
}

impl UpdateProject {
    pub fn parse(self) -> Result<ProjectChanges, ApiError> {
        Ok(ProjectChanges {
            start_date: parse_date("start_date", self.start_date.as_deref())?,
            end_date: parse_date("end_date", self.end_date.as_deref())?,
            name: self.name,
            client_id: self.client_id,
            cost: self.cost,
            currency: self.currency,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub client_id: Uuid,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    pub cost: Option<f64>,
    pub currency: Option<String>,
}

/// Parsed project fields of an update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub client_id: Option<Uuid>,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    pub cost: Option<f64>,
    pub currency: Option<String>,
}

/// Accepts `YYYY-MM-DD` (midnight UTC), an RFC 3339 timestamp, or a local
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` date-time read as UTC.
pub fn parse_date(field: &str, value: Option<&str>) -> Result<Option<DateTimeUtc>, ApiError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let invalid = || ApiError::InvalidDate(format!("{field} must be an ISO-8601 date"));
    if !has_iso_shape(value) {
        return Err(invalid());
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    if value.len() == ISO_DATE.len() {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|at| Some(at.and_utc()))
            .ok_or_else(invalid);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|at| Some(at.and_utc()))
        .ok_or_else(invalid)
}

const ISO_DATE: &str = "dddd-dd-dd";
const ISO_PREFIX: &str = "dddd-dd-ddTdd:dd:dd";

/// Zero-padded date fields and, when present, zero-padded time fields.
/// chrono's `%m`, `%d` and `%H` also take single digits.
fn has_iso_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != ISO_DATE.len() && bytes.len() < "dddd-dd-ddTdd:dd".len() {
        return false;
    }
    ISO_PREFIX
        .bytes()
        .zip(bytes)
        .all(|(expected, actual)| match expected {
            b'd' => actual.is_ascii_digit(),
            other => other == *actual,
        })
}

/// Single-image attachments of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectImage {
    Cover,
    Logo,
}

impl From<ProjectImage> for ImageSlot {
    fn from(image: ProjectImage) -> Self {
        match image {
            ProjectImage::Cover => ImageSlot::Cover,
            ProjectImage::Logo => ImageSlot::Logo,
        }
    }
}

/// A project with its client reference denormalized.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: Uuid,
    pub name: String,
    pub client: Option<ClientView>,
    pub cover: Option<ImageUpload>,
    pub logo: Option<ImageUpload>,
    pub gallery: Gallery,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    pub cost: Option<f64>,
    pub currency: Option<String>,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ProjectView {
    pub fn new(m: Model, client: Option<ClientView>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            client,
            cover: m.cover,
            logo: m.logo,
            gallery: m.gallery,
            start_date: m.start_date,
            end_date: m.end_date,
            cost: m.cost,
            currency: m.currency,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let date = parse_date("start_date", Some("2024-03-01")).unwrap().unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let at = parse_date("start_date", Some("2024-03-01T10:30:00+02:00"))
            .unwrap()
            .unwrap();
        assert_eq!(at.to_rfc3339(), "2024-03-01T08:30:00+00:00");

        assert_eq!(parse_date("start_date", None).unwrap(), None);
    }

    #[test]
    fn local_date_times_are_read_as_utc() {
        for value in ["2024-03-01T10:00:00", "2024-03-01T10:00", "2024-03-01T10:00:00.000"] {
            let at = parse_date("start_date", Some(value)).unwrap().unwrap();
            assert_eq!(at.to_rfc3339(), "2024-03-01T10:00:00+00:00", "{value}");
        }
    }

    #[test]
    fn loose_dates_are_rejected() {
        for value in [
            "01/03/2024",
            "2024-13-01",
            "March 1st",
            "2024-03-01 10:00",
            "2024-3-1",
            "2024-03-1",
            "2024-03-01T1:00",
            "2024-03-01T10",
            "2024-03-01T25:00",
        ] {
            let err = parse_date("end_date", Some(value)).unwrap_err();
            assert!(matches!(err, ApiError::InvalidDate(_)), "{value}");
        }
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateProject::default().is_empty());
        let update = UpdateProject {
            cost: Some(10.0),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
