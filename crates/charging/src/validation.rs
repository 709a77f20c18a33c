//! Input checks shared by every operation of the [`Client`](crate::client::Client).
//!
//! Each check yields a [`Validation`], which is either `Ok(())` or the reason
//! why the input was rejected.

use std::{error, fmt, ops::RangeInclusive};

use model::{
    company::Company,
    station::{SearchArea, Station},
    WithId,
};

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

pub type Validation = Result<(), ValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Company,
    Station,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Company => write!(f, "Company"),
            Self::Station => write!(f, "Station"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    BlankName(Subject),
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    NegativeRadius(f64),
    OwnParent,
    DescendantParent,
}

impl ValidationError {
    /// The kind of data that was rejected.
    pub fn subject(&self) -> Subject {
        match self {
            Self::BlankName(subject) => *subject,
            Self::OwnParent | Self::DescendantParent => Subject::Company,
            _ => Subject::Station,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankName(subject) => write!(f, "{} name must not be blank", subject),
            Self::LatitudeOutOfRange(latitude) => write!(
                f,
                "Latitude must be in range between -90 and 90, got {}",
                latitude
            ),
            Self::LongitudeOutOfRange(longitude) => write!(
                f,
                "Longitude must be in range between -180 and 180, got {}",
                longitude
            ),
            Self::NegativeRadius(radius) => {
                write!(f, "Radius must not be negative, got {}", radius)
            }
            Self::OwnParent => write!(f, "Company cannot be its own parent"),
            Self::DescendantParent => {
                write!(f, "Company cannot be a child of its own descendant")
            }
        }
    }
}

impl error::Error for ValidationError {}

pub trait Validate {
    fn validate(&self) -> Validation;
}

impl Validate for Company {
    fn validate(&self) -> Validation {
        check_name(&self.name, Subject::Company)
    }
}

impl Validate for WithId<Company> {
    fn validate(&self) -> Validation {
        self.content.validate()?;
        if self.content.parent_id == Some(self.id) {
            return Err(ValidationError::OwnParent);
        }
        Ok(())
    }
}

impl Validate for Station {
    fn validate(&self) -> Validation {
        check_name(&self.name, Subject::Station)?;
        check_coordinates(self.latitude, self.longitude)
    }
}

impl Validate for WithId<Station> {
    fn validate(&self) -> Validation {
        self.content.validate()
    }
}

impl Validate for SearchArea {
    fn validate(&self) -> Validation {
        check_coordinates(self.latitude, self.longitude)?;
        // also rejects NaN
        if !(self.radius_km >= 0.0) {
            return Err(ValidationError::NegativeRadius(self.radius_km));
        }
        Ok(())
    }
}

fn check_name(name: &str, subject: Subject) -> Validation {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankName(subject));
    }
    Ok(())
}

fn check_coordinates(latitude: f64, longitude: f64) -> Validation {
    if !LATITUDE_RANGE.contains(&latitude) {
        return Err(ValidationError::LatitudeOutOfRange(latitude));
    }
    if !LONGITUDE_RANGE.contains(&longitude) {
        return Err(ValidationError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use utility::id::Id;

    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        for name in ["", "    ", "\t", "\u{205F}", " \n "] {
            assert_eq!(
                Company::new(name, None).validate(),
                Err(ValidationError::BlankName(Subject::Company))
            );
            assert_eq!(
                Station::new(name, 0.0, 0.0, Id::new(1)).validate(),
                Err(ValidationError::BlankName(Subject::Station))
            );
        }
        assert_eq!(Company::new(" A ", None).validate(), Ok(()));
    }

    #[test]
    fn coordinate_bounds_are_inclusive() {
        for (latitude, longitude) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
            assert_eq!(
                Station::new("S", latitude, longitude, Id::new(1)).validate(),
                Ok(())
            );
        }
    }

    #[test]
    fn coordinates_out_of_range_are_rejected() {
        assert_eq!(
            Station::new("S", 90.5, 0.0, Id::new(1)).validate(),
            Err(ValidationError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Station::new("S", 0.0, -180.5, Id::new(1)).validate(),
            Err(ValidationError::LongitudeOutOfRange(-180.5))
        );
        assert!(Station::new("S", f64::NAN, 0.0, Id::new(1))
            .validate()
            .is_err());
    }

    #[test]
    fn search_radius_must_not_be_negative() {
        assert_eq!(SearchArea::new(0.0, 0.0, 0.0).validate(), Ok(()));
        assert_eq!(
            SearchArea::new(0.0, 0.0, -1.0).validate(),
            Err(ValidationError::NegativeRadius(-1.0))
        );
        assert!(SearchArea::new(0.0, 0.0, f64::NAN).validate().is_err());
        assert_eq!(
            SearchArea::new(-91.0, 0.0, 1.0).validate(),
            Err(ValidationError::LatitudeOutOfRange(-91.0))
        );
    }

    #[test]
    fn company_cannot_be_its_own_parent() {
        let company = WithId::new(Id::new(4), Company::new("Loop", Some(Id::new(4))));
        assert_eq!(company.validate(), Err(ValidationError::OwnParent));

        let company = WithId::new(Id::new(4), Company::new("Child", Some(Id::new(3))));
        assert_eq!(company.validate(), Ok(()));
    }

    #[test]
    fn messages_name_the_subject() {
        assert_eq!(
            ValidationError::BlankName(Subject::Station).to_string(),
            "Station name must not be blank"
        );
        assert_eq!(ValidationError::OwnParent.subject(), Subject::Company);
        assert_eq!(
            ValidationError::NegativeRadius(-2.0).subject(),
            Subject::Station
        );
    }
}
