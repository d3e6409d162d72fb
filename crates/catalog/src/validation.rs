//! Field-level validation rules for catalog rows.
//!
//! Rules that only need the row itself live here. Rules that need the rest
//! of the catalog (referential integrity, uniqueness within a catalog) are
//! checked by the store on insert.

use std::fmt;

use chrono::NaiveDate;

use crate::model::{BesluitType, Catalogus, Eigenschap, InformatieObjectType};

/// Upper bound for day-count fields such as `reactietermijn`.
pub const MAX_TERMIJN_DAYS: u16 = 999;

/// Maximum length of `Catalogus.domein`.
pub const DOMEIN_MAX_LENGTH: usize = 5;

/// Length of an RSIN.
pub const RSIN_LENGTH: usize = 9;

/// Message for an Eigenschap with both or neither of its attribute groups.
pub const EIGENSCHAP_GROUP_MESSAGE: &str = "Één van twee groepen attributen is verplicht: specificatie van eigenschap of referentie naar eigenschap";

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field the rule applies to; `None` for rules spanning several fields.
    pub field: Option<&'static str>,
    /// Human readable message.
    pub message: String,
}

impl ValidationError {
    /// Error attached to one field.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Error not attached to a single field.
    pub fn non_field(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Row-level validation.
pub trait Validate {
    /// Returns every violated rule; empty when the row is valid.
    fn validate(&self) -> Vec<ValidationError>;
}

fn check_geldigheid(begin: NaiveDate, einde: Option<NaiveDate>, errors: &mut Vec<ValidationError>) {
    if let Some(einde) = einde {
        if einde < begin {
            errors.push(ValidationError::field(
                "datum_einde_geldigheid",
                "De einddatum mag niet voor de begindatum liggen.",
            ));
        }
    }
}

fn check_termijn(field: &'static str, days: u16, errors: &mut Vec<ValidationError>) {
    if days > MAX_TERMIJN_DAYS {
        errors.push(ValidationError::field(
            field,
            format!("Zorg ervoor dat deze waarde kleiner is dan of gelijk is aan {MAX_TERMIJN_DAYS}."),
        ));
    }
}

impl Validate for Catalogus {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.rsin.len() != RSIN_LENGTH || !self.rsin.chars().all(|c| c.is_ascii_digit()) {
            errors.push(ValidationError::field(
                "rsin",
                format!("Een RSIN bestaat uit precies {RSIN_LENGTH} cijfers."),
            ));
        }
        if self.domein.trim().is_empty() {
            errors.push(ValidationError::field("domein", "Dit veld is verplicht."));
        } else if self.domein.chars().count() > DOMEIN_MAX_LENGTH {
            errors.push(ValidationError::field(
                "domein",
                format!("Zorg ervoor dat dit veld niet meer dan {DOMEIN_MAX_LENGTH} karakters bevat."),
            ));
        }
        errors
    }
}

impl Validate for BesluitType {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_termijn("reactietermijn", self.reactietermijn, &mut errors);
        if let Some(days) = self.publicatietermijn {
            check_termijn("publicatietermijn", days, &mut errors);
        }
        check_geldigheid(self.datum_begin_geldigheid, self.datum_einde_geldigheid, &mut errors);
        errors
    }
}

impl Validate for InformatieObjectType {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.omschrijving.trim().is_empty() {
            errors.push(ValidationError::field("omschrijving", "Dit veld is verplicht."));
        }
        check_geldigheid(self.datum_begin_geldigheid, self.datum_einde_geldigheid, &mut errors);
        errors
    }
}

impl Validate for Eigenschap {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.specificatie_van_eigenschap.is_some() == self.referentie_naar_eigenschap.is_some() {
            errors.push(ValidationError::non_field(EIGENSCHAP_GROUP_MESSAGE));
        }
        check_geldigheid(self.datum_begin_geldigheid, self.datum_einde_geldigheid, &mut errors);
        errors
    }
}
