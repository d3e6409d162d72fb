//! Catalog entities.
//!
//! Rows as they are kept in the store and read from seed files. Relations to
//! other rows are stored as ids; the [`graph`](crate::graph) module turns them
//! into links and relation fetchers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Yes/no choice used by the catalog standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JaNee {
    /// Ja.
    #[serde(rename = "J")]
    Ja,
    /// Nee.
    #[serde(rename = "N")]
    Nee,
}

impl JaNee {
    /// The single-letter code.
    pub fn code(self) -> &'static str {
        match self {
            JaNee::Ja => "J",
            JaNee::Nee => "N",
        }
    }
}

/// Confidentiality level of an information object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertrouwelijkheidAanduiding {
    Openbaar,
    BeperktOpenbaar,
    Intern,
    Zaakvertrouwelijk,
    Vertrouwelijk,
    Confidentieel,
    Geheim,
    ZeerGeheim,
}

impl VertrouwelijkheidAanduiding {
    /// The code as it appears in responses and filters.
    pub fn code(self) -> &'static str {
        match self {
            VertrouwelijkheidAanduiding::Openbaar => "openbaar",
            VertrouwelijkheidAanduiding::BeperktOpenbaar => "beperkt_openbaar",
            VertrouwelijkheidAanduiding::Intern => "intern",
            VertrouwelijkheidAanduiding::Zaakvertrouwelijk => "zaakvertrouwelijk",
            VertrouwelijkheidAanduiding::Vertrouwelijk => "vertrouwelijk",
            VertrouwelijkheidAanduiding::Confidentieel => "confidentieel",
            VertrouwelijkheidAanduiding::Geheim => "geheim",
            VertrouwelijkheidAanduiding::ZeerGeheim => "zeer_geheim",
        }
    }
}

/// Value format of a property specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formaat {
    Tekst,
    Getal,
    Datum,
    DatumTijd,
}

impl Formaat {
    /// The code as it appears in responses.
    pub fn code(self) -> &'static str {
        match self {
            Formaat::Tekst => "tekst",
            Formaat::Getal => "getal",
            Formaat::Datum => "datum",
            Formaat::DatumTijd => "datum_tijd",
        }
    }
}

/// A catalog of case, decision and document types of one organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalogus {
    pub id: u64,
    /// Short name of the domain, at most five characters.
    pub domein: String,
    /// RSIN of the maintaining organisation, nine digits.
    pub rsin: String,
    pub contactpersoon_beheer_naam: String,
    #[serde(default)]
    pub contactpersoon_beheer_telefoonnummer: Option<String>,
    #[serde(default)]
    pub contactpersoon_beheer_emailadres: Option<String>,
}

/// The kind of decision a case can result in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BesluitType {
    pub id: u64,
    /// Owning catalog.
    pub maakt_deel_uit_van: u64,
    #[serde(default)]
    pub besluittype_omschrijving: Option<String>,
    #[serde(default)]
    pub besluittype_omschrijving_generiek: Option<String>,
    #[serde(default)]
    pub besluitcategorie: Option<String>,
    /// Days within which an objection is possible.
    pub reactietermijn: u16,
    pub publicatie_indicatie: JaNee,
    #[serde(default)]
    pub publicatietekst: Option<String>,
    #[serde(default)]
    pub publicatietermijn: Option<u16>,
    #[serde(default)]
    pub toelichting: Option<String>,
    pub datum_begin_geldigheid: NaiveDate,
    #[serde(default)]
    pub datum_einde_geldigheid: Option<NaiveDate>,
    /// Information object types decisions of this type are recorded in.
    #[serde(default)]
    pub wordt_vastgelegd_in: Vec<u64>,
}

/// The kind of document (information object) handled in a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformatieObjectType {
    pub id: u64,
    /// Owning catalog.
    pub maakt_deel_uit_van: u64,
    pub omschrijving: String,
    #[serde(default)]
    pub omschrijving_generiek: Option<String>,
    pub categorie: String,
    #[serde(default)]
    pub trefwoord: Vec<String>,
    #[serde(default)]
    pub vertrouwelijkheidaanduiding: Option<VertrouwelijkheidAanduiding>,
    #[serde(default)]
    pub model: Vec<String>,
    #[serde(default)]
    pub toelichting: Option<String>,
    pub datum_begin_geldigheid: NaiveDate,
    #[serde(default)]
    pub datum_einde_geldigheid: Option<NaiveDate>,
}

/// A property that can be recorded for a case.
///
/// Exactly one of `specificatie_van_eigenschap` and
/// `referentie_naar_eigenschap` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eigenschap {
    pub id: u64,
    /// Owning catalog.
    pub maakt_deel_uit_van: u64,
    pub eigenschapnaam: String,
    pub definitie: String,
    #[serde(default)]
    pub toelichting: Option<String>,
    pub datum_begin_geldigheid: NaiveDate,
    #[serde(default)]
    pub datum_einde_geldigheid: Option<NaiveDate>,
    #[serde(default)]
    pub specificatie_van_eigenschap: Option<u64>,
    #[serde(default)]
    pub referentie_naar_eigenschap: Option<u64>,
}

/// Value specification of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenschapSpecificatie {
    pub id: u64,
    #[serde(default)]
    pub groep: Option<String>,
    pub formaat: Formaat,
    pub lengte: String,
    pub kardinaliteit: String,
    #[serde(default)]
    pub waardenverzameling: Vec<String>,
}

/// Reference to a property defined in an external information model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenschapReferentie {
    pub id: u64,
    #[serde(default)]
    pub objecttype: Option<String>,
    pub informatiemodel: String,
    pub namespace: String,
    pub schemalocatie: String,
    #[serde(default)]
    pub x_path_element: Option<String>,
    pub entiteittype: String,
}
