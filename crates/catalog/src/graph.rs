//! Resource graph provider.
//!
//! [`CatalogGraph`] turns store rows into resolver [`Resource`]s: a node with
//! the row's scalar fields in canonical order followed by its relations as
//! links, plus a relation table whose fetchers load the related rows from the
//! store on demand.
//!
//! Links are absolute URLs in the nested DSO shape:
//!
//! ```text
//! {base}/catalogussen/{catalogus_pk}
//! {base}/catalogussen/{catalogus_pk}/besluittypen
//! {base}/catalogussen/{catalogus_pk}/besluittypen/{pk}
//! {base}/catalogussen/{catalogus_pk}/eigenschappen/{pk}#specificatie
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};
use ztc_view::{
    FetchError, Fetched, FieldValue, RelationDescriptor, RelationFetcher, Resource,
    ResourceNode,
};

use crate::error::{CatalogError, CatalogResult};
use crate::kind::ResourceKind;
use crate::model::{
    BesluitType, Catalogus, Eigenschap, EigenschapReferentie, EigenschapSpecificatie,
    InformatieObjectType,
};
use crate::query::CatalogQuery;
use crate::store::CatalogStore;

/// Builds resolver resources from the catalog store.
#[derive(Debug, Clone)]
pub struct CatalogGraph {
    store: Arc<CatalogStore>,
    base_url: Arc<str>,
}

impl CatalogGraph {
    /// Creates a provider over `store`; links are prefixed with `base_url`.
    pub fn new(store: Arc<CatalogStore>, base_url: &str) -> Self {
        Self {
            store,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    /// Returns the link prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// URL of a catalog.
    pub fn catalogus_url(&self, catalogus: u64) -> String {
        format!("{}/catalogussen/{}", self.base_url, catalogus)
    }

    /// URL of a collection nested under a catalog.
    pub fn collection_url(&self, catalogus: u64, kind: ResourceKind) -> String {
        format!("{}/{}", self.catalogus_url(catalogus), kind.collection())
    }

    /// URL of a member of a nested collection.
    pub fn member_url(&self, catalogus: u64, kind: ResourceKind, id: u64) -> String {
        format!("{}/{}", self.collection_url(catalogus, kind), id)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// One catalog.
    pub fn catalogus(&self, id: u64) -> CatalogResult<Resource> {
        let row = self.store.catalogus(id)?;
        Ok(self.catalogus_resource(&row))
    }

    /// All catalogs matching `query`.
    pub fn catalogussen(&self, query: &CatalogQuery) -> CatalogResult<Vec<Resource>> {
        let resources = self
            .store
            .catalogussen()
            .iter()
            .map(|row| self.catalogus_resource(row))
            .collect();
        let resources = query.apply(ResourceKind::Catalogus, resources)?;
        debug!(count = resources.len(), "Listed catalogussen");
        Ok(resources)
    }

    /// All members of a collection nested under `catalogus` matching `query`.
    pub fn collection(
        &self,
        catalogus: u64,
        kind: ResourceKind,
        query: &CatalogQuery,
    ) -> CatalogResult<Vec<Resource>> {
        self.store.catalogus(catalogus)?;
        let resources = match kind {
            ResourceKind::Catalogus => return Err(unknown_collection(kind)),
            ResourceKind::BesluitType => self
                .store
                .besluittypen_of(catalogus)
                .iter()
                .map(|row| self.besluittype_resource(row))
                .collect(),
            ResourceKind::InformatieObjectType => self
                .store
                .informatieobjecttypen_of(catalogus)
                .iter()
                .map(|row| self.informatieobjecttype_resource(row))
                .collect(),
            ResourceKind::Eigenschap => self
                .store
                .eigenschappen_of(catalogus)
                .iter()
                .map(|row| self.eigenschap_resource(row))
                .collect(),
        };
        let resources = query.apply(kind, resources)?;
        debug!(catalogus, kind = %kind, count = resources.len(), "Listed nested collection");
        Ok(resources)
    }

    /// One member of a collection nested under `catalogus`.
    ///
    /// A member of another catalog is reported as not found.
    pub fn member(&self, catalogus: u64, kind: ResourceKind, id: u64) -> CatalogResult<Resource> {
        let not_found = || CatalogError::NotFound {
            resource: kind.name(),
            id,
        };
        self.store.catalogus(catalogus)?;

        match kind {
            ResourceKind::Catalogus => Err(unknown_collection(kind)),
            ResourceKind::BesluitType => {
                let row = self.store.besluittype(id)?;
                if row.maakt_deel_uit_van != catalogus {
                    return Err(not_found());
                }
                Ok(self.besluittype_resource(&row))
            }
            ResourceKind::InformatieObjectType => {
                let row = self.store.informatieobjecttype(id)?;
                if row.maakt_deel_uit_van != catalogus {
                    return Err(not_found());
                }
                Ok(self.informatieobjecttype_resource(&row))
            }
            ResourceKind::Eigenschap => {
                let row = self.store.eigenschap(id)?;
                if row.maakt_deel_uit_van != catalogus {
                    return Err(not_found());
                }
                Ok(self.eigenschap_resource(&row))
            }
        }
    }

    // ========================================================================
    // Row to resource
    // ========================================================================

    fn relations(&self, kind: ResourceKind, targets: Vec<Target>) -> Vec<RelationDescriptor> {
        debug_assert_eq!(kind.relations().len(), targets.len());
        kind.relations()
            .iter()
            .zip(targets)
            .map(|(spec, target)| {
                let fetcher = CatalogFetcher {
                    graph: self.clone(),
                    target,
                };
                let descriptor = RelationDescriptor::new(spec.name, spec.cardinality, fetcher)
                    .with_target(spec.target.schema());
                if spec.expandable {
                    descriptor
                } else {
                    descriptor.not_expandable()
                }
            })
            .collect()
    }

    fn catalogus_resource(&self, row: &Catalogus) -> Resource {
        let node = ResourceNode::new()
            .with_field("url", self.catalogus_url(row.id))
            .with_field("domein", row.domein.as_str())
            .with_field("rsin", row.rsin.as_str())
            .with_field("contactpersoon_beheer_naam", row.contactpersoon_beheer_naam.as_str())
            .with_field(
                "contactpersoon_beheer_telefoonnummer",
                row.contactpersoon_beheer_telefoonnummer.clone(),
            )
            .with_field(
                "contactpersoon_beheer_emailadres",
                row.contactpersoon_beheer_emailadres.clone(),
            )
            .with_field(
                "besluittypen",
                FieldValue::link(self.collection_url(row.id, ResourceKind::BesluitType)),
            )
            .with_field(
                "informatieobjecttypen",
                FieldValue::link(self.collection_url(row.id, ResourceKind::InformatieObjectType)),
            )
            .with_field(
                "eigenschappen",
                FieldValue::link(self.collection_url(row.id, ResourceKind::Eigenschap)),
            );

        Resource {
            node,
            relations: self.relations(
                ResourceKind::Catalogus,
                vec![
                    Target::BesluittypenOf(row.id),
                    Target::InformatieobjecttypenOf(row.id),
                    Target::EigenschappenOf(row.id),
                ],
            ),
        }
    }

    fn besluittype_resource(&self, row: &BesluitType) -> Resource {
        let catalogus = row.maakt_deel_uit_van;
        let node = ResourceNode::new()
            .with_field("url", self.member_url(catalogus, ResourceKind::BesluitType, row.id))
            .with_field("besluittype_omschrijving", row.besluittype_omschrijving.clone())
            .with_field(
                "besluittype_omschrijving_generiek",
                row.besluittype_omschrijving_generiek.clone(),
            )
            .with_field("besluitcategorie", row.besluitcategorie.clone())
            .with_field("reactietermijn", row.reactietermijn)
            .with_field("publicatie_indicatie", row.publicatie_indicatie.code())
            .with_field("publicatietekst", row.publicatietekst.clone())
            .with_field("publicatietermijn", row.publicatietermijn)
            .with_field("toelichting", row.toelichting.clone())
            .with_field("datum_begin_geldigheid", row.datum_begin_geldigheid.to_string())
            .with_field(
                "datum_einde_geldigheid",
                row.datum_einde_geldigheid.map(|d| d.to_string()),
            )
            .with_field("maakt_deel_uit_van", FieldValue::link(self.catalogus_url(catalogus)))
            .with_field(
                "wordt_vastgelegd_in",
                FieldValue::list(row.wordt_vastgelegd_in.iter().map(|id| {
                    self.member_url(catalogus, ResourceKind::InformatieObjectType, *id)
                })),
            );

        Resource {
            node,
            relations: self.relations(
                ResourceKind::BesluitType,
                vec![
                    Target::Catalogus(catalogus),
                    Target::Informatieobjecttypen(row.wordt_vastgelegd_in.clone()),
                ],
            ),
        }
    }

    fn informatieobjecttype_resource(&self, row: &InformatieObjectType) -> Resource {
        let catalogus = row.maakt_deel_uit_van;
        let besluittypen: Vec<String> = self
            .store
            .besluittypen_recorded_in(row.id)
            .iter()
            .map(|besluittype| {
                self.member_url(besluittype.maakt_deel_uit_van, ResourceKind::BesluitType, besluittype.id)
            })
            .collect();

        let node = ResourceNode::new()
            .with_field(
                "url",
                self.member_url(catalogus, ResourceKind::InformatieObjectType, row.id),
            )
            .with_field("omschrijving", row.omschrijving.as_str())
            .with_field("omschrijvingGeneriek", row.omschrijving_generiek.clone())
            .with_field("categorie", row.categorie.as_str())
            .with_field("trefwoord", FieldValue::list(row.trefwoord.iter().map(String::as_str)))
            .with_field(
                "vertrouwelijkAanduiding",
                row.vertrouwelijkheidaanduiding.map(|v| v.code()),
            )
            .with_field("model", FieldValue::list(row.model.iter().map(String::as_str)))
            .with_field("toelichting", row.toelichting.clone())
            .with_field("ingangsdatumObject", row.datum_begin_geldigheid.to_string())
            .with_field(
                "einddatumObject",
                row.datum_einde_geldigheid.map(|d| d.to_string()),
            )
            .with_field("maaktDeeluitVan", FieldValue::link(self.catalogus_url(catalogus)))
            .with_field("isVastleggingVoor", FieldValue::list(besluittypen));

        Resource {
            node,
            relations: self.relations(
                ResourceKind::InformatieObjectType,
                vec![
                    Target::Catalogus(catalogus),
                    Target::BesluittypenRecordedIn(row.id),
                ],
            ),
        }
    }

    fn eigenschap_resource(&self, row: &Eigenschap) -> Resource {
        let catalogus = row.maakt_deel_uit_van;
        let url = self.member_url(catalogus, ResourceKind::Eigenschap, row.id);
        let fragment_link = |present: bool, fragment: &str| {
            if present {
                FieldValue::link(format!("{url}#{fragment}"))
            } else {
                FieldValue::from(None::<String>)
            }
        };

        let node = ResourceNode::new()
            .with_field("url", url.as_str())
            .with_field("eigenschapnaam", row.eigenschapnaam.as_str())
            .with_field("definitie", row.definitie.as_str())
            .with_field("toelichting", row.toelichting.clone())
            .with_field("datum_begin_geldigheid", row.datum_begin_geldigheid.to_string())
            .with_field(
                "datum_einde_geldigheid",
                row.datum_einde_geldigheid.map(|d| d.to_string()),
            )
            .with_field(
                "specificatie_van_eigenschap",
                fragment_link(row.specificatie_van_eigenschap.is_some(), "specificatie"),
            )
            .with_field(
                "referentie_naar_eigenschap",
                fragment_link(row.referentie_naar_eigenschap.is_some(), "referentie"),
            )
            .with_field("maakt_deel_uit_van", FieldValue::link(self.catalogus_url(catalogus)));

        Resource {
            node,
            relations: self.relations(
                ResourceKind::Eigenschap,
                vec![
                    Target::Specificatie(row.specificatie_van_eigenschap),
                    Target::Referentie(row.referentie_naar_eigenschap),
                    Target::Catalogus(catalogus),
                ],
            ),
        }
    }
}

fn unknown_collection(kind: ResourceKind) -> CatalogError {
    CatalogError::UnknownCollection {
        collection: kind.collection().to_string(),
    }
}

fn specificatie_resource(row: &EigenschapSpecificatie) -> Resource {
    Resource::new(
        ResourceNode::new()
            .with_field("groep", row.groep.clone())
            .with_field("formaat", row.formaat.code())
            .with_field("lengte", row.lengte.as_str())
            .with_field("kardinaliteit", row.kardinaliteit.as_str())
            .with_field(
                "waardenverzameling",
                FieldValue::list(row.waardenverzameling.iter().map(String::as_str)),
            ),
    )
}

fn referentie_resource(row: &EigenschapReferentie) -> Resource {
    Resource::new(
        ResourceNode::new()
            .with_field("objecttype", row.objecttype.clone())
            .with_field("informatiemodel", row.informatiemodel.as_str())
            .with_field("namespace", row.namespace.as_str())
            .with_field("schemalocatie", row.schemalocatie.as_str())
            .with_field("x_path_element", row.x_path_element.clone())
            .with_field("entiteittype", row.entiteittype.as_str()),
    )
}

/// What a relation points at.
#[derive(Debug, Clone)]
enum Target {
    Catalogus(u64),
    BesluittypenOf(u64),
    InformatieobjecttypenOf(u64),
    EigenschappenOf(u64),
    Informatieobjecttypen(Vec<u64>),
    BesluittypenRecordedIn(u64),
    Specificatie(Option<u64>),
    Referentie(Option<u64>),
}

/// Loads the rows behind one relation of one resource.
struct CatalogFetcher {
    graph: CatalogGraph,
    target: Target,
}

impl CatalogFetcher {
    fn load(&self) -> CatalogResult<Fetched> {
        let graph = &self.graph;
        let store = &graph.store;
        let fetched = match &self.target {
            Target::Catalogus(id) => Fetched::One(graph.catalogus_resource(&store.catalogus(*id)?)),
            Target::BesluittypenOf(catalogus) => Fetched::Many(
                store
                    .besluittypen_of(*catalogus)
                    .iter()
                    .map(|row| graph.besluittype_resource(row))
                    .collect(),
            ),
            Target::InformatieobjecttypenOf(catalogus) => Fetched::Many(
                store
                    .informatieobjecttypen_of(*catalogus)
                    .iter()
                    .map(|row| graph.informatieobjecttype_resource(row))
                    .collect(),
            ),
            Target::EigenschappenOf(catalogus) => Fetched::Many(
                store
                    .eigenschappen_of(*catalogus)
                    .iter()
                    .map(|row| graph.eigenschap_resource(row))
                    .collect(),
            ),
            Target::Informatieobjecttypen(ids) => Fetched::Many(
                store
                    .informatieobjecttypen_by_ids(ids)?
                    .iter()
                    .map(|row| graph.informatieobjecttype_resource(row))
                    .collect(),
            ),
            Target::BesluittypenRecordedIn(informatieobjecttype) => Fetched::Many(
                store
                    .besluittypen_recorded_in(*informatieobjecttype)
                    .iter()
                    .map(|row| graph.besluittype_resource(row))
                    .collect(),
            ),
            Target::Specificatie(Some(id)) => Fetched::One(specificatie_resource(&store.specificatie(*id)?)),
            Target::Referentie(Some(id)) => Fetched::One(referentie_resource(&store.referentie(*id)?)),
            Target::Specificatie(None) | Target::Referentie(None) => Fetched::Absent,
        };
        Ok(fetched)
    }
}

#[async_trait]
impl RelationFetcher for CatalogFetcher {
    async fn fetch(&self) -> Result<Fetched, FetchError> {
        trace!(relation_target = ?self.target, "Loading relation from store");
        self.load().map_err(FetchError::from)
    }
}
