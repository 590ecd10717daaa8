// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! ISO 19115 metadata graph (the subset the catalog indexes).

use super::{metadata_node, AttrValue, LocalizedText, MetadataNode, MetadataRecord, RecordKind};
use crate::resolver::AccessorRegistry;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Declares a code list whose values render as their ISO code names.
macro_rules! code_list {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

code_list!(
    /// `CI_DateTypeCode`
    DateType {
        Creation => "creation",
        Publication => "publication",
        Revision => "revision",
    }
);

code_list!(
    /// `CI_RoleCode`
    Role {
        ResourceProvider => "resourceProvider",
        Custodian => "custodian",
        Owner => "owner",
        User => "user",
        Distributor => "distributor",
        Originator => "originator",
        PointOfContact => "pointOfContact",
        PrincipalInvestigator => "principalInvestigator",
        Processor => "processor",
        Publisher => "publisher",
        Author => "author",
    }
);

code_list!(
    /// `MD_ScopeCode`
    ScopeCode {
        Dataset => "dataset",
        Series => "series",
        Service => "service",
        Application => "application",
        Collection => "collectionHardware",
        NonGeographicDataset => "nonGeographicDataset",
    }
);

code_list!(
    /// `MD_TopicCategoryCode`
    TopicCategory {
        Farming => "farming",
        Biota => "biota",
        Boundaries => "boundaries",
        ClimatologyMeteorologyAtmosphere => "climatologyMeteorologyAtmosphere",
        Economy => "economy",
        Elevation => "elevation",
        Environment => "environment",
        GeoscientificInformation => "geoscientificInformation",
        Health => "health",
        ImageryBaseMapsEarthCover => "imageryBaseMapsEarthCover",
        Oceans => "oceans",
        Society => "society",
        Transportation => "transportation",
    }
);

/// `MD_Metadata`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub file_identifier: String,
    pub language: Option<String>,
    pub parent_identifier: Option<String>,
    #[serde(default)]
    pub hierarchy_level: Vec<ScopeCode>,
    #[serde(default)]
    pub contacts: Vec<ResponsibleParty>,
    pub date_stamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reference_system_info: Vec<ReferenceSystem>,
    #[serde(default)]
    pub identification_info: Vec<DataIdentification>,
    pub distribution_info: Option<Distribution>,
}

impl Metadata {
    pub fn new(file_identifier: impl Into<String>) -> Self {
        Self {
            file_identifier: file_identifier.into(),
            ..Self::default()
        }
    }
}

/// `MD_DataIdentification`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataIdentification {
    pub citation: Citation,
    pub abstract_text: LocalizedText,
    #[serde(default)]
    pub point_of_contact: Vec<ResponsibleParty>,
    #[serde(default)]
    pub descriptive_keywords: Vec<Keywords>,
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default)]
    pub topic_category: Vec<TopicCategory>,
    #[serde(default)]
    pub extent: Vec<Extent>,
}

/// `CI_Citation`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub title: LocalizedText,
    #[serde(default)]
    pub alternate_title: Vec<LocalizedText>,
    #[serde(default)]
    pub date: Vec<CitationDate>,
    #[serde(default)]
    pub cited_responsible_party: Vec<ResponsibleParty>,
}

/// `CI_Date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationDate {
    pub date: NaiveDate,
    pub date_type: DateType,
}

/// `CI_ResponsibleParty`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsibleParty {
    pub individual_name: Option<String>,
    pub organisation_name: Option<LocalizedText>,
    pub role: Role,
}

impl ResponsibleParty {
    pub fn individual(name: impl Into<String>, role: Role) -> Self {
        Self {
            individual_name: Some(name.into()),
            organisation_name: None,
            role,
        }
    }

    pub fn organisation(name: impl Into<String>, role: Role) -> Self {
        Self {
            individual_name: None,
            organisation_name: Some(LocalizedText::new(name)),
            role,
        }
    }
}

/// `MD_Keywords`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keywords {
    pub keyword: Vec<LocalizedText>,
    pub thesaurus_name: Option<String>,
}

/// `EX_Extent`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    #[serde(default)]
    pub geographic_element: Vec<GeographicBoundingBox>,
}

/// `EX_GeographicBoundingBox`, always WGS84 longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicBoundingBox {
    pub west_bound_longitude: f64,
    pub east_bound_longitude: f64,
    pub south_bound_latitude: f64,
    pub north_bound_latitude: f64,
}

impl GeographicBoundingBox {
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west_bound_longitude: west,
            east_bound_longitude: east,
            south_bound_latitude: south,
            north_bound_latitude: north,
        }
    }
}

/// `MD_Distribution`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(default)]
    pub distribution_format: Vec<Format>,
}

/// `MD_Format`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format {
    pub name: String,
    pub version: Option<String>,
}

/// `MD_ReferenceSystem`, reduced to its identifier code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSystem {
    pub code: String,
}

metadata_node!(
    Metadata,
    DataIdentification,
    Citation,
    CitationDate,
    ResponsibleParty,
    Keywords,
    Extent,
    GeographicBoundingBox,
    Distribution,
    Format,
    ReferenceSystem,
);

impl MetadataRecord for Metadata {
    fn kind(&self) -> RecordKind {
        RecordKind::Iso19115
    }

    fn identifier(&self) -> &str {
        &self.file_identifier
    }

    fn as_node(&self) -> &dyn MetadataNode {
        self
    }
}

/// Attribute declarations, named after the ISO 19139 element names.
pub(crate) fn register(registry: &mut AccessorRegistry) {
    registry
        .register::<Metadata>("fileIdentifier", |m| Some(AttrValue::text(&m.file_identifier)))
        .register::<Metadata>("language", |m| m.language.as_deref().map(AttrValue::Locale))
        .register::<Metadata>("parentIdentifier", |m| {
            m.parent_identifier.as_deref().map(AttrValue::text)
        })
        .register::<Metadata>("hierarchyLevel", |m| {
            Some(AttrValue::Sequence(
                m.hierarchy_level.iter().map(|c| AttrValue::Code(c.code())).collect(),
            ))
        })
        .register::<Metadata>("contact", |m| Some(AttrValue::nodes(&m.contacts)))
        .register::<Metadata>("dateStamp", |m| m.date_stamp.map(AttrValue::DateTime))
        .register::<Metadata>("referenceSystemInfo", |m| {
            Some(AttrValue::nodes(&m.reference_system_info))
        })
        .register::<Metadata>("identificationInfo", |m| {
            Some(AttrValue::nodes(&m.identification_info))
        })
        .register::<Metadata>("distributionInfo", |m| {
            m.distribution_info.as_ref().map(AttrValue::node)
        });

    registry
        .register::<DataIdentification>("citation", |d| Some(AttrValue::node(&d.citation)))
        .register::<DataIdentification>("abstract", |d| {
            Some(AttrValue::LocalizedText(&d.abstract_text))
        })
        .register::<DataIdentification>("pointOfContact", |d| {
            Some(AttrValue::nodes(&d.point_of_contact))
        })
        .register::<DataIdentification>("descriptiveKeywords", |d| {
            Some(AttrValue::nodes(&d.descriptive_keywords))
        })
        .register::<DataIdentification>("language", |d| Some(AttrValue::locales(&d.language)))
        .register::<DataIdentification>("topicCategory", |d| {
            Some(AttrValue::Sequence(
                d.topic_category.iter().map(|c| AttrValue::Code(c.code())).collect(),
            ))
        })
        .register::<DataIdentification>("extent", |d| Some(AttrValue::nodes(&d.extent)));

    registry
        .register::<Citation>("title", |c| Some(AttrValue::LocalizedText(&c.title)))
        .register::<Citation>("alternateTitle", |c| Some(AttrValue::localized(&c.alternate_title)))
        .register::<Citation>("date", |c| Some(AttrValue::nodes(&c.date)))
        .register::<Citation>("citedResponsibleParty", |c| {
            Some(AttrValue::nodes(&c.cited_responsible_party))
        });

    registry
        .register::<CitationDate>("date", |d| Some(AttrValue::Date(d.date)))
        .register::<CitationDate>("dateType", |d| Some(AttrValue::Code(d.date_type.code())));

    registry
        .register::<ResponsibleParty>("individualName", |p| {
            p.individual_name.as_deref().map(AttrValue::text)
        })
        .register::<ResponsibleParty>("organisationName", |p| {
            p.organisation_name.as_ref().map(AttrValue::LocalizedText)
        })
        .register::<ResponsibleParty>("role", |p| Some(AttrValue::Code(p.role.code())));

    registry
        .register::<Keywords>("keyword", |k| Some(AttrValue::localized(&k.keyword)))
        .register::<Keywords>("thesaurusName", |k| k.thesaurus_name.as_deref().map(AttrValue::text));

    registry.register::<Extent>("geographicElement", |e| {
        Some(AttrValue::nodes(&e.geographic_element))
    });

    registry
        .register::<GeographicBoundingBox>("westBoundLongitude", |b| {
            Some(AttrValue::Decimal(b.west_bound_longitude))
        })
        .register::<GeographicBoundingBox>("eastBoundLongitude", |b| {
            Some(AttrValue::Decimal(b.east_bound_longitude))
        })
        .register::<GeographicBoundingBox>("southBoundLatitude", |b| {
            Some(AttrValue::Decimal(b.south_bound_latitude))
        })
        .register::<GeographicBoundingBox>("northBoundLatitude", |b| {
            Some(AttrValue::Decimal(b.north_bound_latitude))
        });

    registry.register::<Distribution>("distributionFormat", |d| {
        Some(AttrValue::nodes(&d.distribution_format))
    });

    registry
        .register::<Format>("name", |f| Some(AttrValue::text(&f.name)))
        .register::<Format>("version", |f| f.version.as_deref().map(AttrValue::text));

    registry.register::<ReferenceSystem>("code", |r| Some(AttrValue::text(&r.code)));
}
