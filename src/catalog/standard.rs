// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use super::{TermDefinition, CRS, EAST_BOUND, IDENTIFIER, NORTH_BOUND, SOUTH_BOUND, WEST_BOUND};

const CITATION: &str = "ISO 19115:MD_Metadata:identificationInfo:citation";
const EXTENT: &str = "ISO 19115:MD_Metadata:identificationInfo:extent:geographicElement";

pub(super) fn definitions() -> Vec<TermDefinition> {
    let shared = |name: &str, paths: &[&str]| TermDefinition::new(name, paths).iso19115().dublin_core();
    let iso = |name: &str, paths: &[&str]| TermDefinition::new(name, paths).iso19115();
    let dc = |name: &str, paths: &[&str]| TermDefinition::new(name, paths).dublin_core();

    vec![
        shared(
            IDENTIFIER,
            &[
                "ISO 19115:MD_Metadata:fileIdentifier",
                "Catalog Web Service:Record:identifier",
            ],
        ),
        shared(
            "Title",
            &[&format!("{CITATION}:title"), "Catalog Web Service:Record:title"],
        ),
        shared(
            "Abstract",
            &[
                "ISO 19115:MD_Metadata:identificationInfo:abstract",
                "Catalog Web Service:Record:description",
            ],
        ),
        shared(
            "Subject",
            &[
                "ISO 19115:MD_Metadata:identificationInfo:descriptiveKeywords:keyword",
                "ISO 19115:MD_Metadata:identificationInfo:topicCategory",
                "Catalog Web Service:Record:subject",
            ],
        ),
        shared(
            "Creator",
            &[
                &format!("{CITATION}:citedResponsibleParty#role=originator:individualName"),
                "Catalog Web Service:Record:creator",
            ],
        ),
        shared(
            "Author",
            &[
                &format!("{CITATION}:citedResponsibleParty#role=author:individualName"),
                "Catalog Web Service:Record:creator",
            ],
        ),
        shared(
            "Publisher",
            &[
                &format!("{CITATION}:citedResponsibleParty#role=publisher:organisationName"),
                "Catalog Web Service:Record:publisher",
            ],
        ),
        dc("Contributor", &["Catalog Web Service:Record:contributor"]),
        shared(
            "Modified",
            &[
                "ISO 19115:MD_Metadata:dateStamp",
                "Catalog Web Service:Record:modified",
            ],
        ),
        shared(
            "Date",
            &[&format!("{CITATION}:date:date"), "Catalog Web Service:Record:date"],
        ),
        shared(
            "Type",
            &[
                "ISO 19115:MD_Metadata:hierarchyLevel",
                "Catalog Web Service:Record:type",
            ],
        ),
        shared(
            "Format",
            &[
                "ISO 19115:MD_Metadata:distributionInfo:distributionFormat:name",
                "Catalog Web Service:Record:format",
            ],
        ),
        shared(
            "Language",
            &[
                "ISO 19115:MD_Metadata:language",
                "Catalog Web Service:Record:language",
            ],
        ),
        dc("Source", &["Catalog Web Service:Record:source"]),
        dc("Relation", &["Catalog Web Service:Record:relation"]),
        dc("Rights", &["Catalog Web Service:Record:rights"]),
        shared(
            WEST_BOUND,
            &[
                &format!("{EXTENT}:westBoundLongitude"),
                "Catalog Web Service:Record:BoundingBox:westBoundLongitude",
            ],
        ),
        shared(
            EAST_BOUND,
            &[
                &format!("{EXTENT}:eastBoundLongitude"),
                "Catalog Web Service:Record:BoundingBox:eastBoundLongitude",
            ],
        ),
        shared(
            NORTH_BOUND,
            &[
                &format!("{EXTENT}:northBoundLatitude"),
                "Catalog Web Service:Record:BoundingBox:northBoundLatitude",
            ],
        ),
        shared(
            SOUTH_BOUND,
            &[
                &format!("{EXTENT}:southBoundLatitude"),
                "Catalog Web Service:Record:BoundingBox:southBoundLatitude",
            ],
        ),
        // ISO geographic boxes are always WGS84, so only Dublin Core carries a CRS.
        shared(CRS, &["Catalog Web Service:Record:BoundingBox:crs"]),
        iso("AlternateTitle", &[&format!("{CITATION}:alternateTitle")]),
        iso(
            "CreationDate",
            &[&format!("{CITATION}:date#dateType=creation:date")],
        ),
        iso(
            "PublicationDate",
            &[&format!("{CITATION}:date#dateType=publication:date")],
        ),
        iso(
            "RevisionDate",
            &[&format!("{CITATION}:date#dateType=revision:date")],
        ),
        iso(
            "OrganisationName",
            &["ISO 19115:MD_Metadata:identificationInfo:pointOfContact:organisationName"],
        ),
        iso(
            "TopicCategory",
            &["ISO 19115:MD_Metadata:identificationInfo:topicCategory"],
        ),
        iso(
            "ResourceLanguage",
            &["ISO 19115:MD_Metadata:identificationInfo:language"],
        ),
        iso(
            "ParentIdentifier",
            &["ISO 19115:MD_Metadata:parentIdentifier"],
        ),
        iso(
            "ReferenceSystem",
            &["ISO 19115:MD_Metadata:referenceSystemInfo:code"],
        ),
    ]
}
