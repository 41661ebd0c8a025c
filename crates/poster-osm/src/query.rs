//! Area query construction.

use poster_common::GeoPoint;

/// Build the declarative area query for one render.
///
/// Five clauses share a single radius filter: road ways, water ways, park
/// ways, water relations, and park relations. The trailing recursion pulls
/// in every child element the matches reference, so ways and relations
/// arrive with the nodes needed to resolve their geometry.
pub fn area_query(center: GeoPoint, radius_m: f64) -> String {
    let around = format!("around:{},{},{}", radius_m, center.lat, center.lon);
    format!(
        "[out:json][timeout:180];\n\
         (\n\
         \x20 way[\"highway\"]({around});\n\
         \x20 way[\"natural\"=\"water\"]({around});\n\
         \x20 way[\"leisure\"=\"park\"]({around});\n\
         \x20 relation[\"natural\"=\"water\"]({around});\n\
         \x20 relation[\"leisure\"=\"park\"]({around});\n\
         );\n\
         (._;>;);\n\
         out body qt;"
    )
}
