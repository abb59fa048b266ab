//! Scraping the FlightRadar24 airport directory.

use anyhow::Error;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::HashSet;

/// An airport listed in a country's directory page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AirportEntry {
    pub iata: String,
    pub icao: Option<String>,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Extract the airports from a directory page.
///
/// Each airport is an anchor carrying a `data-iata` attribute inside the `#tbl-datatable` table.
/// Its name comes from the anchor title, like `Copenhagen Kastrup Airport ( CPH / EKCH )`, or from
/// the anchor text when there is no title.
pub fn parse(html: &str) -> Result<Vec<AirportEntry>, Error> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("#tbl-datatable a[data-iata]")
        .map_err(|err| Error::msg(format!("bad selector: {err:?}")))?;

    let mut seen = HashSet::new();
    let mut airports = vec![];
    for anchor in document.select(&anchors) {
        let attrs = anchor.value();
        let iata = attrs.attr("data-iata").unwrap_or_default().trim();
        if iata.is_empty() {
            tracing::debug!("skipping airport without IATA code");
            continue;
        }
        if !seen.insert(iata.to_ascii_uppercase()) {
            continue;
        }

        let title = attrs.attr("title").map(str::trim).unwrap_or_default();
        let (title_name, codes) = split_codes(title);
        let name = if title_name.is_empty() {
            anchor
                .text()
                .map(str::trim)
                .find(|text| !text.is_empty())
                .unwrap_or_default()
                .to_string()
        } else {
            title_name.to_string()
        };
        let icao = attrs
            .attr("data-icao")
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .or_else(|| codes.and_then(|(_, icao)| icao))
            .map(str::to_ascii_uppercase);

        airports.push(AirportEntry {
            iata: iata.to_ascii_uppercase(),
            icao,
            name,
            latitude: attrs.attr("data-lat").and_then(|lat| lat.trim().parse().ok()),
            longitude: attrs.attr("data-lon").and_then(|lon| lon.trim().parse().ok()),
        });
    }
    tracing::debug!("found {} airports", airports.len());
    Ok(airports)
}

/// Split `Name ( IATA / ICAO )` into the name and the codes in parentheses.
fn split_codes(title: &str) -> (&str, Option<(&str, Option<&str>)>) {
    let Some(open) = title.rfind('(') else {
        return (title, None);
    };
    let Some(inner) = title[open + 1..].strip_suffix(')') else {
        return (title, None);
    };
    let mut codes = inner.split('/').map(str::trim);
    let iata = codes.next().unwrap_or_default();
    let icao = codes.next().filter(|code| !code.is_empty());
    (title[..open].trim(), Some((iata, icao)))
}

#[cfg(test)]
mod test {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table id="tbl-datatable">
          <tbody>
            <tr><td>
              <a href="/airports/cph" data-iata="CPH" data-lat="55.617917" data-lon="12.655972"
                 title="Copenhagen Kastrup Airport ( CPH / EKCH )">
                Copenhagen Kastrup Airport <small>(CPH/EKCH)</small>
              </a>
            </td></tr>
            <tr><td>
              <a href="/airports/aal" data-iata="aal" data-icao="ekyt" data-lat="57.0928">
                Aalborg Airport
              </a>
            </td></tr>
            <tr><td><a href="/airports/xxx" data-iata="">Closed Field</a></td></tr>
            <tr><td><a href="/airports/cph" data-iata="CPH" title="Duplicate">Duplicate</a></td></tr>
          </tbody>
        </table>
        <a data-iata="OSL" title="Outside the table">Oslo</a>
        </body></html>
    "#;

    #[test]
    fn test_parse_directory() {
        let airports = parse(PAGE).unwrap();
        assert_eq!(
            airports,
            [
                AirportEntry {
                    iata: "CPH".into(),
                    icao: Some("EKCH".into()),
                    name: "Copenhagen Kastrup Airport".into(),
                    latitude: Some(55.617917),
                    longitude: Some(12.655972),
                },
                AirportEntry {
                    iata: "AAL".into(),
                    icao: Some("EKYT".into()),
                    name: "Aalborg Airport".into(),
                    latitude: Some(57.0928),
                    longitude: None,
                },
            ]
        );
    }

    #[test]
    fn test_empty_directory() {
        assert!(parse("<html><body><p>Page not found</p></body></html>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_split_codes() {
        assert_eq!(
            split_codes("Kastrup ( CPH / EKCH )"),
            ("Kastrup", Some(("CPH", Some("EKCH"))))
        );
        assert_eq!(split_codes("Kastrup (CPH)"), ("Kastrup", Some(("CPH", None))));
        assert_eq!(split_codes("Kastrup"), ("Kastrup", None));
    }
}
