use scraper::Html;
use url::Url;

use super::Rules;
use crate::pharmacy::Coordinates;

/// Coordinates from the map link on a pharmacy detail page.
///
/// The link's `href` is resolved against `page_url` and its coordinates
/// parameter read as "lat,lon". A half that does not parse to a finite
/// number becomes `0.0`;
/// a missing link or parameter gives `None`.
pub fn parse_coordinates(document: &Html, page_url: &Url, rules: &Rules) -> Option<Coordinates> {
    let href = document.select(&rules.map_link).next()?.value().attr("href")?;
    let target = page_url.join(href.trim()).ok()?;
    let (_, value) = target
        .query_pairs()
        .find(|(key, _)| key == rules.coords_param.as_str())?;

    let (lat, lon) = value.split_once(',').unwrap_or((&*value, ""));
    Some(Coordinates {
        lat: parse_or_zero(lat),
        lon: parse_or_zero(lon),
    })
}

fn parse_or_zero(half: &str) -> f64 {
    half.trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::default_rules;

    fn page_url() -> Url {
        Url::parse("https://www.farmaciediturno.org/farmacia.asp?idf=1234").unwrap()
    }

    fn coords(html: &str) -> Option<Coordinates> {
        parse_coordinates(&Html::parse_document(html), &page_url(), &default_rules())
    }

    fn map_page(href: &str) -> String {
        format!(
            r#"<table><tr><td><table><tr><td><a href="{}">Mappa</a></td></tr></table></td></tr></table>"#,
            href
        )
    }

    #[test]
    fn detail_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/detail_1234.html").unwrap();
        let c = coords(&html).unwrap();
        assert_eq!(c.lat, 45.9541);
        assert_eq!(c.lon, 9.6738);
    }

    #[test]
    fn relative_href_is_resolved() {
        let c = coords(&map_page("mappa.asp?daddr=45.5,9.25")).unwrap();
        assert_eq!(c, Coordinates { lat: 45.5, lon: 9.25 });
    }

    #[test]
    fn encoded_comma_and_spaces() {
        let c = coords(&map_page("https://maps.google.it/maps?daddr=45.5%2C%209.25&hl=it")).unwrap();
        assert_eq!(c, Coordinates { lat: 45.5, lon: 9.25 });
    }

    #[test]
    fn unparseable_half_is_zero() {
        let c = coords(&map_page("https://maps.google.it/maps?daddr=abc,9.25")).unwrap();
        assert_eq!(c, Coordinates { lat: 0.0, lon: 9.25 });

        let c = coords(&map_page("https://maps.google.it/maps?daddr=45.5")).unwrap();
        assert_eq!(c, Coordinates { lat: 45.5, lon: 0.0 });
    }

    #[test]
    fn non_finite_halves_are_zero() {
        let c = coords(&map_page("https://maps.google.it/maps?daddr=nan,9.6")).unwrap();
        assert_eq!(c, Coordinates { lat: 0.0, lon: 9.6 });

        let c = coords(&map_page("https://maps.google.it/maps?daddr=inf,-infinity")).unwrap();
        assert_eq!(c, Coordinates { lat: 0.0, lon: 0.0 });
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let c = coords(&map_page("https://maps.google.it/maps?daddr=123.4,-200")).unwrap();
        assert_eq!(c, Coordinates { lat: 123.4, lon: -200.0 });
    }

    #[test]
    fn link_outside_nested_table_is_ignored() {
        let html = r#"<table><tr><td><a href="https://maps.google.it/maps?daddr=45.5,9.25">Mappa</a></td></tr></table>"#;
        assert_eq!(coords(html), None);
    }

    #[test]
    fn missing_map_link_is_unknown() {
        assert_eq!(coords("<html><body><p>Farmacia chiusa</p></body></html>"), None);
    }
}
