use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use tracing::debug;

use super::text::{clean_address, extract_phones, normalize_whitespace};
use super::Rules;
use crate::pharmacy::Pharmacy;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Keeps a bold label from fusing with the word before it once tags are gone.
const NBSP: char = '\u{a0}';

/// One pharmacy per element following the results marker, in page order.
/// Rows that don't have the expected layout come out with empty fields.
pub fn parse_listing(document: &Html, rules: &Rules) -> Vec<Pharmacy> {
    let Some(marker) = document.select(&rules.results_marker).next() else {
        debug!("No results marker in listing page");
        return Vec::new();
    };

    let pharmacies: Vec<Pharmacy> = marker
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .map(|row| parse_row(row, rules))
        .collect();

    debug!("Parsed {} pharmacies from listing", pharmacies.len());
    pharmacies
}

fn parse_row(row: ElementRef, rules: &Rules) -> Pharmacy {
    let Some(bold) = row.select(&rules.name_cell).next() else {
        return Pharmacy::default();
    };

    let name: String = bold.select(&rules.name_link).flat_map(|a| a.text()).collect();

    let Some(details) = bold.next_siblings().find_map(ElementRef::wrap) else {
        return Pharmacy {
            name: normalize_whitespace(&name),
            ..Pharmacy::default()
        };
    };

    let id = details
        .value()
        .attr("href")
        .and_then(|href| DIGITS_RE.find(href))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let text = separated_text(details, rules);

    Pharmacy {
        id,
        name: normalize_whitespace(&name),
        address: clean_address(&text),
        phones: extract_phones(&text),
        ..Pharmacy::default()
    }
}

/// Text content of `node` with a non-breaking space before every nested
/// bold element.
fn separated_text(node: ElementRef, rules: &Rules) -> String {
    let mut text = String::new();
    for child in node.descendants().skip(1) {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(_) => {
                if ElementRef::wrap(child).is_some_and(|el| rules.address_bold.matches(&el)) {
                    text.push(NBSP);
                }
            }
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::default_rules;

    fn parse(html: &str) -> Vec<Pharmacy> {
        parse_listing(&Html::parse_document(html), &default_rules())
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn piazza_brembana_listing() {
        let pharmacies = parse(&fixture("listing_piazza_brembana"));
        assert_eq!(pharmacies.len(), 2);

        let first = &pharmacies[0];
        assert_eq!(first.id, "1234");
        assert_eq!(first.name, "Farmacia Centrale");
        assert_eq!(first.phones, vec!["0345123456"]);
        assert_eq!(first.address, "Via Roma 12 - Piazza Brembana\u{a0} ");

        let second = &pharmacies[1];
        assert_eq!(second.id, "");
        assert_eq!(second.name, "Farmacia Alpina");
        assert!(second.phones.is_empty());
        assert_eq!(second.address, "Via Monte 3 - Lenna");
    }

    #[test]
    fn results_keep_page_order() {
        let pharmacies = parse(&fixture("listing_many"));
        let names: Vec<&str> = pharmacies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Farmacia Uno", "Farmacia Due", "Farmacia Tre", "Farmacia Quattro"]
        );
        let ids: Vec<&str> = pharmacies.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["11", "22", "33", "44"]);
    }

    #[test]
    fn phones_capped_per_pharmacy() {
        let pharmacies = parse(&fixture("listing_many"));
        let quattro = &pharmacies[3];
        assert_eq!(
            quattro.phones,
            vec!["0345000001", "0345000002", "0345000003"]
        );
        assert!(!quattro.address.contains("0345000004"));
    }

    #[test]
    fn bold_label_does_not_fuse_with_text() {
        let html = r#"<table>
            <tr class="sf mnu c"><td>Risultati</td></tr>
            <tr><td class="bbo"><b><a href="x">Farmacia</a></b><a href="farmacia.asp?idf=7">Via Lunga 1<b>aperta</b></a></td></tr>
        </table>"#;
        let pharmacies = parse(html);
        assert_eq!(pharmacies[0].address, "Via Lunga 1\u{a0}aperta");
    }

    #[test]
    fn malformed_rows_degrade_to_empty_fields() {
        let html = r#"<table>
            <tr class="sf mnu c"><td>Risultati</td></tr>
            <tr><td>Nessun dettaglio</td></tr>
            <tr><td class="bbo"><b><a>Solo Nome</a></b></td></tr>
        </table>"#;
        let pharmacies = parse(html);
        assert_eq!(pharmacies.len(), 2);
        assert_eq!(pharmacies[0], Pharmacy::default());
        assert_eq!(pharmacies[1].name, "Solo Nome");
        assert!(pharmacies[1].address.is_empty());
        assert!(pharmacies[1].id.is_empty());
    }

    #[test]
    fn missing_marker_yields_nothing() {
        let html = r#"<table><tr><td class="bbo"><b><a>Farmacia</a></b></td></tr></table>"#;
        assert!(parse(html).is_empty());
    }

    #[test]
    fn marker_without_siblings_yields_nothing() {
        let pharmacies = parse(&fixture("listing_empty"));
        assert!(pharmacies.is_empty());
    }
}
