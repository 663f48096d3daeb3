use std::time::Duration;

pub const LISTING_URL: &str = "https://www.farmaciediturno.org/ricercaditurno.asp";
pub const DETAIL_URL: &str = "https://www.farmaciediturno.org/farmacia.asp";
pub const LISTING_ADDRESS_PARAM: &str = "indirizzo";
pub const DETAIL_ID_PARAM: &str = "idf";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Endpoints and runtime knobs for one pipeline instance.
#[derive(Debug, Clone)]
pub struct Config {
    pub listing_url: String,
    pub detail_url: String,
    pub user_agent: String,
    /// Per-request HTTP timeout. `None` keeps the client default.
    pub timeout: Option<Duration>,
    /// Max detail fetches in flight. `None` = one per pharmacy.
    pub max_concurrency: Option<usize>,
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
            detail_url: DETAIL_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: None,
            max_concurrency: None,
            layout: Layout::default(),
        }
    }
}

/// Structure of the farmaciediturno.org pages the parsers rely on.
///
/// When the site changes its markup this is the only place that should need
/// updating.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Row marking the start of the results; every following sibling is one pharmacy.
    pub results_marker: String,
    /// Bold cell holding the name link. Its next sibling holds address and phones.
    pub name_cell: String,
    pub name_link: String,
    /// Bold tags inside the address node that get a separator in front.
    pub address_bold: String,
    pub address_param: String,
    pub detail_id_param: String,
    /// Map link on the detail page.
    pub map_link: String,
    /// Query parameter of the map link holding "lat,lon".
    pub coords_param: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            results_marker: ".sf.mnu.c".to_string(),
            name_cell: "td.bbo b".to_string(),
            name_link: "a".to_string(),
            address_bold: "b".to_string(),
            address_param: LISTING_ADDRESS_PARAM.to_string(),
            detail_id_param: DETAIL_ID_PARAM.to_string(),
            map_link: r#"table table a[href*="daddr="]"#.to_string(),
            coords_param: "daddr".to_string(),
        }
    }
}
