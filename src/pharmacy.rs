use serde::Serialize;

/// One on-duty pharmacy as scraped from the listing page.
///
/// `lat`/`lon` stay at `0.0` when the detail page could not be geocoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pharmacy {
    /// Detail page id. Only used to build the detail URL.
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub phones: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Pharmacy {
    pub fn set_coordinates(&mut self, coords: Coordinates) {
        self.lat = coords.lat;
        self.lon = coords.lon;
    }
}
