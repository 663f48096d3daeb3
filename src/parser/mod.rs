pub mod detail;
pub mod listing;
pub mod text;

use anyhow::{anyhow, Result};
use scraper::Selector;

use crate::config::Layout;

/// `Layout` compiled once per pipeline.
#[derive(Debug)]
pub struct Rules {
    pub results_marker: Selector,
    pub name_cell: Selector,
    pub name_link: Selector,
    pub address_bold: Selector,
    pub map_link: Selector,
    pub coords_param: String,
}

impl Rules {
    pub fn compile(layout: &Layout) -> Result<Self> {
        Ok(Self {
            results_marker: compile(&layout.results_marker)?,
            name_cell: compile(&layout.name_cell)?,
            name_link: compile(&layout.name_link)?,
            address_bold: compile(&layout.address_bold)?,
            map_link: compile(&layout.map_link)?,
            coords_param: layout.coords_param.clone(),
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector '{}': {}", selector, e))
}

#[cfg(test)]
pub(crate) fn default_rules() -> Rules {
    Rules::compile(&Layout::default()).unwrap()
}
