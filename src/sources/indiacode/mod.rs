//! India Code (indiacode.nic.in) act pages: structure, PDF links, citation
//! PDF dates, and the catalogue browse listing.

pub mod act;
pub mod listing;
pub mod pdf_date;
pub mod pdf_links;
pub mod structure;

pub const SITE_ORIGIN: &str = "https://www.indiacode.nic.in";
