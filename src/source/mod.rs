//! Where the two archives come from and how they are fetched.

mod cache;
mod fetch;

pub use cache::*;
pub use fetch::*;

/// 2023 general election results, all districts, one row per table and list.
pub const RESULTS_URL: &str = "https://www.argentina.gob.ar/sites/default/files/2023_generales_1.zip";
pub const RESULTS_MEMBER: &str = "2023_Generales/ResultadoElectorales_2023_Generales.csv";

/// Electoral circuit boundaries for Buenos Aires province.
pub const CIRCUITS_URL: &str = "https://catalogo.datos.gba.gob.ar/dataset/4fe68b69-c788-4c06-ac67-26e4ebc7416b/resource/37bd466c-4a80-4e2e-be11-a68cfe60aa1e/download/circuitos-electorales.zip";
pub const CIRCUITS_MEMBER: &str = "circuitos-electorales.geojson";

/// A remote ZIP archive and the file to read inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archive {
    pub url: String,
    pub member: String,
}

impl Archive {
    pub fn new(url: impl Into<String>, member: impl Into<String>) -> Self {
        Self { url: url.into(), member: member.into() }
    }
}

/// The pair of archives the pipeline reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sources {
    pub results: Archive,
    pub circuits: Archive,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            results: Archive::new(RESULTS_URL, RESULTS_MEMBER),
            circuits: Archive::new(CIRCUITS_URL, CIRCUITS_MEMBER),
        }
    }
}
