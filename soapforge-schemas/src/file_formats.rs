use crate::ingredient::{Additive, EssentialOil, Oil};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OilFile {
    pub oils: Vec<Oil>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AdditiveFile {
    pub additives: Vec<Additive>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EssentialOilFile {
    pub essential_oils: Vec<EssentialOil>,
}
