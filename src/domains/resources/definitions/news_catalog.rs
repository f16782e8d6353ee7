//! News catalog resource definition.

use super::ResourceDefinition;
use crate::domains::resources::service::ResourceContent;

/// The full news mapping (id → record) as a readable resource.
pub struct NewsCatalogResource;

impl ResourceDefinition for NewsCatalogResource {
    const URI: &'static str = "noticias://catalogo";
    const NAME: &'static str = "Catálogo de noticias";
    const DESCRIPTION: &'static str = "Todas las noticias financieras indexadas por id";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::NewsCatalog
    }
}
