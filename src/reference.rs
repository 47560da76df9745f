/*!
 * Static reference data: product templates and checklist items.
 *
 * Reference data is supplied at startup (normally through the configuration
 * file) and never changes during a working session. It is not persisted by
 * the store.
 */

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One yes/no question of the verification form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Numeric identifier, used for display ordering
    pub id: u32,
    /// Key used in answer and photo maps (e.g. "altura")
    pub name: String,
    /// Question shown to the inspector
    pub question: String,
    /// Longer explanation of what to check
    #[serde(default)]
    pub description: String,
}

impl ChecklistItem {
    pub fn new(id: u32, name: &str, question: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            question: question.to_string(),
            description: description.to_string(),
        }
    }
}

/// A product that can be verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTemplate {
    /// Stock-keeping unit, unique across templates
    pub sku: String,
    /// Product description
    pub description: String,
    /// Units per pallet layer, kept as entered
    pub stacking_factor: String,
}

impl ProductTemplate {
    pub fn new(sku: &str, description: &str, stacking_factor: &str) -> Self {
        Self {
            sku: sku.to_string(),
            description: description.to_string(),
            stacking_factor: stacking_factor.to_string(),
        }
    }
}

// Product labels encode the SKU as "SKU: 1001" somewhere in the QR text
static SCANNED_SKU: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SKU:\s*(\d+)").expect("SKU label pattern is valid"));

/// Extract the SKU from the decoded text of a product label
///
/// Returns `None` when the text carries no `SKU:` label followed by digits.
pub fn scanned_sku(decoded: &str) -> Option<&str> {
    SCANNED_SKU
        .captures(decoded)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

static DEFAULT_PRODUCTS: Lazy<Vec<ProductTemplate>> = Lazy::new(|| {
    vec![
        ProductTemplate::new("1001", "Coca-Cola 600ml PET", "24"),
        ProductTemplate::new("1002", "Coca-Cola 2.5L PET", "8"),
        ProductTemplate::new("1003", "Coca-Cola Sin Azúcar 355ml Lata", "12"),
        ProductTemplate::new("2001", "Sprite 600ml PET", "24"),
        ProductTemplate::new("2002", "Fanta Naranja 600ml PET", "24"),
        ProductTemplate::new("3001", "Ciel Agua Natural 1L", "12"),
        ProductTemplate::new("4001", "Del Valle Durazno 413ml", "24"),
    ]
});

static DEFAULT_CHECKLIST: Lazy<Vec<ChecklistItem>> = Lazy::new(|| {
    vec![
        ChecklistItem::new(
            1,
            "altura",
            "¿La altura de la tarima es correcta?",
            "La tarima no excede la altura máxima permitida para el SKU.",
        ),
        ChecklistItem::new(
            2,
            "empaque",
            "¿El empaque está en buen estado?",
            "Sin roturas, humedad ni deformaciones en el emplayado o charolas.",
        ),
        ChecklistItem::new(
            3,
            "etiqueta",
            "¿La etiqueta es legible y corresponde al producto?",
            "La etiqueta de la tarima coincide con el SKU y es legible.",
        ),
        ChecklistItem::new(
            4,
            "caducidad",
            "¿La fecha de caducidad es vigente?",
            "El lote tiene fecha de caducidad vigente y visible.",
        ),
        ChecklistItem::new(
            5,
            "estiba",
            "¿El factor de estiba se respeta?",
            "El número de unidades por cama coincide con el factor de estiba.",
        ),
    ]
});

/// Product catalog and checklist, immutable for the duration of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Products that can be verified
    #[serde(default = "default_products")]
    pub products: Vec<ProductTemplate>,
    /// Questions asked for every product
    #[serde(default = "default_checklist")]
    pub checklist: Vec<ChecklistItem>,
}

fn default_products() -> Vec<ProductTemplate> {
    DEFAULT_PRODUCTS.clone()
}

fn default_checklist() -> Vec<ChecklistItem> {
    DEFAULT_CHECKLIST.clone()
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            products: default_products(),
            checklist: default_checklist(),
        }
    }
}

impl ReferenceData {
    pub fn new(products: Vec<ProductTemplate>, checklist: Vec<ChecklistItem>) -> Self {
        Self { products, checklist }
    }

    /// Find a product template by exact SKU
    pub fn product(&self, sku: &str) -> Option<&ProductTemplate> {
        self.products.iter().find(|p| p.sku == sku)
    }

    /// Find a checklist item by name
    pub fn checklist_item(&self, name: &str) -> Option<&ChecklistItem> {
        self.checklist.iter().find(|item| item.name == name)
    }

    /// Check that SKUs and checklist names are present and unique
    pub fn validate(&self) -> Result<()> {
        if self.checklist.is_empty() {
            return Err(anyhow!("Checklist must contain at least one item"));
        }

        let mut skus = HashSet::new();
        for product in &self.products {
            if product.sku.trim().is_empty() {
                return Err(anyhow!("Product '{}' has an empty SKU", product.description));
            }
            if !skus.insert(product.sku.as_str()) {
                return Err(anyhow!("Duplicate product SKU: {}", product.sku));
            }
        }

        let mut names = HashSet::new();
        for item in &self.checklist {
            if item.name.trim().is_empty() {
                return Err(anyhow!("Checklist item {} has an empty name", item.id));
            }
            if !names.insert(item.name.as_str()) {
                return Err(anyhow!("Duplicate checklist item name: {}", item.name));
            }
        }

        Ok(())
    }
}
