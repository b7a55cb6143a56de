use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::models::Transaction;

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Nómina",
    "Alquiler",
    "Supermercado",
    "Transporte",
    "Ocio",
    "Restaurantes",
    "Ropa y accesorios",
    "Suscripciones",
    "Salud",
    "Bizum",
    "Otros",
];

const FIXED_COLORS: &[(&str, &str)] = &[
    ("Nómina", "#22c55e"),
    ("Alquiler", "#f97316"),
    ("Supermercado", "#0ea5e9"),
    ("Transporte", "#6366f1"),
    ("Ocio", "#ec4899"),
    ("Restaurantes", "#facc15"),
    ("Ropa y accesorios", "#a855f7"),
    ("Suscripciones", "#06b6d4"),
    ("Salud", "#10b981"),
    ("Bizum", "#f97316"),
    ("Otros", "#64748b"),
];

const PALETTE: &[&str] = &[
    "#0ea5e9", "#22c55e", "#6366f1", "#e11d48", "#f97316", "#a855f7", "#14b8a6", "#facc15",
    "#4b5563", "#8b5cf6",
];

const NEUTRAL_COLOR: &str = "#64748b";

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// Index into the palette for a category name. Hashes UTF-16 code units of
/// the lowercased name so the same name always lands on the same color.
pub fn palette_index(name: &str) -> usize {
    let hash = name
        .to_lowercase()
        .encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)));
    hash as usize % PALETTE.len()
}

fn compute_color(name: &str) -> &'static str {
    if name.is_empty() {
        return NEUTRAL_COLOR;
    }
    if let Some((_, color)) = FIXED_COLORS.iter().find(|(n, _)| *n == name) {
        return *color;
    }
    PALETTE[palette_index(name)]
}

fn color_cache() -> &'static Mutex<HashMap<String, &'static str>> {
    static CACHE: OnceLock<Mutex<HashMap<String, &'static str>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Color for a category, memoized for the life of the process.
pub fn color_for(name: &str) -> &'static str {
    let Ok(mut cache) = color_cache().lock() else {
        return compute_color(name);
    };
    if let Some(color) = cache.get(name) {
        return *color;
    }
    let color = compute_color(name);
    cache.insert(name.to_string(), color);
    color
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

fn sort_names(names: &mut [String]) {
    names.sort_by_cached_key(|n| n.to_lowercase());
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        let mut names: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        sort_names(&mut names);
        Self { names }
    }
}

impl CategoryRegistry {
    /// Built-ins plus the persisted user categories, sorted.
    pub fn from_user_defined<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for name in extra {
            let name = name.as_ref().trim();
            if !name.is_empty() && !registry.contains(name) {
                registry.names.push(name.to_string());
            }
        }
        sort_names(&mut registry.names);
        registry
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn color_for(&self, name: &str) -> &'static str {
        color_for(name)
    }

    /// Returns `true` when the name was new.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        sort_names(&mut self.names);
        true
    }

    /// Registers any category used by `transactions` that is not known yet.
    pub fn sync_from(&mut self, transactions: &[Transaction]) -> bool {
        let mut changed = false;
        for tx in transactions {
            let name = tx.category.trim();
            if !name.is_empty() && !self.contains(name) {
                self.names.push(name.to_string());
                changed = true;
            }
        }
        if changed {
            sort_names(&mut self.names);
        }
        changed
    }

    /// Names that are not built in; this is what gets persisted.
    pub fn user_defined(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|n| !DEFAULT_CATEGORIES.contains(&n.as_str()))
            .cloned()
            .collect()
    }
}
