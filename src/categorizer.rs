use crate::models::TxType;

/// Category assigned when no rule matches.
pub const FALLBACK_CATEGORY: &str = "Otros";

pub struct CategoryRule {
    pub category: &'static str,
    pub tx_type: Option<TxType>,
    pub keywords: &'static [&'static str],
}

// Order matters: the first matching rule wins.
pub const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: "Bizum",
        tx_type: None,
        keywords: &["bizum"],
    },
    CategoryRule {
        category: "Restaurantes",
        tx_type: None,
        keywords: &[
            "mc", "burger", "bk", "kfc", "pizz", "dp", "restaurant", "keba", "sushi", "sumo",
            "food", "japo",
        ],
    },
    CategoryRule {
        category: "Supermercado",
        tx_type: None,
        keywords: &[
            "mercadona", "carrefour", "dia ", "suma", "lidl", "aldi", "hipercor", "supermercado",
            "ahorro", "super", "alimentac", "escla", "condis", "home", "drim", "goiko",
        ],
    },
    CategoryRule {
        category: "Ropa y accesorios",
        tx_type: None,
        keywords: &[
            "zara", "bear", "pull", "stradivarius", "bershka", "dutti", "h&m", "hm", "primark",
            "nike", "adidas", "sprinter", "decathlon", "foot locker", "lefties", "snipes", "cn",
        ],
    },
    CategoryRule {
        category: "Transporte",
        tx_type: None,
        keywords: &[
            "uber", "cabify", "renfe", "metro", "bus", "tmb", "taxi", "repsol", "cepsa", "bp ",
            "galp", "fgc", "mobilit", "gasolin",
        ],
    },
    CategoryRule {
        category: "Suscripciones",
        tx_type: None,
        keywords: &[
            "netf", "spot", "hbo", "max", "prim", "disn", "appl", "premium", "piscin", "esports",
        ],
    },
    CategoryRule {
        category: "Nómina",
        tx_type: Some(TxType::Income),
        keywords: &["nómina", "nomina", "salari", "payroll"],
    },
    CategoryRule {
        category: "Salud",
        tx_type: None,
        keywords: &["farmacia", "dent", "clinica", "clínica", "seguro salud", "odont"],
    },
    CategoryRule {
        category: "Ocio",
        tx_type: None,
        keywords: &[
            "steam", "playstation", "psn", "xbox", "game ", "tick", "entradas", "cine",
            "microsoft", "sumup", "bolera", "gran clips", "pay", "sala", "ovella", "fourvenues",
            "helader",
        ],
    },
];

impl CategoryRule {
    fn matches(&self, lowered: &str, tx_type: TxType) -> bool {
        if self.tx_type.is_some_and(|t| t != tx_type) {
            return false;
        }
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

/// Guess a category from a bank concept. `amount` does not take part in
/// matching.
pub fn infer_category(note: &str, _amount: f64, tx_type: TxType) -> &'static str {
    if note.is_empty() {
        return FALLBACK_CATEGORY;
    }
    let lowered = note.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered, tx_type))
        .map(|rule| rule.category)
        .unwrap_or(FALLBACK_CATEGORY)
}
