use serde::{Deserialize, Serialize};
use std::str::FromStr;

use paragon_core::Category;

/// Lines containing any of these substrings (case-insensitive) are service
/// noise, not purchased products: barcodes, card/terminal chatter, tax and
/// total lines, change/cashier/contact lines, bank and loyalty branding.
/// Covers English and Ukrainian plus the Czech/Russian variants seen on
/// real receipts.
const DEFAULT_NON_PRODUCT_KEYWORDS: &[&str] = &[
    "штрих код",
    "barcode",
    "qr",
    "qr code",
    "код транз",
    "код авт",
    "epz",
    "pos",
    "картка",
    "карта",
    "card",
    "bonus",
    "бонус",
    "зниж",
    "скид",
    "пдв",
    "ндс",
    "vat",
    "tax",
    "сума",
    "итого",
    "итог",
    "subtotal",
    "total",
    "оплата",
    "payment",
    "cash",
    "безгот",
    "visa",
    "mastercard",
    "terminal",
    "термінал",
    "залишок",
    "на початок",
    "здача",
    "решта",
    "решт",
    "дяку",
    "thanks",
    "welcome",
    "online",
    "www",
    "http",
    "тел",
    "phone",
    "касир",
    "касса",
    "приватбанк",
    "privatbank",
    "monobank",
];

/// Keyword families for category inference, highest priority first.
const DEFAULT_CATEGORY_RULES: &[(&str, Category, i32)] = &[
    ("ticket|museum|cinema|concert|театр|кіно|кино", Category::Entertainment, 60),
    ("taxi|uber|bolt|bus|metro|tram|train|проїзд", Category::Transport, 50),
    ("tv|laptop|phone|headphone|adapter|cable|usb|charger", Category::Electronics, 40),
    ("soap|detergent|clean|jar|shampoo|paper|towel|napkin", Category::Household, 30),
    (
        "milk|bread|cheese|tomato|apple|banana|egg|juice|coke|cola|meat|fish|potato|onion",
        Category::Grocery,
        20,
    ),
];

/// One category-inference rule: a regex over the lowercased item name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: Category,
    pub priority: i32,
}

/// Serialized form of a full classifier configuration (TOML-loadable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub non_product_keywords: Vec<String>,
    pub category_rules: Vec<CategoryRule>,
}

struct CompiledRule {
    rule: CategoryRule,
    regex: regex::Regex,
}

/// Language-agnostic line classifier: decides which extracted lines are
/// real products and infers a category for unlabeled items. Injectable so
/// new locales extend the keyword sets without touching the normalizer.
pub struct LineClassifier {
    keywords: Vec<String>,
    rules: Vec<CompiledRule>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        let rules = DEFAULT_CATEGORY_RULES
            .iter()
            .map(|(pattern, category, priority)| CategoryRule {
                pattern: (*pattern).to_string(),
                category: *category,
                priority: *priority,
            })
            .collect();
        let keywords = DEFAULT_NON_PRODUCT_KEYWORDS
            .iter()
            .map(|k| (*k).to_string())
            .collect();
        Self::new(ClassifierConfig { non_product_keywords: keywords, category_rules: rules })
    }
}

impl LineClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let mut rules: Vec<CompiledRule> = config
            .category_rules
            .into_iter()
            .filter_map(|rule| {
                regex::Regex::new(&rule.pattern)
                    .ok()
                    .map(|regex| CompiledRule { rule, regex })
            })
            .collect();
        // Highest priority first.
        rules.sort_by(|a, b| b.rule.priority.cmp(&a.rule.priority));

        let keywords = config
            .non_product_keywords
            .into_iter()
            .map(|k| k.to_lowercase())
            .collect();

        Self { keywords, rules }
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, String> {
        let config: ClassifierConfig =
            toml::from_str(toml_content).map_err(|e| format!("Failed to parse TOML: {e}"))?;
        Ok(Self::new(config))
    }

    /// Whether the combined line text looks like service noise rather than
    /// a purchased product.
    pub fn is_non_product(&self, text: &str) -> bool {
        let value = text.to_lowercase();
        self.keywords.iter().any(|keyword| value.contains(keyword))
    }

    /// Resolve a category: a supplied value that is a member of the closed
    /// enum wins; anything else falls back to name-based inference.
    pub fn resolve_category(&self, supplied: &str, name: &str) -> Category {
        Category::from_str(supplied).unwrap_or_else(|_| self.infer_category(name))
    }

    /// Infer a category from the item name; first matching rule (by
    /// priority) wins, else `other`.
    pub fn infer_category(&self, name: &str) -> Category {
        let text = name.to_lowercase();
        self.rules
            .iter()
            .find(|cr| cr.regex.is_match(&text))
            .map(|cr| cr.rule.category)
            .unwrap_or(Category::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_line_is_non_product() {
        let c = LineClassifier::default();
        assert!(c.is_non_product("VISA **** 1234  0.00"));
        assert!(c.is_non_product("Картка ПриватБанк"));
        assert!(c.is_non_product("TOTAL 123.40"));
        assert!(c.is_non_product("ПДВ 20%"));
    }

    #[test]
    fn plain_product_line_passes() {
        let c = LineClassifier::default();
        assert!(!c.is_non_product("Mleko polotučné 1l"));
        assert!(!c.is_non_product("Хліб житній"));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let c = LineClassifier::default();
        assert!(c.is_non_product("MasterCard contactless"));
        assert!(c.is_non_product("mastercard contactless"));
    }

    #[test]
    fn infer_grocery() {
        let c = LineClassifier::default();
        assert_eq!(c.infer_category("Fresh milk 1l"), Category::Grocery);
        assert_eq!(c.infer_category("Tomato passata"), Category::Grocery);
    }

    #[test]
    fn infer_priority_order_first_family_wins() {
        let c = LineClassifier::default();
        // "train ticket" matches both entertainment ("ticket") and
        // transport ("train"); entertainment has higher priority.
        assert_eq!(c.infer_category("train ticket"), Category::Entertainment);
    }

    #[test]
    fn infer_falls_back_to_other() {
        let c = LineClassifier::default();
        assert_eq!(c.infer_category("Mystery thing"), Category::Other);
    }

    #[test]
    fn resolve_category_prefers_valid_supplied_value() {
        let c = LineClassifier::default();
        assert_eq!(c.resolve_category("transport", "milk"), Category::Transport);
        // Unrecognized supplied values are a signal to infer, not an error.
        assert_eq!(c.resolve_category("dairy", "milk"), Category::Grocery);
        assert_eq!(c.resolve_category("", "milk"), Category::Grocery);
    }

    #[test]
    fn from_toml_overrides_defaults() {
        let c = LineClassifier::from_toml(
            r#"
            non_product_keywords = ["gesamtsumme"]

            [[category_rules]]
            pattern = "brot|milch"
            category = "grocery"
            priority = 10
            "#,
        )
        .unwrap();
        assert!(c.is_non_product("GESAMTSUMME 12,30"));
        assert!(!c.is_non_product("VISA ****"));
        assert_eq!(c.infer_category("Vollkornbrot"), Category::Grocery);
        assert_eq!(c.infer_category("milk"), Category::Other);
    }

    #[test]
    fn from_toml_rejects_garbage() {
        assert!(LineClassifier::from_toml("not toml at all [").is_err());
    }

    #[test]
    fn invalid_regex_rule_is_skipped() {
        let c = LineClassifier::new(ClassifierConfig {
            non_product_keywords: vec![],
            category_rules: vec![
                CategoryRule { pattern: "(".into(), category: Category::Transport, priority: 99 },
                CategoryRule { pattern: "milk".into(), category: Category::Grocery, priority: 1 },
            ],
        });
        assert_eq!(c.infer_category("milk"), Category::Grocery);
    }
}
