use regex::Regex;
use std::sync::OnceLock;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Order matters: kg must be tried before the bare g token.
re!(re_kg, r"(kg|кг)");
re!(re_g, r"(g|г)");
re!(re_l, r"(l|л)");
re!(re_pcs, r"(pcs|шт|ks|pc)");
re!(re_pack, r"(pack|уп)");
re!(re_m, r"(m|м)");

/// Normalize extracted unit text to one of the canonical tokens
/// (kg/g/l/pcs/pack/m), covering Latin and Cyrillic abbreviations.
/// Empty input defaults to "pcs"; non-empty unmatched text is kept
/// verbatim rather than guessed away.
pub fn normalize_unit(value: &str) -> String {
    let lowered = value.to_lowercase();
    if re_kg().is_match(&lowered) {
        return "kg".into();
    }
    if re_g().is_match(&lowered) {
        return "g".into();
    }
    if re_l().is_match(&lowered) {
        return "l".into();
    }
    if re_pcs().is_match(&lowered) {
        return "pcs".into();
    }
    if re_pack().is_match(&lowered) {
        return "pack".into();
    }
    if re_m().is_match(&lowered) {
        return "m".into();
    }
    if value.is_empty() {
        "pcs".into()
    } else {
        value.to_string()
    }
}
