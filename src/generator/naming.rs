//! Identifier normalization shared by both synthesizers.
//!
//! The service file and the handler file must agree on every type, method and
//! receiver name, so both go through [`ServiceNames`] and [`method_name`].

/// Go keywords; none of them may be used as a package name.
pub const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Locals declared by generated handler bodies; a receiver must not shadow them.
const HANDLER_LOCALS: &[&str] = &["w", "req", "err", "router"];

/// Name of the router aggregator method emitted into `handler.go`.
pub const HANDLER_METHOD: &str = "Handler";

/// Turn arbitrary text into an exported Go identifier.
///
/// Splits on anything that is not an ASCII letter or digit. Single-case words are
/// title-cased (`shop`, `SHOP` → `Shop`); mixed-case words keep their inner
/// capitals (`getElem` → `GetElem`). Applying it twice changes nothing.
pub fn normalize_identifier(raw: &str) -> String {
    let joined: String = raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(normalize_word)
        .collect();
    // Joining single letters can yield a single-case word again (`x y` -> `XY`),
    // so the joined result goes through the word rule once more.
    normalize_word(&joined)
}

fn normalize_word(word: &str) -> String {
    let has_lower = word.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = word.chars().any(|c| c.is_ascii_uppercase());
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    let mut out = String::with_capacity(word.len());
    out.push(first.to_ascii_uppercase());
    if has_lower && has_upper {
        out.push_str(rest);
    } else {
        out.push_str(&rest.to_ascii_lowercase());
    }
    out
}

/// Go package name for a service: the normalized identifier, lower-cased.
pub fn package_name(raw: &str) -> String {
    normalize_identifier(raw).to_ascii_lowercase()
}

/// Method name for an endpoint.
pub fn method_name(endpoint_name: &str) -> String {
    normalize_identifier(endpoint_name)
}

/// Private handler method name for an endpoint (`handleGetElem`).
pub fn handler_name(endpoint_name: &str) -> String {
    format!("handle{}", method_name(endpoint_name))
}

/// True when `ident` is usable as a Go identifier (non-empty, not digit-led).
pub fn is_valid_identifier(ident: &str) -> bool {
    matches!(ident.chars().next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Names derived from the service name, shared by both generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNames {
    /// `package` clause value.
    pub package: String,
    /// Exported struct name.
    pub type_name: String,
    /// Method receiver variable.
    pub receiver: String,
}

impl ServiceNames {
    pub fn new(package: &str, service: &str) -> Self {
        let type_name = normalize_identifier(service);
        let receiver = receiver_name(&type_name);
        ServiceNames {
            package: package_name(package),
            type_name,
            receiver,
        }
    }

    /// Receiver clause, e.g. `s *Shop`.
    pub fn receiver_clause(&self) -> String {
        format!("{} *{}", self.receiver, self.type_name)
    }
}

/// First letter of the lower-cased type name, widened to two letters when the
/// single letter would collide with a handler local.
pub fn receiver_name(type_name: &str) -> String {
    let lower = type_name.to_ascii_lowercase();
    let single: String = lower.chars().take(1).collect();
    if single.is_empty() {
        return "s".to_string();
    }
    if HANDLER_LOCALS.contains(&single.as_str()) {
        let double: String = lower.chars().take(2).collect();
        if double.len() == 2 && !HANDLER_LOCALS.contains(&double.as_str()) {
            return double;
        }
        return format!("{single}v");
    }
    single
}
