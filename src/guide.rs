//! Quick-reference data for travelers: additive codes and label keywords.

/// One cheat-sheet line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub term: &'static str,
    pub note: &'static str,
}

const fn entry(term: &'static str, note: &'static str) -> Entry {
    Entry { term, note }
}

/// E-codes that are usually haram.
pub const HARAM_E_CODES: &[Entry] = &[
    entry("E120", "Cochineal/Carmine - insect"),
    entry("E441", "Gelatin - animal bone"),
    entry("E542", "Bone phosphate - animal bone"),
];

/// E-codes whose source is doubtful.
pub const MUSHBOOH_E_CODES: &[Entry] = &[
    entry("E471", "Emulsifier - plant or animal?"),
    entry("E422", "Glycerol"),
    entry("E470-E483", "Fatty acids"),
];

/// Label keywords to watch for on Japanese and Korean packaging.
pub const LABEL_KEYWORDS: &[Entry] = &[
    entry("豚 / 豚肉", "Pork"),
    entry("酒", "Alcohol/Sake"),
    entry("みりん", "Mirin - rice wine"),
    entry("ゼラチン", "Gelatin"),
    entry("돼지고기", "Pork (Korean)"),
    entry("술", "Alcohol (Korean)"),
];

pub const E471_TIP: &str =
    "E471 is very common. It is only Halal if marked 'Plant-based' or 'Soy origin'.";

pub const DISCLAIMER: &str = "This tool uses AI to analyze ingredients and can misread text \
or make mistakes. It is for informational purposes only and is not a fatwa or an official \
Halal certification. Always verify with official certification bodies. When in doubt, it is \
safer to avoid.";

/// Look up a term (E-code or keyword) across all tables, ignoring case.
pub fn lookup(term: &str) -> Option<&'static Entry> {
    let term = term.trim();
    HARAM_E_CODES
        .iter()
        .chain(MUSHBOOH_E_CODES)
        .chain(LABEL_KEYWORDS)
        .find(|e| e.term.eq_ignore_ascii_case(term) || e.term.split(" / ").any(|t| t == term))
}

/// Render the full cheat sheet as plain text.
pub fn render() -> String {
    let mut out = String::from("Halal Guide\n\n");
    section(&mut out, "Haram (usually)", HARAM_E_CODES);
    section(&mut out, "Mushbooh (doubtful)", MUSHBOOH_E_CODES);
    section(&mut out, "Japan/Korea keywords", LABEL_KEYWORDS);
    out.push_str(&format!("Tip: {}\n", E471_TIP));
    out
}

fn section(out: &mut String, title: &str, entries: &[Entry]) {
    out.push_str(title);
    out.push_str(":\n");
    for e in entries {
        out.push_str(&format!("  * {} - {}\n", e.term, e.note));
    }
    out.push('\n');
}
