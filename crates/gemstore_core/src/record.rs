const UNKNOWN: &str = "UNKNOWN";

/// One entry of the gem store data page.
///
/// `cost` and `quantity` are kept as the wiki wrote them; they are only ever
/// displayed, never computed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub name: String,
    pub availability: String,
    pub cost: String,
    pub quantity: String,
    pub is_discounted: bool,
    pub section: String,
    pub subsection: String,
}

impl Default for ItemRecord {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            availability: UNKNOWN.to_string(),
            cost: "0".to_string(),
            quantity: "1".to_string(),
            is_discounted: false,
            section: UNKNOWN.to_string(),
            subsection: UNKNOWN.to_string(),
        }
    }
}

/// Field values collected from one template block before the record is built.
#[derive(Debug, Default)]
pub(crate) struct RecordFields {
    pub item: Option<String>,
    pub availability: Option<String>,
    pub cost: Option<String>,
    pub qty: Option<String>,
    pub discounted: Option<String>,
    pub section: Option<String>,
    pub subsection: Option<String>,
}

impl RecordFields {
    /// Stores a recognized key. Unknown keys are ignored; a repeated key keeps the last value.
    pub fn set(&mut self, key: &str, value: &str) {
        let slot = match key {
            "item" => &mut self.item,
            "availability" => &mut self.availability,
            "cost" => &mut self.cost,
            "qty" => &mut self.qty,
            "discounted" => &mut self.discounted,
            "section" => &mut self.section,
            "subsection" => &mut self.subsection,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    pub fn build(self) -> ItemRecord {
        let defaults = ItemRecord::default();
        ItemRecord {
            name: self.item.unwrap_or(defaults.name),
            availability: self.availability.unwrap_or(defaults.availability),
            cost: self.cost.unwrap_or(defaults.cost),
            quantity: self.qty.unwrap_or(defaults.quantity),
            is_discounted: self.discounted.as_deref().is_some_and(is_discount_flag),
            section: self.section.unwrap_or(defaults.section),
            subsection: self
                .subsection
                .map(|raw| clean_subsection(&raw))
                .unwrap_or(defaults.subsection),
        }
    }
}

fn is_discount_flag(value: &str) -> bool {
    let value = value.trim();
    ["y", "yes", "true"]
        .iter()
        .any(|flag| flag.eq_ignore_ascii_case(value))
}

/// Strips link brackets, block-close markers and line breaks. Link targets stay.
fn clean_subsection(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    // Run to a fixed point: a removal can splice a new token together ("}[[]]}").
    loop {
        let next = cleaned
            .replace("[[", "")
            .replace("]]", "")
            .replace("}}", "")
            .replace(['\n', '\r'], "");
        if next == cleaned {
            break;
        }
        cleaned = next;
    }
    cleaned.trim().to_string()
}
